pub mod cleanup;
pub mod commands;
pub mod error;
pub mod fetch;
pub mod http;
pub mod installer;
pub mod project;
pub mod registry;
pub mod runtime;
pub mod version;

/// Test utilities for cross-platform path handling.
#[cfg(test)]
pub mod test_utils {
    use crate::runtime::MockRuntime;
    use std::path::PathBuf;

    /// Returns the test project root based on the platform.
    /// - Unix: `/home/user/kubejs`
    /// - Windows: `C:\Users\user\kubejs`
    pub fn test_root() -> PathBuf {
        test_home().join("kubejs")
    }

    /// Returns a test home directory path based on the platform.
    /// - Unix: `/home/user`
    /// - Windows: `C:\Users\user`
    pub fn test_home() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user")
        }
    }

    /// Configure a mock runtime with common defaults for tests.
    /// - current_dir set to [`test_root`]
    pub fn configure_mock_runtime_basics(runtime: &mut MockRuntime) {
        runtime.expect_current_dir().returning(|| Ok(test_root()));
    }
}
