use log::debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Tracks paths that need cleanup when a command ends or is interrupted
#[derive(Default)]
pub struct CleanupContext {
    #[cfg(test)]
    pub paths: Vec<PathBuf>,
    #[cfg(not(test))]
    paths: Vec<PathBuf>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path to be cleaned up
    pub fn add(&mut self, path: PathBuf) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Clean up all registered paths. Errors are ignored.
    pub fn cleanup(&self) {
        for path in &self.paths {
            debug!("Cleaning up: {:?}", path);
            if path.is_dir() {
                let _ = std::fs::remove_dir_all(path);
            } else {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

/// Type alias for shared cleanup context
pub type SharedCleanupContext = Arc<Mutex<CleanupContext>>;

/// Create a new shared cleanup context
pub fn new_shared() -> SharedCleanupContext {
    Arc::new(Mutex::new(CleanupContext::new()))
}

/// Purges the staging area when dropped, and on Ctrl-C before exiting with 130.
///
/// Must be created inside a tokio runtime.
pub struct StagingGuard {
    ctx: SharedCleanupContext,
    ctrl_c_handler: JoinHandle<()>,
}

impl StagingGuard {
    pub fn new(staging_root: PathBuf) -> Self {
        let ctx = new_shared();
        if let Ok(mut guard) = ctx.lock() {
            guard.add(staging_root);
        }

        let ctx_clone = Arc::clone(&ctx);
        let ctrl_c_handler = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupted, cleaning up...");
                if let Ok(guard) = ctx_clone.lock() {
                    guard.cleanup();
                }
                std::process::exit(130); // Standard exit code for Ctrl-C
            }
        });

        Self {
            ctx,
            ctrl_c_handler,
        }
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        self.ctrl_c_handler.abort();
        if let Ok(guard) = self.ctx.lock() {
            guard.cleanup();
        }
    }
}
