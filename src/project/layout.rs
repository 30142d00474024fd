use std::fmt;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Name every project root directory must carry.
pub const PROJECT_DIR_NAME: &str = "kubejs";

/// Manifest file at the project root.
pub const MANIFEST_FILE: &str = ".kjspkg";

/// Hidden wrapper inside each script directory holding one folder per package.
pub const WRAPPER_DIR: &str = ".kjspkg";

/// Staging area for package clones, purged at the end of every command.
pub const STAGING_DIR: &str = ".kjspkg_tmp";

/// A managed directory that packages may contribute files to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ServerScripts,
    ClientScripts,
    StartupScripts,
    Data,
    Assets,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::ServerScripts,
        Category::ClientScripts,
        Category::StartupScripts,
        Category::Data,
        Category::Assets,
    ];

    pub const SCRIPTS: [Category; 3] = [
        Category::ServerScripts,
        Category::ClientScripts,
        Category::StartupScripts,
    ];

    /// Directory name, both in the project and in a package repository.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::ServerScripts => "server_scripts",
            Category::ClientScripts => "client_scripts",
            Category::StartupScripts => "startup_scripts",
            Category::Data => "data",
            Category::Assets => "assets",
        }
    }

    /// Script categories keep packages under the hidden wrapper.
    pub fn is_script(&self) -> bool {
        matches!(
            self,
            Category::ServerScripts | Category::ClientScripts | Category::StartupScripts
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Paths inside one project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns: `<root>/.kjspkg`
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Returns: `<root>/.kjspkg_tmp`
    pub fn staging_root(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Returns: `<root>/.kjspkg_tmp/<name>`
    pub fn staging_dir(&self, name: &str) -> PathBuf {
        self.staging_root().join(name)
    }

    /// Returns: `<root>/<category>`
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Directory holding one folder per package for a category.
    ///
    /// Returns: `<root>/<category>/.kjspkg` for scripts, `<root>/<category>` for assets
    pub fn packages_dir(&self, category: Category) -> PathBuf {
        let dir = self.category_dir(category);
        if category.is_script() {
            dir.join(WRAPPER_DIR)
        } else {
            dir
        }
    }

    pub fn package_dir(&self, category: Category, name: &str) -> PathBuf {
        self.packages_dir(category).join(name)
    }

    /// A project root is a directory named `kubejs` holding at least one
    /// script directory.
    pub fn looks_like_project<R: Runtime>(&self, runtime: &R) -> bool {
        let named_right = self
            .root
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n == PROJECT_DIR_NAME);

        named_right
            && Category::SCRIPTS
                .iter()
                .any(|c| runtime.is_dir(&self.category_dir(*c)))
    }
}
