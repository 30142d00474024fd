use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::error::KjspkgError;
use crate::installer::remove_package_files;
use crate::runtime::Runtime;
use crate::version::Modloader;

use super::{Category, Manifest, ManifestStore, ProjectLayout};

/// Creates and destroys the on-disk project structure.
pub struct ProjectManager<'a, R: Runtime> {
    runtime: &'a R,
    layout: ProjectLayout,
}

impl<'a, R: Runtime> ProjectManager<'a, R> {
    pub fn new(runtime: &'a R, layout: ProjectLayout) -> Self {
        Self { runtime, layout }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn store(&self) -> ManifestStore<'a, R> {
        ManifestStore::new(self.runtime, &self.layout)
    }

    /// A manifest exists at the root.
    pub fn exists(&self) -> bool {
        self.store().exists()
    }

    /// Set up a project at the root.
    ///
    /// An existing project is an error unless `override_existing` is set, in
    /// which case it is torn down first.
    #[tracing::instrument(skip(self))]
    pub fn initialize(
        &self,
        version_key: u32,
        modloader: Modloader,
        override_existing: bool,
    ) -> Result<Manifest> {
        if !self.layout.looks_like_project(self.runtime) {
            return Err(KjspkgError::NotAProjectRoot(self.layout.root().to_path_buf()).into());
        }

        let store = self.store();
        if store.exists() {
            if !override_existing {
                return Err(
                    KjspkgError::AlreadyInitialized(self.layout.root().to_path_buf()).into(),
                );
            }
            let existing = store
                .load()?
                .context("Manifest disappeared while overriding the project")?;
            info!("Overriding existing project at {:?}", self.layout.root());
            self.teardown(&existing)?;
        }

        self.create_directories()?;
        store.create(version_key, modloader)
    }

    /// Ensure every script directory and its hidden wrapper exist.
    pub fn create_directories(&self) -> Result<()> {
        for category in Category::SCRIPTS {
            let wrapper = self.layout.packages_dir(category);
            if !self.runtime.is_dir(&wrapper) {
                debug!("Creating {:?}", wrapper);
                self.runtime.create_dir_all(&wrapper)?;
            }
        }
        Ok(())
    }

    /// Remove every installed package from all categories, the script
    /// wrappers, and finally the manifest.
    ///
    /// Package removal is best effort: a failure is logged and the next
    /// package is tried.
    #[tracing::instrument(skip(self, manifest))]
    pub fn teardown(&self, manifest: &Manifest) -> Result<()> {
        for name in &manifest.installed_packages {
            if let Err(e) = remove_package_files(self.runtime, &self.layout, name) {
                warn!("Failed to remove files of {}: {:#}. Continuing.", name, e);
            }
        }

        for category in Category::SCRIPTS {
            let wrapper = self.layout.packages_dir(category);
            if self.runtime.exists(&wrapper) {
                if let Err(e) = self.runtime.remove_dir_all(&wrapper) {
                    warn!("Failed to remove {:?}: {:#}. Continuing.", wrapper, e);
                }
            }
        }

        self.store().delete()
    }
}
