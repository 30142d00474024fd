use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::error::{Incompatibility, KjspkgError};
use crate::fetch::Fetcher;
use crate::project::{Category, Manifest};
use crate::registry::{PackageDescriptor, Registry};
use crate::runtime::Runtime;

use super::{Installer, validate_name};

impl<'a, R: Runtime, G: Registry, F: Fetcher> Installer<'a, R, G, F> {
    /// Install one package and return the manifest that records it.
    ///
    /// Already-installed packages are a no-op. With `skip_missing`, a package
    /// the registry does not know is a no-op too. The compatibility check runs
    /// before anything touches the filesystem.
    #[tracing::instrument(skip(self, manifest))]
    pub async fn install(
        &self,
        manifest: &Manifest,
        name: &str,
        skip_missing: bool,
    ) -> Result<Manifest> {
        validate_name(name)?;
        if manifest.is_installed(name) {
            debug!("{} is already installed", name);
            return Ok(manifest.clone());
        }

        let descriptor = match self.lookup(name).await? {
            Some(descriptor) => descriptor,
            None if skip_missing => {
                info!("Package {} does not exist, skipping", name);
                return Ok(manifest.clone());
            }
            None => return Err(KjspkgError::PackageNotFound(name.to_string()).into()),
        };

        check_compatibility(manifest, &descriptor)?;

        let staging = self.prepare_staging(name)?;
        self.fetcher
            .fetch_into(&descriptor, &staging)
            .await
            .map_err(|e| match e.downcast::<KjspkgError>() {
                Ok(known) => anyhow::Error::from(known),
                Err(other) => anyhow::Error::from(KjspkgError::FetchError {
                    name: name.to_string(),
                    reason: format!("{:#}", other),
                }),
            })?;

        self.place_package(&staging, name)?;

        info!("Installed {}", name);
        Ok(manifest.with_package(name))
    }

    async fn lookup(&self, name: &str) -> Result<Option<PackageDescriptor>> {
        self.registry
            .fetch_descriptor(name)
            .await
            .map_err(|e| match e.downcast::<KjspkgError>() {
                Ok(known) => anyhow::Error::from(known),
                Err(other) => anyhow::Error::from(KjspkgError::RegistryUnavailable {
                    name: name.to_string(),
                    reason: format!("{:#}", other),
                }),
            })
    }

    /// Fresh `<staging root>/<name>`; the directory itself is left for the fetcher to create.
    fn prepare_staging(&self, name: &str) -> Result<PathBuf> {
        let staging = self.layout.staging_dir(name);
        if self.runtime.exists(&staging) {
            self.runtime.remove_dir_all(&staging)?;
        }
        self.runtime.create_dir_all(&self.layout.staging_root())?;
        Ok(staging)
    }

    /// Move every staged category into the project. On failure the folders
    /// already placed for this package are removed again.
    ///
    /// Script folders live in kjspkg's own wrappers, so a leftover one is
    /// replaced. An existing `data/<name>` or `assets/<name>` belongs to the
    /// user and stops the install before anything moves.
    fn place_package(&self, staging: &Path, name: &str) -> Result<()> {
        let staged: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| self.runtime.is_dir(&staging.join(c.dir_name())))
            .collect();

        for category in staged.iter().filter(|c| !c.is_script()) {
            let dest = self.layout.package_dir(*category, name);
            if self.runtime.exists(&dest) {
                return Err(KjspkgError::FolderConflict {
                    name: name.to_string(),
                    path: dest,
                }
                .into());
            }
        }

        let mut placed: Vec<PathBuf> = Vec::new();
        for category in staged {
            let source = staging.join(category.dir_name());
            let dest = self.layout.package_dir(category, name);
            if let Err(e) = self.move_into_place(&source, &dest) {
                warn!(
                    "Failed to place {} for {}: {}. Rolling back.",
                    category, name, e
                );
                for dir in &placed {
                    let _ = self.runtime.remove_dir_all(dir);
                }
                return Err(e);
            }
            placed.push(dest);
        }

        debug!("Placed {} categor(ies) for {}", placed.len(), name);
        Ok(())
    }

    fn move_into_place(&self, source: &Path, dest: &Path) -> Result<()> {
        if self.runtime.exists(dest) {
            warn!("Replacing leftover folder {:?}", dest);
            self.runtime.remove_dir_all(dest)?;
        }
        if let Some(parent) = dest.parent() {
            self.runtime.create_dir_all(parent)?;
        }
        self.runtime.rename(source, dest)
    }
}

/// The project's version and modloader must both be supported. Version is checked first.
pub fn check_compatibility(
    manifest: &Manifest,
    descriptor: &PackageDescriptor,
) -> Result<(), KjspkgError> {
    let unsupported = if !descriptor.supports_version(manifest.version_key) {
        Some(Incompatibility::Version(manifest.version_key))
    } else if !descriptor.supports_modloader(manifest.modloader) {
        Some(Incompatibility::Modloader(manifest.modloader))
    } else {
        None
    };

    match unsupported {
        Some(unsupported) => Err(KjspkgError::IncompatiblePackage {
            name: descriptor.name.clone(),
            unsupported,
        }),
        None => Ok(()),
    }
}
