use anyhow::Result;
use log::{debug, info};

use crate::error::KjspkgError;
use crate::project::{Manifest, ProjectLayout};
use crate::runtime::Runtime;

use super::{remove_package_files, validate_name};

/// Remove one package and return the manifest without it.
///
/// Only the project on disk is involved, so no registry or fetcher is needed.
#[tracing::instrument(skip(runtime, layout, manifest))]
pub fn remove<R: Runtime>(
    runtime: &R,
    layout: &ProjectLayout,
    manifest: &Manifest,
    name: &str,
    skip_missing: bool,
) -> Result<Manifest> {
    validate_name(name)?;
    if !manifest.is_installed(name) {
        if skip_missing {
            debug!("{} is not installed, skipping", name);
            return Ok(manifest.clone());
        }
        return Err(KjspkgError::PackageNotInstalled(name.to_string()).into());
    }

    remove_package_files(runtime, layout, name)?;

    info!("Removed {}", name);
    Ok(manifest.without_package(name))
}
