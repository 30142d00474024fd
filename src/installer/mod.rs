//! Installation engine - moves package content in and out of a project.
//!
//! Both operations take the current [`Manifest`](crate::project::Manifest) by reference and hand back
//! the updated value. Persisting it is the caller's job, once per command.

mod install;
mod remove;

pub use remove::remove;

use anyhow::Result;
use log::debug;

use crate::error::KjspkgError;
use crate::fetch::Fetcher;
use crate::project::{Category, ProjectLayout};
use crate::registry::Registry;
use crate::runtime::Runtime;

pub struct Installer<'a, R: Runtime, G: Registry, F: Fetcher> {
    runtime: &'a R,
    registry: &'a G,
    fetcher: &'a F,
    layout: ProjectLayout,
}

impl<'a, R: Runtime, G: Registry, F: Fetcher> Installer<'a, R, G, F> {
    pub fn new(runtime: &'a R, registry: &'a G, fetcher: &'a F, layout: ProjectLayout) -> Self {
        Self {
            runtime,
            registry,
            fetcher,
            layout,
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }
}

/// Package names become path segments, so they must be a single plain component.
pub fn validate_name(name: &str) -> Result<(), KjspkgError> {
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| c == '/' || c == '\\' || c == ':' || c.is_control());
    if is_plain {
        Ok(())
    } else {
        Err(KjspkgError::InvalidPackageName(name.to_string()))
    }
}

/// Delete the folder `name` owns in every category. Missing folders are fine.
pub fn remove_package_files<R: Runtime>(
    runtime: &R,
    layout: &ProjectLayout,
    name: &str,
) -> Result<()> {
    validate_name(name)?;
    for category in Category::ALL {
        let package_dir = layout.package_dir(category, name);
        if runtime.exists(&package_dir) {
            debug!("Removing {:?}", package_dir);
            runtime.remove_dir_all(&package_dir)?;
        }
    }
    Ok(())
}
