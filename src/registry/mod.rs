//! Package registry lookups.
//!
//! The catalog is a static tree of JSON files, one per package, at
//! `<base>/pkgs/<name>.json`.

mod http;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::version::Modloader;

pub use http::HttpRegistry;

/// Default catalog location.
pub const DEFAULT_REGISTRY_URL: &str = "https://github.com/Modern-Modpacks/kjspkg/raw/main";

/// Catalog record as served by the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub versions: Vec<u32>,
    pub modloaders: Vec<String>,
    /// Source repository in `owner/name` form.
    pub repo: String,
}

/// What the installer needs to know about a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub supported_versions: BTreeSet<u32>,
    pub supported_modloaders: BTreeSet<Modloader>,
    pub source_repository: String,
}

impl PackageDescriptor {
    /// Modloader names the client does not know about are ignored.
    pub fn from_entry(name: &str, entry: CatalogEntry) -> Self {
        let supported_modloaders = entry
            .modloaders
            .iter()
            .filter_map(|m| match m.parse::<Modloader>() {
                Ok(modloader) => Some(modloader),
                Err(_) => {
                    debug!("Ignoring unknown modloader {:?} for {}", m, name);
                    None
                }
            })
            .collect();

        Self {
            name: name.to_string(),
            supported_versions: entry.versions.into_iter().collect(),
            supported_modloaders,
            source_repository: entry.repo,
        }
    }

    pub fn supports_version(&self, version_key: u32) -> bool {
        self.supported_versions.contains(&version_key)
    }

    pub fn supports_modloader(&self, modloader: Modloader) -> bool {
        self.supported_modloaders.contains(&modloader)
    }

    /// Cloneable URL of the source repository: `<host>/<owner>/<name>.git`.
    pub fn clone_url(&self, git_host: &str) -> String {
        format!(
            "{}/{}.git",
            git_host.trim_end_matches('/'),
            self.source_repository.trim_matches('/')
        )
    }
}

/// Looks up package descriptors by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Returns `Ok(None)` when the catalog has no such package. Any other
    /// failure is reported as `KjspkgError::RegistryUnavailable`.
    async fn fetch_descriptor(&self, name: &str) -> Result<Option<PackageDescriptor>>;
}
