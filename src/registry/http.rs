use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::error::KjspkgError;
use crate::http::HttpClient;

use super::{CatalogEntry, PackageDescriptor, Registry};

/// Registry backed by the HTTP catalog.
pub struct HttpRegistry {
    http: HttpClient,
    base_url: String,
}

impl HttpRegistry {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns: `<base>/pkgs/<name>.json`
    pub fn descriptor_url(&self, name: &str) -> String {
        format!("{}/pkgs/{}.json", self.base_url.trim_end_matches('/'), name)
    }
}

#[async_trait]
impl Registry for HttpRegistry {
    #[tracing::instrument(skip(self))]
    async fn fetch_descriptor(&self, name: &str) -> Result<Option<PackageDescriptor>> {
        let url = self.descriptor_url(name);
        debug!("Looking up {} at {}", name, url);

        match self.http.get_json::<CatalogEntry>(&url).await {
            Ok(Some(entry)) => Ok(Some(PackageDescriptor::from_entry(name, entry))),
            Ok(None) => Ok(None),
            Err(e) => Err(KjspkgError::RegistryUnavailable {
                name: name.to_string(),
                reason: format!("{:#}", e),
            }
            .into()),
        }
    }
}
