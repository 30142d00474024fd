//! Retrieving package content into a staging directory.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use std::path::Path;
use tokio::process::Command;

use crate::error::KjspkgError;
use crate::registry::PackageDescriptor;

/// Default host used to turn `owner/name` into a clone URL.
pub const DEFAULT_GIT_HOST: &str = "https://github.com";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Place the full content of the package's source repository at `staging`.
    /// `staging` must not exist yet; its parent must.
    async fn fetch_into(&self, descriptor: &PackageDescriptor, staging: &Path) -> Result<()>;
}

/// Fetches packages with a full `git clone`.
pub struct GitFetcher {
    git_host: String,
}

impl GitFetcher {
    pub fn new(git_host: impl Into<String>) -> Self {
        Self {
            git_host: git_host.into(),
        }
    }

    pub fn git_host(&self) -> &str {
        &self.git_host
    }
}

#[async_trait]
impl Fetcher for GitFetcher {
    #[tracing::instrument(skip(self, descriptor), fields(name = %descriptor.name))]
    async fn fetch_into(&self, descriptor: &PackageDescriptor, staging: &Path) -> Result<()> {
        let url = descriptor.clone_url(&self.git_host);
        info!("Cloning {} into {:?}...", url, staging);

        let fetch_error = |reason: String| KjspkgError::FetchError {
            name: descriptor.name.clone(),
            reason,
        };

        let output = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg(&url)
            .arg(staging)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| fetch_error(format!("could not run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fetch_error(format!(
                "git clone of {} failed ({}): {}",
                url,
                output.status,
                stderr.trim()
            ))
            .into());
        }

        debug!("Clone of {} complete", url);
        Ok(())
    }
}
