use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{
    fetch::{DEFAULT_GIT_HOST, GitFetcher},
    http::HttpClient,
    project::ProjectLayout,
    registry::{DEFAULT_REGISTRY_URL, HttpRegistry},
    runtime::Runtime,
};

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute project root.
    pub root: PathBuf,
    pub registry_url: String,
    pub git_host: String,
}

impl Config {
    /// Fill in defaults. A relative `root` is taken relative to the current directory.
    pub fn new<R: Runtime>(
        runtime: &R,
        root: Option<PathBuf>,
        registry_url: Option<String>,
        git_host: Option<String>,
    ) -> Result<Self> {
        let root = match root {
            Some(path) if path.is_absolute() => path,
            Some(path) => runtime.current_dir()?.join(path),
            None => runtime.current_dir()?,
        };
        debug!("Using project root: {:?}", root);

        Ok(Self {
            root,
            registry_url: registry_url.unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            git_host: git_host.unwrap_or_else(|| DEFAULT_GIT_HOST.to_string()),
        })
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(&self.root)
    }

    pub fn registry(&self) -> Result<HttpRegistry> {
        Ok(HttpRegistry::new(
            HttpClient::with_defaults()?,
            &self.registry_url,
        ))
    }

    pub fn fetcher(&self) -> GitFetcher {
        GitFetcher::new(&self.git_host)
    }
}
