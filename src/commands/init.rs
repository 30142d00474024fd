use anyhow::Result;
use log::debug;

use crate::{
    error::KjspkgError,
    project::{Manifest, ProjectManager},
    runtime::Runtime,
    version::{Modloader, version_key},
};

use super::config::Config;

const OVERRIDE_PROMPT: &str = "A project already exists in this directory. Creating a new one removes every installed package. Proceed?";
const VERSION_PROMPT: &str = "Input your minecraft version (1.12/1.16/1.18/1.19): ";
const MODLOADER_PROMPT: &str = "Input your modloader (forge/fabric/quilt): ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    pub version: Option<String>,
    pub modloader: Option<String>,
    pub quiet: bool,
    pub override_existing: bool,
}

/// Create a project at the configured root.
///
/// Returns `None` when the user declines to override an existing project or
/// closes input at a prompt.
#[tracing::instrument(skip(runtime, config))]
pub fn init<R: Runtime>(
    runtime: &R,
    config: &Config,
    options: &InitOptions,
) -> Result<Option<Manifest>> {
    let manager = ProjectManager::new(runtime, config.layout());
    if !manager.layout().looks_like_project(runtime) {
        return Err(KjspkgError::NotAProjectRoot(config.root.clone()).into());
    }

    let mut override_existing = options.override_existing;
    if manager.exists() && !override_existing {
        if options.quiet || !runtime.confirm(OVERRIDE_PROMPT)? {
            debug!("Keeping the existing project");
            return Ok(None);
        }
        override_existing = true;
    }

    let Some(version) = ask(runtime, options.version.as_deref(), VERSION_PROMPT)? else {
        return Ok(None);
    };
    let version_key = version_key(&version)?;

    let Some(modloader) = ask(runtime, options.modloader.as_deref(), MODLOADER_PROMPT)? else {
        return Ok(None);
    };
    let modloader: Modloader = modloader.parse()?;

    let manifest = manager.initialize(version_key, modloader, override_existing)?;
    if !options.quiet {
        println!("Project created!");
    }
    Ok(Some(manifest))
}

/// Use the given value, or ask for one.
fn ask<R: Runtime>(runtime: &R, given: Option<&str>, prompt: &str) -> Result<Option<String>> {
    match given {
        Some(value) => Ok(Some(value.to_string())),
        None => Ok(runtime.prompt(prompt)?.map(|answer| answer.trim().to_string())),
    }
}
