use anyhow::Result;

use crate::{project::ProjectManager, runtime::Runtime};

use super::config::Config;

const UNINIT_PROMPT: &str =
    "This will remove all packages and the kjspkg project. Are you sure you want to proceed?";

/// Remove every installed package and the manifest.
#[tracing::instrument(skip(runtime, config))]
pub fn uninit<R: Runtime>(runtime: &R, config: &Config, confirmed: bool) -> Result<()> {
    let manager = ProjectManager::new(runtime, config.layout());
    let Some(manifest) = manager.store().load()? else {
        println!("No project found in {}", config.root.display());
        return Ok(());
    };

    if !confirmed && !runtime.confirm(UNINIT_PROMPT)? {
        println!("Uninit cancelled.");
        return Ok(());
    }

    manager.teardown(&manifest)?;
    println!("Project removed.");
    Ok(())
}
