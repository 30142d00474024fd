use anyhow::Result;
use log::debug;

use crate::{project::Manifest, runtime::Runtime};

use super::{config::Config, load_or_init};

/// Print installed packages one per line, or only their number.
#[tracing::instrument(skip(runtime, config))]
pub fn list<R: Runtime>(runtime: &R, config: &Config, count: bool) -> Result<()> {
    let Some(manifest) = load_or_init(runtime, config)? else {
        return Ok(());
    };
    debug!(
        "Listing {} package(s)",
        manifest.installed_packages.len()
    );

    let output = render_list(&manifest, count);
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

pub fn render_list(manifest: &Manifest, count: bool) -> String {
    if count {
        manifest.installed_packages.len().to_string()
    } else {
        manifest.installed_packages.join("\n")
    }
}
