//! One function per CLI command. Each loads what it needs, calls into the
//! project and installer layers, and prints the user-facing result.

use anyhow::Result;
use log::debug;

use crate::{
    project::{Manifest, ManifestStore},
    runtime::Runtime,
};

pub mod config;
mod info;
mod init;
mod list;
mod packages;
mod uninit;

pub use info::{info, info_text};
pub use init::{InitOptions, init};
pub use list::{list, render_list};
pub use packages::{BatchOptions, install, remove};
pub use uninit::uninit;

use config::Config;

/// The project's manifest, creating the project first when there is none.
///
/// Returns `None` if the user backed out of the implicit init.
pub(crate) fn load_or_init<R: Runtime>(runtime: &R, config: &Config) -> Result<Option<Manifest>> {
    let layout = config.layout();
    if let Some(manifest) = ManifestStore::new(runtime, &layout).load()? {
        return Ok(Some(manifest));
    }

    debug!("No manifest at {:?}", layout.manifest_path());
    println!("Project not found, a new one will be created.\n");
    init(runtime, config, &InitOptions::default())
}
