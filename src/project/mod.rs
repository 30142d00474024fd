//! Project state on disk
//!
//! This module knows where things live inside a kubejs directory, how the
//! `.kjspkg` manifest is persisted, and how a project is created and torn down.

mod layout;
mod lifecycle;
mod manifest;

pub use layout::{Category, ProjectLayout};
pub use lifecycle::ProjectManager;
pub use manifest::{Manifest, ManifestStore};
