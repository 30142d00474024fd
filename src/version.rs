//! Minecraft version keys and modloaders recognised by projects and packages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KjspkgError;

/// Recognised version strings and their keys. Patch releases of one minor
/// line share a key.
pub const VERSIONS: &[(&str, u32)] = &[
    ("1.12.2", 2),
    ("1.12", 2),
    ("1.16.5", 6),
    ("1.16", 6),
    ("1.18.2", 8),
    ("1.18", 8),
    ("1.19.2", 9),
    ("1.19.3", 9),
    ("1.19.4", 9),
    ("1.19", 9),
];

/// Look up the key for a version string such as `"1.19.2"`.
pub fn version_key(version: &str) -> Result<u32, KjspkgError> {
    VERSIONS
        .iter()
        .find(|(name, _)| *name == version.trim())
        .map(|(_, key)| *key)
        .ok_or_else(|| KjspkgError::UnknownVersion(version.to_string()))
}

/// Human-readable minor line for a key, e.g. `9` -> `"1.19"`.
pub fn display_version(key: u32) -> String {
    format!("1.{}", 10 + key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modloader {
    Forge,
    Fabric,
}

impl Modloader {
    /// Capitalised name used in user-facing messages.
    pub fn title(&self) -> &'static str {
        match self {
            Modloader::Forge => "Forge",
            Modloader::Fabric => "Fabric",
        }
    }
}

impl fmt::Display for Modloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modloader::Forge => write!(f, "forge"),
            Modloader::Fabric => write!(f, "fabric"),
        }
    }
}

impl FromStr for Modloader {
    type Err = KjspkgError;

    /// Quilt loads Fabric packages, so it is stored as Fabric.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forge" => Ok(Modloader::Forge),
            "fabric" | "quilt" => Ok(Modloader::Fabric),
            _ => Err(KjspkgError::UnknownModloader(s.to_string())),
        }
    }
}
