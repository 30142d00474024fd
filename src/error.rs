//! Error kinds reported by kjspkg commands.
//!
//! These travel inside `anyhow::Error`; use `downcast_ref::<KjspkgError>()` to
//! classify a failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::version::{Modloader, display_version};

#[derive(Debug, Error)]
pub enum KjspkgError {
    #[error("Hmm... {} doesn't look like a kubejs directory", .0.display())]
    NotAProjectRoot(PathBuf),

    #[error("A project already exists in {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("Package \"{0}\" does not exist")]
    PackageNotFound(String),

    #[error("Package \"{0}\" is not installed")]
    PackageNotInstalled(String),

    #[error("\"{0}\" is not a valid package name")]
    InvalidPackageName(String),

    #[error("Cannot install \"{name}\": {} already exists and is not managed by kjspkg", .path.display())]
    FolderConflict { name: String, path: PathBuf },

    #[error("Package registry is unavailable while looking up \"{name}\": {reason}")]
    RegistryUnavailable { name: String, reason: String },

    #[error("Failed to fetch package \"{name}\": {reason}")]
    FetchError { name: String, reason: String },

    #[error("{unsupported} for package \"{name}\"")]
    IncompatiblePackage {
        name: String,
        unsupported: Incompatibility,
    },

    #[error("Unknown or unsupported version: {0}")]
    UnknownVersion(String),

    #[error("Unknown or unsupported modloader: {0}")]
    UnknownModloader(String),

    #[error("Command \"{0}\" is not found. Run \"kjspkg help\" to see all of the available commands")]
    UnknownCommand(String),
}

/// The project setting a package does not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incompatibility {
    Version(u32),
    Modloader(Modloader),
}

impl std::fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Incompatibility::Version(key) => {
                write!(f, "Unsupported version {}", display_version(*key))
            }
            Incompatibility::Modloader(modloader) => {
                write!(f, "Unsupported modloader \"{}\"", modloader.title())
            }
        }
    }
}
