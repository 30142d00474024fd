use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::KjspkgError;
use crate::runtime::Runtime;
use crate::version::Modloader;

use super::ProjectLayout;

/// Persisted project state, stored as JSON in `<root>/.kjspkg`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    #[serde(rename = "version")]
    pub version_key: u32,
    pub modloader: Modloader,
    #[serde(rename = "installed", default)]
    pub installed_packages: Vec<String>,
}

impl Manifest {
    pub fn new(version_key: u32, modloader: Modloader) -> Self {
        Self {
            version_key,
            modloader,
            installed_packages: Vec::new(),
        }
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed_packages.iter().any(|p| p == name)
    }

    /// Copy of this manifest with `name` recorded as installed.
    pub fn with_package(&self, name: &str) -> Self {
        let mut next = self.clone();
        if !next.is_installed(name) {
            next.installed_packages.push(name.to_string());
        }
        next
    }

    /// Copy of this manifest with `name` no longer recorded.
    pub fn without_package(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.installed_packages.retain(|p| p != name);
        next
    }

    fn dedup_packages(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.installed_packages.retain(|p| seen.insert(p.clone()));
    }
}

/// Loads and persists the manifest of one project.
pub struct ManifestStore<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> ManifestStore<'a, R> {
    pub fn new(runtime: &'a R, layout: &ProjectLayout) -> Self {
        Self {
            runtime,
            path: layout.manifest_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.runtime.exists(&self.path)
    }

    /// Returns `None` when no project has been initialized.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Result<Option<Manifest>> {
        if !self.exists() {
            debug!("No manifest at {:?}", self.path);
            return Ok(None);
        }
        let content = self.runtime.read_to_string(&self.path)?;
        let mut manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Malformed manifest at {:?}", self.path))?;
        manifest.dedup_packages();
        Ok(Some(manifest))
    }

    /// Writes a sibling temporary file and renames it over the manifest.
    #[tracing::instrument(skip(self, manifest))]
    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        let content = serde_json::to_string_pretty(manifest)?;
        let tmp_path = self.tmp_path();
        self.runtime
            .write(&tmp_path, content.as_bytes())
            .with_context(|| format!("Failed to save manifest to {:?}", self.path))?;
        self.runtime.rename(&tmp_path, &self.path)?;
        debug!(
            "Saved manifest with {} package(s)",
            manifest.installed_packages.len()
        );
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&self) -> Result<()> {
        if self.exists() {
            self.runtime.remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Create and persist an empty manifest. Fails if one already exists.
    pub fn create(&self, version_key: u32, modloader: Modloader) -> Result<Manifest> {
        if self.exists() {
            let root = self
                .path
                .parent()
                .unwrap_or(self.path.as_path())
                .to_path_buf();
            return Err(KjspkgError::AlreadyInitialized(root).into());
        }
        let manifest = Manifest::new(version_key, modloader);
        self.save(&manifest)?;
        Ok(manifest)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::test_utils::test_root;
    use mockall::predicate::eq;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_package_set_operations() {
        let manifest = Manifest::new(9, Modloader::Forge);
        let added = manifest.with_package("foo").with_package("bar").with_package("foo");
        assert_eq!(added.installed_packages, vec!["foo", "bar"]);
        assert!(added.is_installed("bar"));
        assert!(!manifest.is_installed("foo"));

        let removed = added.without_package("foo");
        assert_eq!(removed.installed_packages, vec!["bar"]);
        assert_eq!(removed.without_package("missing"), removed);
    }

    #[test]
    fn test_manifest_json_field_names() {
        let manifest = Manifest::new(9, Modloader::Fabric).with_package("foo");
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"version": 9, "modloader": "fabric", "installed": ["foo"]})
        );
    }

    #[test]
    fn test_load_absent_returns_none() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(test_root().join(".kjspkg")))
            .returning(|_| false);

        let layout = ProjectLayout::new(test_root());
        let store = ManifestStore::new(&runtime, &layout);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_is_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("not json".to_string()));

        let layout = ProjectLayout::new(test_root());
        let store = ManifestStore::new(&runtime, &layout);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_save_writes_temp_then_renames() {
        let mut runtime = MockRuntime::new();
        let manifest_path = test_root().join(".kjspkg");
        let tmp_path = test_root().join(".kjspkg.tmp");

        let mut seq = mockall::Sequence::new();
        runtime
            .expect_write()
            .with(eq(tmp_path.clone()), mockall::predicate::always())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .with(eq(tmp_path), eq(manifest_path))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let layout = ProjectLayout::new(test_root());
        let store = ManifestStore::new(&runtime, &layout);
        store.save(&Manifest::new(2, Modloader::Forge)).unwrap();
    }

    #[test]
    fn test_round_trip_on_disk() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let store = ManifestStore::new(&runtime, &layout);

        let manifest = Manifest::new(8, Modloader::Fabric)
            .with_package("alpha")
            .with_package("beta");
        store.save(&manifest).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, manifest);
        assert!(!dir.path().join(".kjspkg.tmp").exists());

        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), manifest);
    }

    #[test]
    fn test_load_drops_duplicate_names() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(".kjspkg"),
            r#"{"version": 9, "modloader": "forge", "installed": ["a", "b", "a"]}"#,
        )
        .unwrap();

        let layout = ProjectLayout::new(dir.path());
        let store = ManifestStore::new(&runtime, &layout);
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.installed_packages, vec!["a", "b"]);
    }

    #[test]
    fn test_create_and_delete() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let store = ManifestStore::new(&runtime, &layout);

        let created = store.create(9, Modloader::Forge).unwrap();
        assert!(created.installed_packages.is_empty());
        assert!(store.exists());

        let err = store.create(6, Modloader::Fabric).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KjspkgError>(),
            Some(KjspkgError::AlreadyInitialized(_))
        ));
        assert_eq!(store.load().unwrap().unwrap(), created);

        store.delete().unwrap();
        assert!(store.load().unwrap().is_none());
        // Deleting twice is harmless
        store.delete().unwrap();
    }
}
