use anyhow::Result;
use log::{debug, info, warn};

use crate::{
    fetch::Fetcher,
    installer::{self, Installer},
    project::{Manifest, ManifestStore},
    registry::Registry,
    runtime::Runtime,
};

use super::{config::Config, load_or_init};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub quiet: bool,
    pub skip_missing: bool,
}

/// Install `names` in order. The first fatal error stops the batch; the
/// packages completed before it stay recorded.
#[tracing::instrument(skip(runtime, registry, fetcher, config))]
pub async fn install<R: Runtime, G: Registry, F: Fetcher>(
    runtime: &R,
    registry: &G,
    fetcher: &F,
    config: &Config,
    names: &[String],
    options: &BatchOptions,
) -> Result<()> {
    let Some(mut manifest) = load_or_init(runtime, config)? else {
        return Ok(());
    };
    let layout = config.layout();
    let store = ManifestStore::new(runtime, &layout);
    let installer = Installer::new(runtime, registry, fetcher, layout.clone());

    for name in names {
        let name = name.to_lowercase();
        let was_installed = manifest.is_installed(&name);
        match installer.install(&manifest, &name, options.skip_missing).await {
            Ok(updated) => {
                let changed = updated != manifest;
                manifest = updated;
                if !options.quiet && (changed || was_installed) {
                    println!("Package \"{}\" installed successfully!", name);
                }
            }
            Err(e) => {
                persist_partial(&store, &manifest);
                return Err(e);
            }
        }
    }

    store.save(&manifest)?;
    info!("{} package(s) installed", manifest.installed_packages.len());
    Ok(())
}

/// Remove `names` in order, with the same stop-on-first-error rule as [`install`].
#[tracing::instrument(skip(runtime, config))]
pub fn remove<R: Runtime>(
    runtime: &R,
    config: &Config,
    names: &[String],
    options: &BatchOptions,
) -> Result<()> {
    let Some(mut manifest) = load_or_init(runtime, config)? else {
        return Ok(());
    };
    let layout = config.layout();
    let store = ManifestStore::new(runtime, &layout);

    for name in names {
        let name = name.to_lowercase();
        match installer::remove(runtime, &layout, &manifest, &name, options.skip_missing) {
            Ok(updated) => {
                let changed = updated != manifest;
                manifest = updated;
                if !options.quiet && changed {
                    println!("Package \"{}\" removed successfully!", name);
                }
            }
            Err(e) => {
                persist_partial(&store, &manifest);
                return Err(e);
            }
        }
    }

    store.save(&manifest)
}

/// Record what the batch finished before failing. The batch error wins
/// over a save failure.
fn persist_partial<R: Runtime>(store: &ManifestStore<'_, R>, manifest: &Manifest) {
    debug!("Saving manifest after a failed batch");
    if let Err(e) = store.save(manifest) {
        warn!("Failed to save manifest: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KjspkgError;
    use crate::fetch::MockFetcher;
    use crate::installer::test_support::{
        assert_consistent, descriptor, package_folders, project, seed_package, write_package,
    };
    use crate::project::{Category, ProjectLayout};
    use crate::registry::MockRegistry;
    use crate::runtime::RealRuntime;
    use crate::version::Modloader;
    use mockall::predicate::eq;
    use std::path::Path;
    use tempfile::tempdir;

    fn initialized(base: &Path, manifest: &Manifest) -> (Config, ProjectLayout) {
        let layout = project(base);
        ManifestStore::new(&RealRuntime, &layout)
            .save(manifest)
            .unwrap();
        let config = Config::new(&RealRuntime, Some(layout.root().to_path_buf()), None, None).unwrap();
        (config, layout)
    }

    fn saved(layout: &ProjectLayout) -> Manifest {
        ManifestStore::new(&RealRuntime, layout)
            .load()
            .unwrap()
            .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    /// A fetcher that stages a package with server scripts for every call.
    fn staging_fetcher() -> MockFetcher {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch_into().returning(|_, staging| {
            write_package(staging, &[Category::ServerScripts]);
            Ok(())
        });
        fetcher
    }

    #[tokio::test]
    async fn test_install_batch_lowercases_and_persists() {
        let dir = tempdir().unwrap();
        let (config, layout) = initialized(dir.path(), &Manifest::new(9, Modloader::Forge));

        let mut registry = MockRegistry::new();
        registry
            .expect_fetch_descriptor()
            .with(eq("foo"))
            .times(1)
            .returning(|n| Ok(Some(descriptor(n, &[9], &["forge"]))));
        registry
            .expect_fetch_descriptor()
            .with(eq("bar"))
            .times(1)
            .returning(|n| Ok(Some(descriptor(n, &[9], &["forge", "fabric"]))));
        let fetcher = staging_fetcher();

        install(
            &RealRuntime,
            &registry,
            &fetcher,
            &config,
            &names(&["Foo", "BAR"]),
            &BatchOptions::default(),
        )
        .await
        .unwrap();

        let manifest = saved(&layout);
        assert_eq!(manifest.installed_packages, vec!["foo", "bar"]);
        assert_consistent(&layout, &manifest);
    }

    #[tokio::test]
    async fn test_install_batch_stops_at_first_error() {
        let dir = tempdir().unwrap();
        let (config, layout) = initialized(dir.path(), &Manifest::new(9, Modloader::Forge));

        let mut registry = MockRegistry::new();
        registry
            .expect_fetch_descriptor()
            .with(eq("foo"))
            .returning(|n| Ok(Some(descriptor(n, &[9], &["forge"]))));
        registry
            .expect_fetch_descriptor()
            .with(eq("missing"))
            .returning(|_| Ok(None));
        // "baz" must never be looked up
        let fetcher = staging_fetcher();

        let err = install(
            &RealRuntime,
            &registry,
            &fetcher,
            &config,
            &names(&["foo", "missing", "baz"]),
            &BatchOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<KjspkgError>(),
            Some(KjspkgError::PackageNotFound(name)) if name == "missing"
        ));
        let manifest = saved(&layout);
        assert_eq!(manifest.installed_packages, vec!["foo"]);
        assert_consistent(&layout, &manifest);
    }

    #[tokio::test]
    async fn test_install_skip_missing_continues() {
        let dir = tempdir().unwrap();
        let (config, layout) = initialized(dir.path(), &Manifest::new(9, Modloader::Forge));

        let mut registry = MockRegistry::new();
        registry
            .expect_fetch_descriptor()
            .with(eq("missing"))
            .returning(|_| Ok(None));
        registry
            .expect_fetch_descriptor()
            .with(eq("foo"))
            .returning(|n| Ok(Some(descriptor(n, &[9], &["forge"]))));
        let fetcher = staging_fetcher();

        install(
            &RealRuntime,
            &registry,
            &fetcher,
            &config,
            &names(&["missing", "foo"]),
            &BatchOptions {
                quiet: true,
                skip_missing: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(saved(&layout).installed_packages, vec!["foo"]);
    }

    #[tokio::test]
    async fn test_install_incompatible_leaves_project_unchanged() {
        let dir = tempdir().unwrap();
        let before = Manifest::new(9, Modloader::Forge).with_package("old");
        let (config, layout) = initialized(dir.path(), &before);
        seed_package(&layout, "old", &[Category::Data]);

        let mut registry = MockRegistry::new();
        registry
            .expect_fetch_descriptor()
            .returning(|n| Ok(Some(descriptor(n, &[8], &["forge"]))));
        let fetcher = MockFetcher::new();

        let err = install(
            &RealRuntime,
            &registry,
            &fetcher,
            &config,
            &names(&["foo"]),
            &BatchOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<KjspkgError>(),
            Some(KjspkgError::IncompatiblePackage { .. })
        ));
        assert_eq!(saved(&layout), before);
        assert_eq!(package_folders(&layout).len(), 1);
    }

    #[test]
    fn test_remove_batch() {
        let dir = tempdir().unwrap();
        let before = Manifest::new(9, Modloader::Forge)
            .with_package("foo")
            .with_package("bar");
        let (config, layout) = initialized(dir.path(), &before);
        seed_package(&layout, "foo", &[Category::ClientScripts, Category::Assets]);
        seed_package(&layout, "bar", &[Category::Data]);

        remove(
            &RealRuntime,
            &config,
            &names(&["FOO"]),
            &BatchOptions::default(),
        )
        .unwrap();

        let manifest = saved(&layout);
        assert_eq!(manifest.installed_packages, vec!["bar"]);
        assert_consistent(&layout, &manifest);
    }

    #[test]
    fn test_remove_batch_stops_at_not_installed() {
        let dir = tempdir().unwrap();
        let before = Manifest::new(9, Modloader::Forge)
            .with_package("foo")
            .with_package("bar");
        let (config, layout) = initialized(dir.path(), &before);
        seed_package(&layout, "foo", &[Category::ServerScripts]);
        seed_package(&layout, "bar", &[Category::ServerScripts]);

        let err = remove(
            &RealRuntime,
            &config,
            &names(&["foo", "ghost", "bar"]),
            &BatchOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<KjspkgError>(),
            Some(KjspkgError::PackageNotInstalled(name)) if name == "ghost"
        ));
        let manifest = saved(&layout);
        assert_eq!(manifest.installed_packages, vec!["bar"]);
        assert_consistent(&layout, &manifest);
    }

    #[test]
    fn test_remove_batch_skip_missing() {
        let dir = tempdir().unwrap();
        let before = Manifest::new(9, Modloader::Forge).with_package("foo");
        let (config, layout) = initialized(dir.path(), &before);
        seed_package(&layout, "foo", &[Category::ServerScripts]);

        remove(
            &RealRuntime,
            &config,
            &names(&["ghost", "foo"]),
            &BatchOptions {
                quiet: false,
                skip_missing: true,
            },
        )
        .unwrap();

        assert!(saved(&layout).installed_packages.is_empty());
    }
}
