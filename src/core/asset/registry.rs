use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::{determine_asset_type, discover_tasks, Asset, AssetType};

/// Immutable, ordered catalog of discovered assets.
///
/// Built once at startup and never mutated afterward. Within a type, assets
/// keep the order their paths were supplied in, so the command tree and all
/// listings are reproducible for a given input order.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<AssetType, Vec<Asset>>,
}

impl AssetRegistry {
    /// Probe each path for its role and task catalog, in caller order.
    ///
    /// Fails fast on the first type-probe error, discarding everything
    /// discovered so far: there is no partial registry. Catalog opt-outs
    /// (non-zero exit on the task query) are tolerated per asset.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<AssetRegistry> {
        let mut assets: BTreeMap<AssetType, Vec<Asset>> = BTreeMap::new();

        for path in paths {
            let path = path.as_ref();
            let asset_type = determine_asset_type(path)?;
            let catalog = discover_tasks(path)?;

            assets.entry(asset_type).or_default().push(Asset {
                path: path.to_path_buf(),
                asset_type,
                catalog,
            });
        }

        Ok(AssetRegistry { assets })
    }

    /// Build a registry from already-probed assets, preserving the order
    /// given within each type.
    pub fn from_assets(assets: Vec<Asset>) -> AssetRegistry {
        let mut by_type: BTreeMap<AssetType, Vec<Asset>> = BTreeMap::new();
        for asset in assets {
            by_type.entry(asset.asset_type).or_default().push(asset);
        }
        AssetRegistry { assets: by_type }
    }

    /// Asset paths of the given type, in discovery order.
    pub fn paths_for_type(&self, asset_type: AssetType) -> Vec<&PathBuf> {
        self.assets
            .get(&asset_type)
            .map(|assets| assets.iter().map(|a| &a.path).collect())
            .unwrap_or_default()
    }

    /// All assets, flattened in (type natural order, discovery order) —
    /// the canonical ordering for the command tree and verify list.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values().flatten()
    }

    /// Assets that provide a task catalog, in the canonical ordering.
    pub fn assets_with_catalogs(&self) -> Vec<&Asset> {
        self.assets().filter(|a| a.catalog.is_some()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.values().all(|v| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{TaskCatalog, TaskInfo};
    use std::collections::BTreeMap;

    fn asset(path: &str, asset_type: AssetType, catalog_name: Option<&str>) -> Asset {
        Asset {
            path: PathBuf::from(path),
            asset_type,
            catalog: catalog_name.map(|name| TaskCatalog {
                asset_name: name.to_string(),
                tasks: BTreeMap::new(),
            }),
        }
    }

    #[allow(dead_code)]
    fn task(name: &str) -> TaskInfo {
        TaskInfo {
            name: name.to_string(),
            description: String::new(),
            command: vec![name.to_string()],
            register_as_top_level: false,
            verify_options: None,
        }
    }

    #[test]
    fn assets_with_catalogs_orders_by_type_then_discovery() {
        let registry = AssetRegistry::from_assets(vec![
            asset("/p/pub-b", AssetType::Publisher, Some("pub-b")),
            asset("/p/docker", AssetType::DockerBuilder, Some("docker")),
            asset("/p/dist-z", AssetType::Dister, Some("dist-z")),
            asset("/p/pub-a", AssetType::Publisher, Some("pub-a")),
            asset("/p/dist-a", AssetType::Dister, Some("dist-a")),
        ]);

        let names: Vec<&str> = registry
            .assets_with_catalogs()
            .iter()
            .map(|a| a.catalog.as_ref().unwrap().asset_name.as_str())
            .collect();

        // Dister before Publisher before DockerBuilder; discovery order
        // within each type, not alphabetical.
        assert_eq!(names, vec!["dist-z", "dist-a", "pub-b", "pub-a", "docker"]);
    }

    #[test]
    fn permuting_same_type_inputs_changes_only_relative_order() {
        let forward = AssetRegistry::from_assets(vec![
            asset("/p/one", AssetType::Dister, Some("one")),
            asset("/p/two", AssetType::Dister, Some("two")),
        ]);
        let reversed = AssetRegistry::from_assets(vec![
            asset("/p/two", AssetType::Dister, Some("two")),
            asset("/p/one", AssetType::Dister, Some("one")),
        ]);

        let fwd: Vec<&PathBuf> = forward.paths_for_type(AssetType::Dister);
        let rev: Vec<&PathBuf> = reversed.paths_for_type(AssetType::Dister);
        assert_eq!(fwd.len(), 2);
        assert_eq!(fwd[0], rev[1]);
        assert_eq!(fwd[1], rev[0]);
    }

    #[test]
    fn assets_without_catalogs_are_recorded_but_not_listed_with_catalogs() {
        let registry = AssetRegistry::from_assets(vec![
            asset("/p/quiet", AssetType::Dister, None),
            asset("/p/loud", AssetType::Dister, Some("loud")),
        ]);

        assert_eq!(registry.paths_for_type(AssetType::Dister).len(), 2);
        assert_eq!(registry.assets_with_catalogs().len(), 1);
    }

    #[test]
    fn paths_for_unknown_type_is_empty() {
        let registry = AssetRegistry::default();
        assert!(registry.paths_for_type(AssetType::Publisher).is_empty());
        assert!(registry.is_empty());
    }
}
