use clap::Args;
use distgo::asset::AssetRegistry;
use distgo::tree::TaskCommandTree;
use serde::Serialize;

#[derive(Args)]
pub struct AssetsArgs {}

#[derive(Serialize)]
pub struct AssetsOutput {
    pub assets: Vec<AssetEntry>,
    pub top_level_tasks: Vec<String>,
}

#[derive(Serialize)]
pub struct AssetEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<String>,
}

/// List discovered assets in registry order, with their task names and the
/// top-level aliases that were claimed.
pub fn run(
    _args: AssetsArgs,
    registry: &AssetRegistry,
    tree: &TaskCommandTree,
) -> distgo::Result<AssetsOutput> {
    let assets = registry
        .assets()
        .map(|asset| AssetEntry {
            path: asset.path.to_string_lossy().to_string(),
            asset_type: asset.asset_type.as_str().to_string(),
            name: asset.catalog.as_ref().map(|c| c.asset_name.clone()),
            tasks: asset
                .catalog
                .as_ref()
                .map(|c| c.tasks.keys().cloned().collect())
                .unwrap_or_default(),
        })
        .collect();

    Ok(AssetsOutput {
        assets,
        top_level_tasks: tree.alias_names().iter().map(|s| s.to_string()).collect(),
    })
}
