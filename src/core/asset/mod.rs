mod probe;
mod registry;

pub use probe::{determine_asset_type, discover_tasks};
pub use registry::AssetRegistry;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Argument passed to an asset to query its role.
pub const ASSET_TYPE_ARG: &str = "asset-type";

/// Argument passed to an asset to query its task catalog.
pub const TASK_INFOS_ARG: &str = "task-infos";

/// Flag whose value is the path of the product→dist→config temp file.
pub const CONFIG_FLAG: &str = "--config";

/// Flag whose value is the path of the product→output-info temp file.
pub const OUTPUT_INFO_FLAG: &str = "--output-info";

/// Role an asset implements. Closed set: any other value reported over the
/// wire fails the entire load. Declaration order is the natural ordering
/// used when flattening the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum AssetType {
    Dister,
    Publisher,
    DockerBuilder,
}

impl AssetType {
    pub const ALL: [AssetType; 3] = [
        AssetType::Dister,
        AssetType::Publisher,
        AssetType::DockerBuilder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Dister => "dister",
            AssetType::Publisher => "publisher",
            AssetType::DockerBuilder => "docker-builder",
        }
    }

    pub fn from_wire(value: &str) -> Result<AssetType> {
        match value {
            "dister" => Ok(AssetType::Dister),
            "publisher" => Ok(AssetType::Publisher),
            "docker-builder" => Ok(AssetType::DockerBuilder),
            other => Err(Error::validation_invalid_argument(
                "asset_type",
                format!("Unknown asset type '{}'", other),
            )),
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check/apply argument variants for a verify-capable task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOptions {
    #[serde(default)]
    pub apply_true_args: Vec<String>,
    #[serde(default)]
    pub apply_false_args: Vec<String>,
}

/// A task an asset contributes beyond its core role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Argv tokens the asset is invoked with for this task. At least one;
    /// exactly one when the task is auto-registered as a CLI command.
    pub command: Vec<String>,
    #[serde(rename = "registerAsTopLevelDistgoTaskCommand", default)]
    pub register_as_top_level: bool,
    #[serde(rename = "verifyOptions", skip_serializing_if = "Option::is_none", default)]
    pub verify_options: Option<VerifyOptions>,
}

/// An asset's self-declared set of provided tasks.
///
/// Tasks are keyed by name in a BTreeMap so iteration order is
/// lexicographic regardless of the order the asset declared them in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskCatalog {
    #[serde(rename = "asset-name")]
    pub asset_name: String,
    #[serde(rename = "task-infos", default)]
    pub tasks: BTreeMap<String, TaskInfo>,
}

/// A discovered asset executable. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: PathBuf,
    pub asset_type: AssetType,
    pub catalog: Option<TaskCatalog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_type_round_trips_wire_names() {
        for t in AssetType::ALL {
            assert_eq!(AssetType::from_wire(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn asset_type_rejects_unknown_wire_name() {
        assert!(AssetType::from_wire("linter").is_err());
        assert!(AssetType::from_wire("").is_err());
    }

    #[test]
    fn asset_type_natural_order_matches_declaration() {
        assert!(AssetType::Dister < AssetType::Publisher);
        assert!(AssetType::Publisher < AssetType::DockerBuilder);
    }

    #[test]
    fn catalog_parses_wire_shape() {
        let raw = r#"{
            "asset-name": "fmt",
            "task-infos": {
                "format": {
                    "name": "format",
                    "description": "Format source files",
                    "command": ["format"],
                    "registerAsTopLevelDistgoTaskCommand": true,
                    "verifyOptions": {
                        "applyTrueArgs": [],
                        "applyFalseArgs": ["--verify"]
                    }
                }
            }
        }"#;

        let catalog: TaskCatalog = serde_json::from_str(raw).unwrap();
        assert_eq!(catalog.asset_name, "fmt");
        let task = &catalog.tasks["format"];
        assert!(task.register_as_top_level);
        assert_eq!(task.command, vec!["format"]);
        assert_eq!(
            task.verify_options.as_ref().unwrap().apply_false_args,
            vec!["--verify"]
        );
    }

    #[test]
    fn catalog_tasks_iterate_lexicographically() {
        let raw = r#"{
            "asset-name": "multi",
            "task-infos": {
                "zeta": {"name": "zeta", "command": ["zeta"]},
                "alpha": {"name": "alpha", "command": ["alpha"]},
                "mid": {"name": "mid", "command": ["mid"]}
            }
        }"#;

        let catalog: TaskCatalog = serde_json::from_str(raw).unwrap();
        let names: Vec<&str> = catalog.tasks.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
