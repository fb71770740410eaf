//! Project configuration: the shared context handed to verify tasks.
//!
//! The host only needs the product→dist→dister mapping and the opaque
//! per-product output info; everything else in the file belongs to the
//! assets that consume it.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use crate::config::{DisterRecord, ProductDisterConfigs, ProductOutputInfos};
use crate::error::{Error, Result};

/// Environment variable overriding the project config file location.
pub const PROJECT_CONFIG_ENV: &str = "DISTGO_PROJECT_CONFIG";

const PROJECT_CONFIG_FILE: &str = "distgo.yml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub products: BTreeMap<String, ProductConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProductConfig {
    #[serde(default)]
    pub dists: BTreeMap<String, DisterRecord>,
    /// Opaque descriptor forwarded to assets as-is.
    #[serde(rename = "output-info", default)]
    pub output_info: Option<serde_json::Value>,
}

/// Path of the project config file: `DISTGO_PROJECT_CONFIG` when set,
/// otherwise `distgo.yml` in the current directory.
pub fn project_config_path() -> PathBuf {
    env::var(PROJECT_CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(PROJECT_CONFIG_FILE))
}

impl ProjectConfig {
    /// Load the project config, treating a missing file as an empty one.
    /// An existing but unparsable file is still an error.
    pub fn load_or_default() -> Result<ProjectConfig> {
        let path = project_config_path();
        if !path.exists() {
            return Ok(ProjectConfig::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<ProjectConfig> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
        })?;

        serde_yml::from_str(&raw)
            .map_err(|e| Error::config_invalid_yaml(path.to_string_lossy(), e.to_string()))
    }

    /// Full product→dist→record mapping.
    pub fn dister_configs(&self) -> ProductDisterConfigs {
        self.products
            .iter()
            .map(|(product_id, product)| (product_id.clone(), product.dists.clone()))
            .collect()
    }

    /// Product→output-info mapping; products without one are omitted.
    pub fn output_infos(&self) -> ProductOutputInfos {
        self.products
            .iter()
            .filter_map(|(product_id, product)| {
                product
                    .output_info
                    .as_ref()
                    .map(|info| (product_id.clone(), info.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distgo.yml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_products_dists_and_output_info() {
        let (_dir, path) = write_config(
            r#"
products:
  my-app:
    dists:
      bin:
        type: bin
        config:
          output-dir: out
    output-info:
      version: 1.2.3
"#,
        );

        let project = ProjectConfig::load_from(&path).unwrap();
        let configs = project.dister_configs();
        assert_eq!(configs["my-app"]["bin"].dister_name, "bin");

        let infos = project.output_infos();
        assert_eq!(infos["my-app"]["version"], "1.2.3");
    }

    #[test]
    fn products_without_output_info_are_omitted_from_infos() {
        let (_dir, path) = write_config(
            r#"
products:
  bare:
    dists:
      bin:
        type: bin
"#,
        );

        let project = ProjectConfig::load_from(&path).unwrap();
        assert!(project.output_infos().is_empty());
        assert_eq!(project.dister_configs().len(), 1);
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        let (_dir, path) = write_config("products: [not: a: map");
        let err = ProjectConfig::load_from(&path).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigInvalidYaml);
    }
}
