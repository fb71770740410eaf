//! Structured values exchanged with assets over the temp-file channel.
//!
//! The host treats dister config blocks and product output info as opaque
//! serializable values: it filters and forwards them but never interprets
//! them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// One dist's configuration record: which dister owns it plus the raw
/// config block, carried verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisterRecord {
    /// Name of the dister asset this dist belongs to.
    #[serde(rename = "type")]
    pub dister_name: String,
    /// Opaque configuration for that dister.
    #[serde(default, skip_serializing_if = "is_null")]
    pub config: serde_yml::Value,
}

fn is_null(value: &serde_yml::Value) -> bool {
    matches!(value, serde_yml::Value::Null)
}

/// productID → distID → record. BTreeMaps keep the serialized form and all
/// iteration deterministic.
pub type ProductDisterConfigs = BTreeMap<String, BTreeMap<String, DisterRecord>>;

/// productID → opaque per-product output descriptor.
pub type ProductOutputInfos = BTreeMap<String, serde_json::Value>;

/// Filter a full config mapping down to the dists owned by one dister.
///
/// Products left with zero surviving dists are omitted entirely.
pub fn filter_dister_configs(
    configs: &ProductDisterConfigs,
    dister_name: &str,
) -> ProductDisterConfigs {
    let mut filtered = ProductDisterConfigs::new();

    for (product_id, dists) in configs {
        let surviving: BTreeMap<String, DisterRecord> = dists
            .iter()
            .filter(|(_, record)| record.dister_name == dister_name)
            .map(|(dist_id, record)| (dist_id.clone(), record.clone()))
            .collect();

        if !surviving.is_empty() {
            filtered.insert(product_id.clone(), surviving);
        }
    }

    filtered
}

/// Serialize a config mapping to the temp-file format (YAML).
pub fn dister_configs_to_bytes(configs: &ProductDisterConfigs) -> Result<Vec<u8>> {
    serde_yml::to_string(configs)
        .map(String::into_bytes)
        .map_err(|e| Error::internal_unexpected(format!("serialize dister configs: {}", e)))
}

/// Read a config mapping back from the temp-file format.
pub fn dister_configs_from_bytes(bytes: &[u8]) -> Result<ProductDisterConfigs> {
    serde_yml::from_slice(bytes)
        .map_err(|e| Error::config_invalid_yaml("dister configs", e.to_string()))
}

/// Serialize the output-info mapping to the temp-file format (JSON).
pub fn output_infos_to_bytes(infos: &ProductOutputInfos) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(infos)
        .map_err(|e| Error::internal_unexpected(format!("serialize output infos: {}", e)))
}
