//! Discovery probes run against candidate asset executables.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

use super::{AssetType, TaskCatalog, ASSET_TYPE_ARG, TASK_INFOS_ARG};

/// Query an executable for its role.
///
/// The asset must exit 0 and print a JSON string literal equal to one of the
/// known type names. The combined stdout and stderr is what gets parsed, so
/// an asset that muddies its type report with diagnostics fails the load
/// just like one printing garbage. Anything else fails too: a spawn failure,
/// a non-zero exit, or an unrecognized literal.
pub fn determine_asset_type(path: &Path) -> Result<AssetType> {
    let output = Command::new(path)
        .arg(ASSET_TYPE_ARG)
        .output()
        .map_err(|e| Error::asset_unavailable(path.to_string_lossy(), e.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let combined = combined_output(&stdout, &stderr);

    if !output.status.success() {
        return Err(Error::asset_type_invalid(
            path.to_string_lossy(),
            combined,
            format!("exit code {}", output.status.code().unwrap_or(-1)),
        ));
    }

    let literal: String = serde_json::from_str(&combined).map_err(|e| {
        Error::asset_type_invalid(
            path.to_string_lossy(),
            combined.clone(),
            format!("expected a JSON string literal: {}", e),
        )
    })?;

    AssetType::from_wire(&literal).map_err(|_| {
        Error::asset_type_invalid(
            path.to_string_lossy(),
            combined,
            format!("unrecognized asset type '{}'", literal),
        )
    })
}

/// Query an executable for the tasks it provides.
///
/// Only stdout is consulted so asset diagnostics on stderr cannot corrupt
/// the payload. A spawn failure or non-zero exit means the asset does not
/// provide extra tasks and is not an error; exit 0 with a body that fails to
/// parse as the catalog shape is fatal. The distinction rests solely on the
/// exit code.
pub fn discover_tasks(path: &Path) -> Result<Option<TaskCatalog>> {
    let output = match Command::new(path).arg(TASK_INFOS_ARG).output() {
        Ok(output) => output,
        Err(_) => return Ok(None),
    };

    if !output.status.success() {
        return Ok(None);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let catalog: TaskCatalog = serde_json::from_str(stdout.trim())
        .map_err(|e| Error::catalog_malformed(path.to_string_lossy(), e.to_string()))?;

    Ok(Some(catalog))
}

fn combined_output(stdout: &str, stderr: &str) -> String {
    if stderr.is_empty() {
        stdout.to_string()
    } else if stdout.is_empty() {
        stderr.to_string()
    } else {
        format!("{}\n{}", stdout, stderr)
    }
}
