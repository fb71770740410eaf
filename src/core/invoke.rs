//! Task invocation channel: drives a single asset subprocess call.
//!
//! Structured arguments cross the process boundary as named temp files so
//! assets can be written in any language; stdio is inherited so asset
//! diagnostics reach the user untransformed. Calls are blocking with no
//! internal timeout; an externally killed process is the only cancellation
//! path.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;

use crate::config::{
    dister_configs_to_bytes, output_infos_to_bytes, ProductDisterConfigs, ProductOutputInfos,
};
use crate::error::{Error, Result};
use crate::shell;

use super::asset::{CONFIG_FLAG, OUTPUT_INFO_FLAG};

/// One asset subprocess call: the command tokens the asset dispatches on,
/// the structured context for it, and any verbatim user args.
pub struct TaskInvocation<'a> {
    pub asset_path: &'a Path,
    pub command: &'a [String],
    pub dister_configs: &'a ProductDisterConfigs,
    pub output_infos: &'a ProductOutputInfos,
    pub forwarded_args: &'a [String],
}

/// Invoke an asset task.
///
/// Returns `Ok(())` on exit 0. A non-zero exit after a successful start is
/// the message-less [`Error::asset_task_failed`] sentinel: the asset has
/// already explained itself on the shared stderr and the caller must add
/// nothing. Any host-side failure (serialization, temp files, spawn) is a
/// descriptive error carrying the attempted command line.
///
/// The temp files live until the child exits, then are removed with it;
/// removal is best-effort only if the host is interrupted mid-call.
pub fn invoke(invocation: &TaskInvocation) -> Result<()> {
    let config_file = write_temp_file(
        invocation,
        "dister-config",
        &dister_configs_to_bytes(invocation.dister_configs)?,
    )?;
    let output_info_file = write_temp_file(
        invocation,
        "output-info",
        &output_infos_to_bytes(invocation.output_infos)?,
    )?;

    let args = build_args(invocation, config_file.path(), output_info_file.path());

    let status = Command::new(invocation.asset_path)
        .args(&args)
        .status()
        .map_err(|e| {
            Error::invocation_failed(
                invocation.asset_path.to_string_lossy(),
                render_command_line(invocation.asset_path, &args),
                e.to_string(),
            )
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::asset_task_failed(status.code().unwrap_or(-1)))
    }
}

/// Render the full command line for error messages.
pub fn render_command_line(asset_path: &Path, args: &[String]) -> String {
    let mut tokens = vec![shell::quote_arg(&asset_path.to_string_lossy())];
    tokens.extend(args.iter().map(|a| shell::quote_arg(a)));
    tokens.join(" ")
}

fn build_args(invocation: &TaskInvocation, config_path: &Path, info_path: &Path) -> Vec<String> {
    let mut args: Vec<String> = invocation.command.to_vec();
    args.push(format!("{}={}", CONFIG_FLAG, config_path.display()));
    args.push(format!("{}={}", OUTPUT_INFO_FLAG, info_path.display()));
    args.extend(invocation.forwarded_args.iter().cloned());
    args
}

fn write_temp_file(
    invocation: &TaskInvocation,
    label: &str,
    bytes: &[u8],
) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("distgo-{}-", label))
        .tempfile()
        .map_err(|e| host_failure(invocation, format!("create {} temp file: {}", label, e)))?;

    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| host_failure(invocation, format!("write {} temp file: {}", label, e)))?;

    Ok(file)
}

fn host_failure(invocation: &TaskInvocation, error: String) -> Error {
    let mut args: Vec<String> = invocation.command.to_vec();
    args.extend(invocation.forwarded_args.iter().cloned());
    Error::invocation_failed(
        invocation.asset_path.to_string_lossy(),
        render_command_line(invocation.asset_path, &args),
        error,
    )
}
