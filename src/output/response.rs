//! CLI response formatting and output.
//!
//! Built-in informational commands print a JSON envelope; task and verify
//! invocations are passthrough and report host-side errors on stderr only.

use distgo::error::Hint;
use distgo::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) {
    match serde_json::to_string_pretty(response) {
        Ok(payload) => println!("{}", payload),
        Err(e) => eprintln!("Failed to serialize response: {}", e),
    }
}

/// Print a JSON envelope for an informational command and return its exit code.
pub fn print_json_result<T: Serialize>(result: Result<T>) -> i32 {
    match result {
        Ok(data) => {
            print_response(&CliResponse::success(data));
            0
        }
        Err(err) => {
            print_response(&CliResponse::<()>::from_error(&err));
            exit_code_for_error(err.code)
        }
    }
}

/// Report a passthrough-mode failure and return its exit code.
///
/// Silent sentinels produce no output at all: the asset already explained
/// its failure on the shared stderr stream, and its exit code is forwarded
/// unchanged.
pub fn report_passthrough_error(err: &Error) -> i32 {
    if !err.is_silent() {
        eprintln!("Error: {}", err.message);
        for hint in &err.hints {
            eprintln!("  hint: {}", hint.message);
        }
    }

    if err.code == ErrorCode::AssetTaskFailed {
        if let Some(code) = err.details["exitCode"].as_i64() {
            if code > 0 {
                return code as i32;
            }
        }
    }

    exit_code_for_error(err.code)
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::AssetUnavailable
        | ErrorCode::AssetTypeInvalid
        | ErrorCode::CatalogMalformed
        | ErrorCode::CommandRegistration => 3,

        ErrorCode::InvocationFailed
        | ErrorCode::AssetTaskFailed
        | ErrorCode::ConfigInvalidYaml
        | ErrorCode::InternalIoError
        | ErrorCode::InternalUnexpected => 1,
    }
}
