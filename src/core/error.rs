use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    AssetUnavailable,
    AssetTypeInvalid,
    CatalogMalformed,
    CommandRegistration,

    InvocationFailed,
    AssetTaskFailed,

    ConfigInvalidYaml,
    ValidationInvalidArgument,

    InternalIoError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AssetUnavailable => "asset.unavailable",
            ErrorCode::AssetTypeInvalid => "asset.type_invalid",
            ErrorCode::CatalogMalformed => "asset.catalog_malformed",
            ErrorCode::CommandRegistration => "asset.command_registration",

            ErrorCode::InvocationFailed => "invocation.failed",
            ErrorCode::AssetTaskFailed => "invocation.asset_task_failed",

            ErrorCode::ConfigInvalidYaml => "config.invalid_yaml",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProbeDetails {
    pub asset_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRegistrationDetails {
    pub asset_path: String,
    pub asset_name: String,
    pub asset_type: String,
    pub task: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationFailedDetails {
    pub asset_path: String,
    pub command_line: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn asset_unavailable(asset_path: impl Into<String>, error: impl Into<String>) -> Self {
        let details = serde_json::to_value(AssetProbeDetails {
            asset_path: asset_path.into(),
            output: None,
            error: Some(error.into()),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::AssetUnavailable,
            "Failed to run asset type query",
            details,
        )
    }

    pub fn asset_type_invalid(
        asset_path: impl Into<String>,
        output: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let path = asset_path.into();
        let problem = problem.into();
        let details = serde_json::to_value(AssetProbeDetails {
            asset_path: path.clone(),
            output: Some(output.into()),
            error: None,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::AssetTypeInvalid,
            format!("Asset {} did not report a valid type: {}", path, problem),
            details,
        )
    }

    pub fn catalog_malformed(asset_path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = asset_path.into();
        let details = serde_json::to_value(AssetProbeDetails {
            asset_path: path.clone(),
            output: None,
            error: Some(error.into()),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::CatalogMalformed,
            format!("Asset {} reported an unparsable task catalog", path),
            details,
        )
    }

    pub fn command_registration(details: CommandRegistrationDetails) -> Self {
        let message = format!(
            "Cannot register task '{}' provided by {} asset '{}': {}",
            details.task, details.asset_type, details.asset_name, details.problem
        );
        let details =
            serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::CommandRegistration, message, details)
    }

    pub fn invocation_failed(
        asset_path: impl Into<String>,
        command_line: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let command_line = command_line.into();
        let error = error.into();
        let message = format!("Failed to run {}: {}", command_line, error);
        let details = serde_json::to_value(InvocationFailedDetails {
            asset_path: asset_path.into(),
            command_line,
            error,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InvocationFailed, message, details)
    }

    /// Sentinel for an asset that ran and exited non-zero. The asset is
    /// assumed to have already explained itself on the shared stderr, so the
    /// message is empty and callers must print nothing for this error.
    pub fn asset_task_failed(exit_code: i32) -> Self {
        Self::new(
            ErrorCode::AssetTaskFailed,
            "",
            serde_json::json!({ "exitCode": exit_code }),
        )
    }

    /// True when the error carries no message of its own because the asset
    /// already self-reported.
    pub fn is_silent(&self) -> bool {
        matches!(self.code, ErrorCode::AssetTaskFailed)
    }

    pub fn config_invalid_yaml(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        let details = serde_json::json!({
            "path": path,
            "error": error,
        });

        Self::new(
            ErrorCode::ConfigInvalidYaml,
            format!("Invalid YAML in {}", path),
            details,
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let details = serde_json::json!({
            "error": error,
            "context": context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
