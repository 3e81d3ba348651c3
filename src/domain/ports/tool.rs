//! Tool port - callable capabilities handed to agents.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while executing a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("I/O error in {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {timeout_secs}s")]
    Timeout { tool: String, timeout_secs: u64 },

    #[error("{tool} failed: {message}")]
    ExecutionFailed { tool: String, message: String },
}

/// A tool an agent may call during its run.
///
/// `parameters` returns a JSON schema object describing the accepted
/// arguments; the runtime passes the model-supplied arguments to `call`
/// unchanged.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as exposed to the model.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema for the tool input.
    fn parameters(&self) -> Value;

    /// Whether the tool can modify the workspace.
    fn mutates(&self) -> bool {
        false
    }

    /// Execute the tool.
    async fn call(&self, args: Value) -> Result<String, ToolError>;
}

/// Deserialize a tool input object into `T`.
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, serde::Deserialize)]
    struct ReadArgs {
        file_path: String,
        #[serde(default)]
        limit: Option<usize>,
    }

    #[test]
    fn test_parse_args_present() {
        let args: ReadArgs = parse_args("read_file", json!({"file_path": "src/lib.rs"})).unwrap();
        assert_eq!(args.file_path, "src/lib.rs");
        assert!(args.limit.is_none());
    }

    #[test]
    fn test_parse_args_missing() {
        let err = parse_args::<ReadArgs>("read_file", json!({"other": 1})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("file_path"));
    }

    #[test]
    fn test_parse_args_wrong_type() {
        assert!(parse_args::<ReadArgs>("read_file", json!({"file_path": 42})).is_err());
    }
}
