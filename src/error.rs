//! Error taxonomy for the OmniFocus connector
//!
//! Validation and safety errors are raised before any script runs.
//! Execution, timeout and parse errors describe a script that ran (or tried
//! to) and are kept apart so callers can tell "OmniFocus failed" from "we
//! misread its answer".

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Coarse error category reported to MCP clients and in batch outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Safety,
    Execution,
    Parse,
    Verification,
}

/// Output from the script engine did not match the expected record grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what}: {message}")]
pub struct ParseError {
    pub what: String,
    pub message: String,
}

impl ParseError {
    pub fn new(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid parameters: {0}")]
    Validation(String),

    #[error("Safety mode refused {operation}: {reason}")]
    Safety { operation: String, reason: String },

    #[error("osascript exited with {}: {stderr}", exit_label(*.code))]
    Execution { code: Option<i32>, stderr: String },

    #[error("osascript timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Failed to launch osascript: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Unexpected script output ({0})")]
    Parse(#[from] ParseError),
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code (killed by signal)".to_string(),
    }
}

impl ConnectorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Safety { .. } => ErrorKind::Safety,
            Self::Execution { .. } | Self::Timeout(_) | Self::Spawn(_) => ErrorKind::Execution,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }

    /// Errors a caller made, as opposed to failures on the OmniFocus side
    pub fn is_caller_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::Safety)
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_timeouts_with_execution() {
        let err = ConnectorError::Timeout(Duration::from_secs(30));
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert_eq!(err.to_string(), "osascript timed out after 30s");
    }

    #[test]
    fn test_execution_message_keeps_stderr() {
        let err = ConnectorError::Execution {
            code: Some(1),
            stderr: "execution error: OmniFocus got an error: Can't get task (-1728)".to_string(),
        };
        assert!(err.to_string().contains("exit code 1"));
        assert!(err.to_string().contains("-1728"));
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_parse_error_is_distinct() {
        let err: ConnectorError = ParseError::new("task record", "expected 14 fields, got 3").into();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("task record"));
    }
}
