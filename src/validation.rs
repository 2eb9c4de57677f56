//! Argument parsing for MCP tools
//!
//! Tool arguments arrive as strings; this module turns them into typed
//! command parameters and maps connector errors to MCP error codes.
//! The empty string clears an optional field wherever clearing is possible.

use crate::commands::Patch;
use crate::error::ConnectorError;
use crate::model::{ProjectStatus, TaskStatus, parse_datetime};
use chrono::NaiveDateTime;
use mcp_attr::{Error, ErrorCode, Result as McpResult};

/// Build an INVALID_PARAMS error with a client-visible message
pub fn invalid_params(message: impl Into<String>) -> Error {
    Error::new(ErrorCode::INVALID_PARAMS).with_message(message.into(), true)
}

/// Map a connector error to the MCP error a client should see
///
/// Caller mistakes (validation, safety) become INVALID_PARAMS, everything
/// else INTERNAL_ERROR. Messages are always public so clients can act on them.
pub fn to_mcp_error(err: ConnectorError) -> Error {
    let code = if err.is_caller_error() {
        ErrorCode::INVALID_PARAMS
    } else {
        ErrorCode::INTERNAL_ERROR
    };
    Error::new(code).with_message(err.to_string(), true)
}

/// Parse a required date
pub fn parse_date(field: &str, input: &str) -> McpResult<NaiveDateTime> {
    parse_datetime(input).ok_or_else(|| {
        invalid_params(format!(
            "Invalid {} '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM (e.g., '2025-03-15')",
            field, input
        ))
    })
}

/// Parse an optional date where "" is the same as absent
pub fn parse_optional_date(field: &str, input: Option<&str>) -> McpResult<Option<NaiveDateTime>> {
    match input {
        Some(s) if !s.trim().is_empty() => parse_date(field, s).map(Some),
        _ => Ok(None),
    }
}

/// Parse a date change where "" clears the field
pub fn parse_date_patch(
    field: &str,
    input: Option<&str>,
) -> McpResult<Option<Patch<NaiveDateTime>>> {
    input
        .map(|s| Patch::parse_date(field, s).map_err(to_mcp_error))
        .transpose()
}

/// Parse a minutes change where "" clears the field
pub fn parse_minutes_patch(field: &str, input: Option<&str>) -> McpResult<Option<Patch<u32>>> {
    input
        .map(|s| Patch::parse_minutes(field, s).map_err(to_mcp_error))
        .transpose()
}

pub fn parse_task_status(input: Option<&str>) -> McpResult<Option<TaskStatus>> {
    input
        .map(|s| {
            s.parse::<TaskStatus>().map_err(|_| {
                invalid_params(format!(
                    "Invalid status '{}'. Valid statuses: active, completed, dropped",
                    s
                ))
            })
        })
        .transpose()
}

pub fn parse_project_status(input: Option<&str>) -> McpResult<Option<ProjectStatus>> {
    input
        .map(|s| {
            s.parse::<ProjectStatus>().map_err(|_| {
                invalid_params(format!(
                    "Invalid status '{}'. Valid statuses: active, on_hold, done, dropped",
                    s
                ))
            })
        })
        .transpose()
}

/// Split a "Work/Clients" folder path; "" is the top level
pub fn parse_folder_path(input: Option<&str>) -> Option<Vec<String>> {
    input.map(|s| {
        if s.trim().is_empty() {
            Vec::new()
        } else {
            s.split('/').map(|part| part.trim().to_string()).collect()
        }
    })
}

/// Treat an empty string the same as an absent argument
pub fn non_empty(input: Option<String>) -> Option<String> {
    input.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_date_treats_empty_as_absent() {
        assert_eq!(parse_optional_date("due_date", Some("")).unwrap(), None);
        assert_eq!(parse_optional_date("due_date", None).unwrap(), None);
        assert!(parse_optional_date("due_date", Some("2025-13-01")).is_err());
    }

    #[test]
    fn test_date_patch_distinguishes_clear_from_absent() {
        assert_eq!(parse_date_patch("due_date", None).unwrap(), None);
        assert_eq!(
            parse_date_patch("due_date", Some("")).unwrap(),
            Some(Patch::Clear)
        );
        assert!(matches!(
            parse_date_patch("due_date", Some("2025-03-15")).unwrap(),
            Some(Patch::Set(_))
        ));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            parse_task_status(Some("completed")).unwrap(),
            Some(TaskStatus::Completed)
        );
        assert!(parse_task_status(Some("waiting")).is_err());
        assert_eq!(
            parse_project_status(Some("on hold")).unwrap(),
            Some(ProjectStatus::OnHold)
        );
    }

    #[test]
    fn test_folder_path_parsing() {
        assert_eq!(parse_folder_path(None), None);
        assert_eq!(parse_folder_path(Some("")), Some(vec![]));
        assert_eq!(
            parse_folder_path(Some("Work / Clients")),
            Some(vec!["Work".to_string(), "Clients".to_string()])
        );
    }
}
