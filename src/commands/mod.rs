//! Command assemblers
//!
//! Each submodule turns a typed parameter set for one entity kind into a
//! [`WriteScript`](crate::script::WriteScript) or [`Query`](crate::script::Query).
//! All conflict checks happen here, before anything is executed.

pub mod folder;
pub mod perspective;
pub mod project;
pub mod tag;
pub mod task;

use crate::error::{ConnectorError, Result};
use crate::model::parse_datetime;
use crate::script::{Value, check_text};
use chrono::NaiveDateTime;

pub use folder::{FolderCreate, FolderFilter, FolderUpdate};
pub use perspective::SwitchPerspective;
pub use project::{ProjectCreate, ProjectFilter, ProjectUpdate};
pub use tag::{TagCreate, TagFilter, TagUpdate};
pub use task::{BatchTaskUpdate, TaskCreate, TaskFilter, TaskReorder, TaskUpdate};

/// A change to an optional field: clear it or set it
///
/// `None` at the field level means "leave untouched".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(v) => Some(v),
            Patch::Clear => None,
        }
    }
}

impl Patch<NaiveDateTime> {
    /// Parse a date argument where the empty string means "clear"
    pub fn parse_date(field: &str, input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Patch::Clear);
        }
        parse_datetime(input).map(Patch::Set).ok_or_else(|| {
            ConnectorError::validation(format!(
                "Invalid {} '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM (e.g., '2025-03-15')",
                field, input
            ))
        })
    }

    fn to_value(self) -> Value {
        match self {
            Patch::Set(d) => Value::Date(d),
            Patch::Clear => Value::Missing,
        }
    }
}

impl Patch<u32> {
    /// Parse a whole-number argument where the empty string means "clear"
    pub fn parse_minutes(field: &str, input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Patch::Clear);
        }
        trimmed.parse::<u32>().map(Patch::Set).map_err(|_| {
            ConnectorError::validation(format!(
                "Invalid {} '{}'. Use a whole number of minutes",
                field, input
            ))
        })
    }

    fn to_value(self) -> Value {
        match self {
            Patch::Set(n) => Value::Integer(i64::from(n)),
            Patch::Clear => Value::Missing,
        }
    }
}

/// Trim an identifier and make sure it is usable
pub(crate) fn require_id(field: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ConnectorError::validation(format!("{} must not be empty", field)));
    }
    check_text(field, id)?;
    Ok(id.to_string())
}

/// Names must be non-blank and free of reserved characters
pub(crate) fn require_name(field: &str, name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(ConnectorError::validation(format!("{} must not be empty", field)));
    }
    check_text(field, name)?;
    Ok(name.to_string())
}

/// Validate a folder path given as names from the top level down
pub(crate) fn check_path(field: &str, path: &[String]) -> Result<()> {
    for segment in path {
        if segment.trim().is_empty() {
            return Err(ConnectorError::validation(format!(
                "{} contains an empty folder name",
                field
            )));
        }
        check_text(field, segment)?;
    }
    Ok(())
}

/// Deduplicate ids while keeping their order
pub(crate) fn unique_ids(field: &str, ids: &[String]) -> Result<Vec<String>> {
    if ids.is_empty() {
        return Err(ConnectorError::validation(format!(
            "{} must contain at least one id",
            field
        )));
    }
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = require_id(field, id)?;
        if !out.contains(&id) {
            out.push(id);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_clear_sentinel() {
        assert_eq!(Patch::parse_date("due_date", "").unwrap(), Patch::Clear);
        assert_eq!(Patch::parse_date("due_date", "  ").unwrap(), Patch::Clear);
        assert!(matches!(
            Patch::parse_date("due_date", "2025-10-20").unwrap(),
            Patch::Set(_)
        ));
        assert!(Patch::parse_date("due_date", "tomorrow").is_err());
    }

    #[test]
    fn test_minutes_patch() {
        assert_eq!(Patch::parse_minutes("estimated_minutes", "").unwrap(), Patch::Clear);
        assert_eq!(
            Patch::parse_minutes("estimated_minutes", "45").unwrap(),
            Patch::Set(45)
        );
        assert!(Patch::parse_minutes("estimated_minutes", "-5").is_err());
    }

    #[test]
    fn test_unique_ids_keeps_order() {
        let ids = vec!["b".to_string(), " a ".to_string(), "b".to_string()];
        assert_eq!(unique_ids("ids", &ids).unwrap(), vec!["b", "a"]);
        assert!(unique_ids("ids", &[]).is_err());
        assert!(unique_ids("ids", &["".to_string()]).is_err());
    }
}
