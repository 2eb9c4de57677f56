use crate::error::ParseError;
use crate::parser::{FromRecord, Record};
use serde::{Deserialize, Serialize};

/// A built-in or custom perspective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    pub name: String,
    /// Shown in the front window right now
    pub current: bool,
}

impl FromRecord for Perspective {
    const KIND: &'static str = "perspective";
    const FIELDS: &'static [&'static str] = &["name", "current"];

    fn from_record(record: &Record<'_>) -> Result<Self, ParseError> {
        Ok(Perspective {
            name: record.required_text("name")?,
            current: record.bool("current")?,
        })
    }
}

/// Identity of the database OmniFocus currently has open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub document_name: String,
    pub app_version: String,
    pub task_count: u32,
    pub project_count: u32,
}

impl FromRecord for DatabaseInfo {
    const KIND: &'static str = "database info";
    const FIELDS: &'static [&'static str] =
        &["document_name", "app_version", "task_count", "project_count"];

    fn from_record(record: &Record<'_>) -> Result<Self, ParseError> {
        Ok(DatabaseInfo {
            document_name: record.required_text("document_name")?,
            app_version: record.text("app_version")?,
            task_count: record.u32("task_count")?,
            project_count: record.u32("project_count")?,
        })
    }
}
