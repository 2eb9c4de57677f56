use crate::error::ParseError;
use crate::parser::{FromRecord, Record};
use serde::{Deserialize, Serialize};

/// Compare tag or perspective names the way OmniFocus does, ignoring case
/// beyond ASCII ("Büro" matches "büro")
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// An OmniFocus tag, referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// Name of the enclosing tag for nested tags
    pub parent: Option<String>,
    pub hidden: bool,
}

impl FromRecord for Tag {
    const KIND: &'static str = "tag";
    const FIELDS: &'static [&'static str] = &["name", "parent", "hidden"];

    fn from_record(record: &Record<'_>) -> Result<Self, ParseError> {
        Ok(Tag {
            name: record.required_text("name")?,
            parent: record.opt_text("parent")?,
            hidden: record.bool("hidden")?,
        })
    }
}
