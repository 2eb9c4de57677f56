use crate::error::ParseError;
use crate::parser::{FromRecord, Record};
use serde::{Deserialize, Serialize};

/// An OmniFocus folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Names of the enclosing folders from the top level down
    pub parent_path: Vec<String>,
    pub dropped: bool,
}

impl Folder {
    /// Full path including this folder's own name
    pub fn path(&self) -> Vec<String> {
        let mut path = self.parent_path.clone();
        path.push(self.name.clone());
        path
    }
}

impl FromRecord for Folder {
    const KIND: &'static str = "folder";
    const FIELDS: &'static [&'static str] = &["id", "name", "parent_path", "dropped"];

    fn from_record(record: &Record<'_>) -> Result<Self, ParseError> {
        Ok(Folder {
            id: record.required_text("id")?,
            name: record.text("name")?,
            parent_path: record.list("parent_path")?,
            dropped: record.bool("dropped")?,
        })
    }
}
