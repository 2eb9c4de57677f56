//! Folder command assembly

use super::project::FolderTarget;
use super::{require_id, require_name};
use crate::error::{ConnectorError, Result};
use crate::script::{
    Condition, ObjectRef, Projection, Query, ResultExpr, Statement, Value, Verb, WriteScript,
};

const FOLDER_VAR: &str = "theFolder";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderCreate {
    pub name: String,
    pub parent_path: Option<Vec<String>>,
    pub parent_id: Option<String>,
}

impl FolderCreate {
    pub fn build(&self) -> Result<WriteScript> {
        let name = require_name("name", &self.name)?;
        let parent = FolderTarget::from_refs(
            "parent_path",
            self.parent_path.as_deref(),
            "parent_id",
            self.parent_id.as_deref(),
        )?;
        let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var(FOLDER_VAR)));
        script.push(Statement::Make {
            var: FOLDER_VAR,
            class: "folder",
            at: match parent {
                None | Some(FolderTarget::TopLevel) => None,
                Some(target) => Some(target.location("folders")),
            },
            properties: vec![("name", Value::text(name))],
        });
        Ok(script)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderUpdate {
    pub name: Option<String>,
    pub parent_path: Option<Vec<String>>,
    pub parent_id: Option<String>,
    /// Dropped folders are hidden in OmniFocus
    pub dropped: Option<bool>,
}

impl FolderUpdate {
    pub fn build(&self, id: &str) -> Result<WriteScript> {
        let id = require_id("id", id)?;
        if *self == FolderUpdate::default() {
            return Err(ConnectorError::validation(
                "No fields to update; supply at least one field",
            ));
        }
        let parent = FolderTarget::from_refs(
            "parent_path",
            self.parent_path.as_deref(),
            "parent_id",
            self.parent_id.as_deref(),
        )?;
        if parent == Some(FolderTarget::Id(id.clone())) {
            return Err(ConnectorError::validation(
                "A folder cannot be moved into itself",
            ));
        }

        let target = || ObjectRef::Var(FOLDER_VAR);
        let mut script = WriteScript::new(ResultExpr::IdOf(target()));
        script.push(Statement::Bind {
            var: FOLDER_VAR,
            target: ObjectRef::FolderById(id),
        });
        if let Some(name) = &self.name {
            let name = require_name("name", name)?;
            script.push(Statement::set(target(), "name", Value::text(name)));
        }
        if let Some(dropped) = self.dropped {
            script.push(Statement::set(target(), "hidden", Value::Bool(dropped)));
        }
        if let Some(parent) = parent {
            script.push(Statement::Move {
                target: target(),
                to: parent.location("folders"),
            });
        }
        Ok(script)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderFilter {
    pub include_dropped: bool,
}

impl FolderFilter {
    pub fn build(&self) -> Query {
        let query = Query::new(Projection::Folder);
        if self.include_dropped {
            query
        } else {
            query.filter(Condition::is("hidden", Value::Bool(false)))
        }
    }
}

pub fn by_id(id: &str) -> Result<Query> {
    let id = require_id("id", id)?;
    Ok(Query::new(Projection::Folder).filter(Condition::is("id", Value::text(id))))
}

/// Delete a folder with everything inside it
pub fn delete(id: &str) -> Result<WriteScript> {
    let id = require_id("id", id)?;
    let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var(FOLDER_VAR)));
    script
        .push(Statement::Bind {
            var: FOLDER_VAR,
            target: ObjectRef::FolderById(id),
        })
        .capture_now()
        .push(Statement::Command {
            verb: Verb::Delete,
            target: ObjectRef::Var(FOLDER_VAR),
        });
    Ok(script)
}
