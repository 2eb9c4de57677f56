//! Tag command assembly
//!
//! Tags are addressed by name; OmniFocus tag ids are not surfaced.

use super::require_name;
use crate::error::{ConnectorError, Result};
use crate::model::same_name;
use crate::script::{
    Condition, Location, ObjectRef, Projection, Query, ResultExpr, Statement, Value, Verb,
    WriteScript,
};

const TAG_VAR: &str = "theTag";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCreate {
    pub name: String,
    /// Existing tag to nest the new one under
    pub parent: Option<String>,
}

impl TagCreate {
    pub fn build(&self) -> Result<WriteScript> {
        let name = require_name("name", self.name.trim())?;
        let at = match &self.parent {
            Some(parent) => {
                let parent = require_name("parent", parent.trim())?;
                if same_name(&parent, &name) {
                    return Err(ConnectorError::validation(
                        "A tag cannot be nested under itself",
                    ));
                }
                Some(Location::EndOf(ObjectRef::TagByName(parent), "tags"))
            }
            None => None,
        };
        let mut script = WriteScript::new(ResultExpr::NameOf(ObjectRef::Var(TAG_VAR)));
        script.push(Statement::Make {
            var: TAG_VAR,
            class: "tag",
            at,
            properties: vec![("name", Value::text(name))],
        });
        Ok(script)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdate {
    pub name: String,
    pub new_name: Option<String>,
    /// Hidden tags correspond to "dropped" in the OmniFocus UI
    pub hidden: Option<bool>,
}

impl TagUpdate {
    pub fn build(&self) -> Result<WriteScript> {
        let name = require_name("name", self.name.trim())?;
        if self.new_name.is_none() && self.hidden.is_none() {
            return Err(ConnectorError::validation(
                "No fields to update; supply new_name or hidden",
            ));
        }
        let target = || ObjectRef::Var(TAG_VAR);
        let mut script = WriteScript::new(ResultExpr::NameOf(target()));
        script.push(Statement::Bind {
            var: TAG_VAR,
            target: ObjectRef::TagByName(name),
        });
        if let Some(new_name) = &self.new_name {
            let new_name = require_name("new_name", new_name.trim())?;
            script.push(Statement::set(target(), "name", Value::text(new_name)));
        }
        if let Some(hidden) = self.hidden {
            script.push(Statement::set(target(), "hidden", Value::Bool(hidden)));
        }
        Ok(script)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub include_hidden: bool,
}

impl TagFilter {
    pub fn build(&self) -> Query {
        let query = Query::new(Projection::Tag);
        if self.include_hidden {
            query
        } else {
            query.filter(Condition::is("hidden", Value::Bool(false)))
        }
    }
}

/// Delete a tag; tasks keep their other tags
pub fn delete(name: &str) -> Result<WriteScript> {
    let name = require_name("name", name.trim())?;
    let mut script = WriteScript::new(ResultExpr::NameOf(ObjectRef::Var(TAG_VAR)));
    script
        .push(Statement::Bind {
            var: TAG_VAR,
            target: ObjectRef::TagByName(name),
        })
        .capture_now()
        .push(Statement::Command {
            verb: Verb::Delete,
            target: ObjectRef::Var(TAG_VAR),
        });
    Ok(script)
}
