//! Project command assembly

use super::{Patch, check_path, require_id, require_name, unique_ids};
use crate::error::{ConnectorError, Result};
use crate::model::{Project, ProjectStatus};
use crate::script::{
    Comparison, Condition, Constant, Location, ObjectRef, Projection, Query, ResultExpr,
    Statement, Value, Verb, WriteScript, check_text,
};
use chrono::NaiveDateTime;

const PROJECT_VAR: &str = "theProject";

/// Folder a project or folder should live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderTarget {
    TopLevel,
    Path(Vec<String>),
    Id(String),
}

impl FolderTarget {
    /// Resolve a path/id pair; an empty path means the top level
    pub fn from_refs(
        path_field: &str,
        path: Option<&[String]>,
        id_field: &str,
        id: Option<&str>,
    ) -> Result<Option<FolderTarget>> {
        match (path, id) {
            (Some(_), Some(_)) => Err(ConnectorError::validation(format!(
                "{} and {} are mutually exclusive; supply only one",
                path_field, id_field
            ))),
            (Some([]), None) => Ok(Some(FolderTarget::TopLevel)),
            (Some(path), None) => {
                check_path(path_field, path)?;
                Ok(Some(FolderTarget::Path(
                    path.iter().map(|s| s.trim().to_string()).collect(),
                )))
            }
            (None, Some(id)) if id.trim().is_empty() => Ok(Some(FolderTarget::TopLevel)),
            (None, Some(id)) => Ok(Some(FolderTarget::Id(require_id(id_field, id)?))),
            (None, None) => Ok(None),
        }
    }

    pub(crate) fn location(&self, elements: &'static str) -> Location {
        match self {
            FolderTarget::TopLevel => Location::EndOf(ObjectRef::Document, elements),
            FolderTarget::Path(path) => {
                Location::EndOf(ObjectRef::FolderByPath(path.clone()), elements)
            }
            FolderTarget::Id(id) => Location::EndOf(ObjectRef::FolderById(id.clone()), elements),
        }
    }
}

fn review_interval(weeks: u32) -> Result<Value> {
    if weeks == 0 {
        return Err(ConnectorError::validation(
            "review_interval_weeks must be at least 1",
        ));
    }
    Ok(Value::Record(vec![
        ("unit", Value::Constant(Constant::Week)),
        ("steps", Value::Integer(i64::from(weeks))),
    ]))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectCreate {
    pub name: String,
    pub note: Option<String>,
    /// Folder names from the top level down
    pub folder_path: Option<Vec<String>>,
    pub folder_id: Option<String>,
    pub sequential: Option<bool>,
    pub flagged: Option<bool>,
    pub status: Option<ProjectStatus>,
    pub due_date: Option<NaiveDateTime>,
    pub defer_date: Option<NaiveDateTime>,
    pub review_interval_weeks: Option<u32>,
}

impl ProjectCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn build(&self) -> Result<WriteScript> {
        let name = require_name("name", &self.name)?;
        let folder = FolderTarget::from_refs(
            "folder_path",
            self.folder_path.as_deref(),
            "folder_id",
            self.folder_id.as_deref(),
        )?;

        let mut properties = vec![("name", Value::text(name))];
        if let Some(note) = &self.note {
            check_text("note", note)?;
            properties.push(("note", Value::text(note.clone())));
        }
        if let Some(sequential) = self.sequential {
            properties.push(("sequential", Value::Bool(sequential)));
        }
        if let Some(flagged) = self.flagged {
            properties.push(("flagged", Value::Bool(flagged)));
        }
        if let Some(due) = self.due_date {
            properties.push(("due date", Value::Date(due)));
        }
        if let Some(defer) = self.defer_date {
            properties.push(("defer date", Value::Date(defer)));
        }

        let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var(PROJECT_VAR)));
        script.push(Statement::Make {
            var: PROJECT_VAR,
            class: "project",
            at: match folder {
                None | Some(FolderTarget::TopLevel) => None,
                Some(target) => Some(target.location("projects")),
            },
            properties,
        });
        if let Some(status) = self.status {
            script.push(Statement::set(
                ObjectRef::Var(PROJECT_VAR),
                "status",
                Value::Constant(status.into()),
            ));
        }
        if let Some(weeks) = self.review_interval_weeks {
            script.push(Statement::set(
                ObjectRef::Var(PROJECT_VAR),
                "review interval",
                review_interval(weeks)?,
            ));
        }
        Ok(script)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub note: Option<String>,
    pub folder_path: Option<Vec<String>>,
    pub folder_id: Option<String>,
    pub sequential: Option<bool>,
    pub flagged: Option<bool>,
    pub status: Option<ProjectStatus>,
    pub due_date: Option<Patch<NaiveDateTime>>,
    pub defer_date: Option<Patch<NaiveDateTime>>,
    pub review_interval_weeks: Option<u32>,
    /// Mark the project reviewed at this time
    pub last_reviewed: Option<NaiveDateTime>,
}

impl ProjectUpdate {
    fn is_empty(&self) -> bool {
        *self == ProjectUpdate::default()
    }

    pub fn build(&self, id: &str) -> Result<WriteScript> {
        let id = require_id("id", id)?;
        if self.is_empty() {
            return Err(ConnectorError::validation(
                "No fields to update; supply at least one field",
            ));
        }
        let folder = FolderTarget::from_refs(
            "folder_path",
            self.folder_path.as_deref(),
            "folder_id",
            self.folder_id.as_deref(),
        )?;

        let target = || ObjectRef::Var(PROJECT_VAR);
        let mut script = WriteScript::new(ResultExpr::IdOf(target()));
        script.push(Statement::Bind {
            var: PROJECT_VAR,
            target: ObjectRef::ProjectById(id),
        });
        if let Some(name) = &self.name {
            let name = require_name("name", name)?;
            script.push(Statement::set(target(), "name", Value::text(name)));
        }
        if let Some(note) = &self.note {
            check_text("note", note)?;
            script.push(Statement::set(target(), "note", Value::text(note.clone())));
        }
        if let Some(sequential) = self.sequential {
            script.push(Statement::set(target(), "sequential", Value::Bool(sequential)));
        }
        if let Some(flagged) = self.flagged {
            script.push(Statement::set(target(), "flagged", Value::Bool(flagged)));
        }
        if let Some(due) = self.due_date {
            script.push(Statement::set(target(), "due date", due.to_value()));
        }
        if let Some(defer) = self.defer_date {
            script.push(Statement::set(target(), "defer date", defer.to_value()));
        }
        if let Some(weeks) = self.review_interval_weeks {
            script.push(Statement::set(
                target(),
                "review interval",
                review_interval(weeks)?,
            ));
        }
        if let Some(reviewed) = self.last_reviewed {
            script.push(Statement::set(
                target(),
                "last review date",
                Value::Date(reviewed),
            ));
        }
        if let Some(status) = self.status {
            script.push(Statement::set(
                target(),
                "status",
                Value::Constant(status.into()),
            ));
        }
        if let Some(folder) = folder {
            script.push(Statement::Move {
                target: target(),
                to: folder.location("projects"),
            });
        }
        Ok(script)
    }

    /// Fields that did not take effect on a re-read project
    pub fn mismatches(&self, project: &Project) -> Vec<&'static str> {
        let mut out = Vec::new();
        if let Some(name) = &self.name
            && &project.name != name
        {
            out.push("name");
        }
        if let Some(note) = &self.note
            && &project.note != note
        {
            out.push("note");
        }
        if let Some(status) = self.status
            && project.status != status
        {
            out.push("status");
        }
        if let Some(sequential) = self.sequential
            && project.sequential != sequential
        {
            out.push("sequential");
        }
        if let Some(flagged) = self.flagged
            && project.flagged != flagged
        {
            out.push("flagged");
        }
        if let Some(due) = self.due_date
            && project.due_date != due.as_set().copied()
        {
            out.push("due_date");
        }
        if let Some(defer) = self.defer_date
            && project.defer_date != defer.as_set().copied()
        {
            out.push("defer_date");
        }
        if let Some(weeks) = self.review_interval_weeks
            && project.review_interval.and_then(|r| r.as_weeks()) != Some(weeks)
        {
            out.push("review_interval_weeks");
        }
        if let Some(reviewed) = self.last_reviewed
            && project.last_reviewed != Some(reviewed)
        {
            out.push("last_reviewed");
        }
        if let Some(path) = &self.folder_path {
            let want: Vec<&str> = path.iter().map(|s| s.trim()).collect();
            if project.folder_path != want {
                out.push("folder_path");
            }
        }
        if let Some(id) = &self.folder_id {
            let want = Some(id.trim()).filter(|id| !id.is_empty());
            if project.folder_id.as_deref() != want {
                out.push("folder_id");
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    /// Only projects somewhere below this folder
    pub folder_path: Option<Vec<String>>,
    pub status: Option<ProjectStatus>,
    /// Include done and dropped projects when no status is given
    pub include_completed: bool,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl ProjectFilter {
    pub fn is_full_scan(&self) -> bool {
        self.folder_path.is_none()
    }

    pub fn build(&self) -> Result<Query> {
        if self.limit == Some(0) {
            return Err(ConnectorError::validation("limit must be at least 1"));
        }
        let mut query = Query::new(Projection::Project);
        if let Some(path) = &self.folder_path
            && !path.is_empty()
        {
            check_path("folder_path", path)?;
            query = query.within(ObjectRef::FolderByPath(path.clone()), "flattened projects");
        }
        match self.status {
            Some(status) => {
                query = query.filter(Condition::is("status", Value::Constant(status.into())));
            }
            None if !self.include_completed => {
                query = query
                    .filter(Condition::new(
                        "status",
                        Comparison::IsNot,
                        Value::Constant(Constant::DoneStatus),
                    ))
                    .filter(Condition::new(
                        "status",
                        Comparison::IsNot,
                        Value::Constant(Constant::DroppedStatus),
                    ));
            }
            None => {}
        }
        if let Some(search) = &self.search {
            check_text("search", search)?;
            query = query.filter(Condition::new(
                "name",
                Comparison::Contains,
                Value::text(search.clone()),
            ));
        }
        Ok(query)
    }

    pub fn apply_post(&self, mut projects: Vec<Project>) -> Vec<Project> {
        if let Some(limit) = self.limit {
            projects.truncate(limit);
        }
        projects
    }
}

pub fn by_id(id: &str) -> Result<Query> {
    let id = require_id("id", id)?;
    Ok(Query::new(Projection::Project).filter(Condition::is("id", Value::text(id))))
}

/// Delete one project together with its tasks
pub fn delete(id: &str) -> Result<WriteScript> {
    let id = require_id("id", id)?;
    let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var(PROJECT_VAR)));
    script
        .push(Statement::Bind {
            var: PROJECT_VAR,
            target: ObjectRef::ProjectById(id),
        })
        .capture_now()
        .push(Statement::Command {
            verb: Verb::Delete,
            target: ObjectRef::Var(PROJECT_VAR),
        });
    Ok(script)
}

/// Validate a batch delete id list
pub fn batch_ids(ids: &[String]) -> Result<Vec<String>> {
    unique_ids("ids", ids)
}
