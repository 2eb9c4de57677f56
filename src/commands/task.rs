//! Task command assembly
//!
//! Placement rules: a task lives in the inbox, in a project, or under a
//! parent task. Callers name at most one of `project_id` / `parent_task_id`;
//! `project_id = ""` means "back to the inbox".

use super::{Patch, require_id, require_name, unique_ids};
use crate::error::{ConnectorError, Result};
use crate::model::{Task, TaskStatus, same_name};
use crate::script::{
    Comparison, Condition, Location, ObjectRef, Projection, Query, ResultExpr, Statement, Value,
    Verb, WriteScript, check_text,
};
use chrono::NaiveDateTime;

const TASK_VAR: &str = "theTask";

/// Where a task should live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPlacement {
    Inbox,
    Project(String),
    ParentTask(String),
}

impl TaskPlacement {
    /// Resolve the two mutually exclusive hierarchy references
    pub fn from_refs(
        project_id: Option<&str>,
        parent_task_id: Option<&str>,
    ) -> Result<Option<TaskPlacement>> {
        match (project_id, parent_task_id) {
            (Some(_), Some(_)) => Err(ConnectorError::validation(
                "project_id and parent_task_id are mutually exclusive; supply only one",
            )),
            (Some(project), None) if project.trim().is_empty() => Ok(Some(TaskPlacement::Inbox)),
            (Some(project), None) => Ok(Some(TaskPlacement::Project(require_id(
                "project_id",
                project,
            )?))),
            (None, Some(parent)) => Ok(Some(TaskPlacement::ParentTask(require_id(
                "parent_task_id",
                parent,
            )?))),
            (None, None) => Ok(None),
        }
    }

    fn location(&self) -> Location {
        match self {
            TaskPlacement::Inbox => Location::EndOf(ObjectRef::Document, "inbox tasks"),
            TaskPlacement::Project(id) => {
                Location::EndOf(ObjectRef::ProjectById(id.clone()), "tasks")
            }
            TaskPlacement::ParentTask(id) => {
                Location::EndOf(ObjectRef::TaskById(id.clone()), "tasks")
            }
        }
    }
}

fn check_tags(field: &str, tags: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let name = require_name(field, tag.trim())?;
        if !out.iter().any(|t| same_name(t, &name)) {
            out.push(name);
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCreate {
    pub name: String,
    pub note: Option<String>,
    pub project_id: Option<String>,
    pub parent_task_id: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub defer_date: Option<NaiveDateTime>,
    pub flagged: Option<bool>,
    /// Tags are created when they do not exist yet
    pub tags: Vec<String>,
    pub estimated_minutes: Option<u32>,
}

impl TaskCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn build(&self) -> Result<WriteScript> {
        let name = require_name("name", &self.name)?;
        let placement =
            TaskPlacement::from_refs(self.project_id.as_deref(), self.parent_task_id.as_deref())?;
        let tags = check_tags("tags", &self.tags)?;

        let mut properties = vec![("name", Value::text(name))];
        if let Some(note) = &self.note {
            check_text("note", note)?;
            properties.push(("note", Value::text(note.clone())));
        }
        if let Some(due) = self.due_date {
            properties.push(("due date", Value::Date(due)));
        }
        if let Some(defer) = self.defer_date {
            properties.push(("defer date", Value::Date(defer)));
        }
        if let Some(flagged) = self.flagged {
            properties.push(("flagged", Value::Bool(flagged)));
        }
        if let Some(minutes) = self.estimated_minutes {
            properties.push(("estimated minutes", Value::Integer(i64::from(minutes))));
        }

        let make = match placement {
            None | Some(TaskPlacement::Inbox) => Statement::Make {
                var: TASK_VAR,
                class: "inbox task",
                at: None,
                properties,
            },
            Some(placement) => Statement::Make {
                var: TASK_VAR,
                class: "task",
                at: Some(placement.location()),
                properties,
            },
        };

        let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var(TASK_VAR)));
        script.push(make);
        for tag in tags {
            script.push(Statement::AddTag {
                target: ObjectRef::Var(TASK_VAR),
                tag: ObjectRef::EnsureTag(tag),
            });
        }
        Ok(script)
    }
}

/// Field changes for one task; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub note: Option<String>,
    pub project_id: Option<String>,
    pub parent_task_id: Option<String>,
    pub due_date: Option<Patch<NaiveDateTime>>,
    pub defer_date: Option<Patch<NaiveDateTime>>,
    pub flagged: Option<bool>,
    /// Replace the whole tag set
    pub tags: Option<Vec<String>>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
    pub estimated_minutes: Option<Patch<u32>>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.note.is_none()
            && self.project_id.is_none()
            && self.parent_task_id.is_none()
            && self.due_date.is_none()
            && self.defer_date.is_none()
            && self.flagged.is_none()
            && self.tags.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
            && self.estimated_minutes.is_none()
            && self.status.is_none()
    }

    /// Check parameter combinations without building anything
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ConnectorError::validation(
                "No fields to update; supply at least one field",
            ));
        }
        TaskPlacement::from_refs(self.project_id.as_deref(), self.parent_task_id.as_deref())?;
        if self.tags.is_some() && (!self.add_tags.is_empty() || !self.remove_tags.is_empty()) {
            return Err(ConnectorError::validation(
                "tags replaces the whole tag set and cannot be combined with add_tags or remove_tags",
            ));
        }
        let add = check_tags("add_tags", &self.add_tags)?;
        let remove = check_tags("remove_tags", &self.remove_tags)?;
        if let Some(both) = add
            .iter()
            .find(|a| remove.iter().any(|r| same_name(r, a)))
        {
            return Err(ConnectorError::validation(format!(
                "Tag '{}' appears in both add_tags and remove_tags",
                both
            )));
        }
        if let Some(name) = &self.name {
            require_name("name", name)?;
        }
        if let Some(note) = &self.note {
            check_text("note", note)?;
        }
        if self.status == Some(TaskStatus::Blocked) {
            return Err(ConnectorError::validation(
                "blocked is derived by OmniFocus and cannot be set; use active, completed or dropped",
            ));
        }
        Ok(())
    }

    pub fn build(&self, id: &str) -> Result<WriteScript> {
        let id = require_id("id", id)?;
        self.validate()?;
        let placement =
            TaskPlacement::from_refs(self.project_id.as_deref(), self.parent_task_id.as_deref())?;
        if placement == Some(TaskPlacement::ParentTask(id.clone())) {
            return Err(ConnectorError::validation(
                "A task cannot be its own parent",
            ));
        }

        let target = || ObjectRef::Var(TASK_VAR);
        let mut script = WriteScript::new(ResultExpr::IdOf(target()));
        script.push(Statement::Bind {
            var: TASK_VAR,
            target: ObjectRef::TaskById(id),
        });

        if let Some(name) = &self.name {
            script.push(Statement::set(target(), "name", Value::text(name.clone())));
        }
        if let Some(note) = &self.note {
            script.push(Statement::set(target(), "note", Value::text(note.clone())));
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
        if let Some(minutes) = self.estimated_minutes {
            script.push(Statement::set(target(), "estimated minutes", minutes.to_value()));
        }
        if let Some(placement) = placement {
            script.push(Statement::Move {
                target: target(),
                to: placement.location(),
            });
        }

        if let Some(tags) = &self.tags {
            script.push(Statement::ClearTags { target: target() });
            for tag in check_tags("tags", tags)? {
                script.push(Statement::AddTag {
                    target: target(),
                    tag: ObjectRef::EnsureTag(tag),
                });
            }
        }
        for tag in check_tags("add_tags", &self.add_tags)? {
            script.push(Statement::AddTag {
                target: target(),
                tag: ObjectRef::EnsureTag(tag),
            });
        }
        for tag in check_tags("remove_tags", &self.remove_tags)? {
            script.push(Statement::RemoveTag {
                target: target(),
                tag: ObjectRef::TagByName(tag),
            });
        }

        // Status goes last: completing a repeating task spawns the next
        // occurrence, which should carry the other changes.
        match self.status {
            Some(TaskStatus::Completed) => {
                script.push(Statement::Command {
                    verb: Verb::MarkComplete,
                    target: target(),
                });
            }
            Some(TaskStatus::Active) => {
                script.push(Statement::Command {
                    verb: Verb::MarkIncomplete,
                    target: target(),
                });
            }
            Some(TaskStatus::Dropped) => {
                script.push(Statement::Command {
                    verb: Verb::MarkDropped,
                    target: target(),
                });
            }
            Some(TaskStatus::Blocked) | None => {}
        }

        Ok(script)
    }

    /// Compare the fields this update sets against a re-read task
    ///
    /// Returns the names of fields that did not take effect.
    pub fn mismatches(&self, task: &Task) -> Vec<&'static str> {
        let mut out = Vec::new();
        if let Some(name) = &self.name
            && &task.name != name
        {
            out.push("name");
        }
        if let Some(note) = &self.note
            && &task.note != note
        {
            out.push("note");
        }
        if let Some(flagged) = self.flagged
            && task.flagged != flagged
        {
            out.push("flagged");
        }
        if let Some(due) = self.due_date
            && task.due_date != due.as_set().copied()
        {
            out.push("due_date");
        }
        if let Some(defer) = self.defer_date
            && task.defer_date != defer.as_set().copied()
        {
            out.push("defer_date");
        }
        if let Some(minutes) = self.estimated_minutes
            && task.estimated_minutes != minutes.as_set().copied()
        {
            out.push("estimated_minutes");
        }
        if let Some(tags) = &self.tags {
            let mut want: Vec<String> = tags.iter().map(|t| t.trim().to_lowercase()).collect();
            let mut have: Vec<String> = task.tags.iter().map(|t| t.to_lowercase()).collect();
            want.sort();
            want.dedup();
            have.sort();
            if want != have {
                out.push("tags");
            }
        }
        if self.add_tags.iter().any(|t| !task.has_tag(t.trim()))
            || self.remove_tags.iter().any(|t| task.has_tag(t.trim()))
        {
            out.push("tags");
        }
        if let Ok(Some(placement)) =
            TaskPlacement::from_refs(self.project_id.as_deref(), self.parent_task_id.as_deref())
        {
            match placement {
                TaskPlacement::Inbox if !task.in_inbox => out.push("project_id"),
                TaskPlacement::Project(id) if task.project_id.as_deref() != Some(id.as_str()) => {
                    out.push("project_id")
                }
                TaskPlacement::ParentTask(id)
                    if task.parent_task_id.as_deref() != Some(id.as_str()) =>
                {
                    out.push("parent_task_id")
                }
                _ => {}
            }
        }
        match self.status {
            Some(TaskStatus::Completed) if !task.completed => out.push("status"),
            Some(TaskStatus::Dropped) if task.status != TaskStatus::Dropped => out.push("status"),
            Some(TaskStatus::Active)
                if matches!(task.status, TaskStatus::Completed | TaskStatus::Dropped) =>
            {
                out.push("status")
            }
            _ => {}
        }
        out
    }
}

/// Changes applied identically to many tasks
///
/// `name` and `note` are deliberately absent: the same value on every
/// target is almost always a mistake.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchTaskUpdate {
    pub project_id: Option<String>,
    pub parent_task_id: Option<String>,
    pub due_date: Option<Patch<NaiveDateTime>>,
    pub defer_date: Option<Patch<NaiveDateTime>>,
    pub flagged: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
    pub estimated_minutes: Option<Patch<u32>>,
    pub status: Option<TaskStatus>,
}

impl BatchTaskUpdate {
    /// The single-item update applied to each id
    pub fn to_update(&self) -> TaskUpdate {
        TaskUpdate {
            name: None,
            note: None,
            project_id: self.project_id.clone(),
            parent_task_id: self.parent_task_id.clone(),
            due_date: self.due_date,
            defer_date: self.defer_date,
            flagged: self.flagged,
            tags: self.tags.clone(),
            add_tags: self.add_tags.clone(),
            remove_tags: self.remove_tags.clone(),
            estimated_minutes: self.estimated_minutes,
            status: self.status,
        }
    }

    /// Validate the shared changes against the full id list up front
    pub fn validate(&self, ids: &[String]) -> Result<Vec<String>> {
        let ids = unique_ids("ids", ids)?;
        self.to_update().validate()?;
        if let Some(parent) = &self.parent_task_id
            && ids.iter().any(|id| id == parent.trim())
        {
            return Err(ConnectorError::validation(format!(
                "parent_task_id '{}' is also one of the tasks being moved",
                parent.trim()
            )));
        }
        Ok(ids)
    }
}

/// Move a task directly before or after a sibling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskReorder {
    pub id: String,
    pub before_id: Option<String>,
    pub after_id: Option<String>,
}

impl TaskReorder {
    pub fn build(&self) -> Result<WriteScript> {
        let id = require_id("id", &self.id)?;
        let (reference, before) = match (&self.before_id, &self.after_id) {
            (Some(_), Some(_)) => {
                return Err(ConnectorError::validation(
                    "before_id and after_id are mutually exclusive; supply exactly one",
                ));
            }
            (None, None) => {
                return Err(ConnectorError::validation(
                    "Either before_id or after_id is required",
                ));
            }
            (Some(before), None) => (require_id("before_id", before)?, true),
            (None, Some(after)) => (require_id("after_id", after)?, false),
        };
        if reference == id {
            return Err(ConnectorError::validation(
                "A task cannot be positioned relative to itself",
            ));
        }
        let location = if before {
            Location::Before(ObjectRef::TaskById(reference))
        } else {
            Location::After(ObjectRef::TaskById(reference))
        };

        let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var(TASK_VAR)));
        script
            .push(Statement::Bind {
                var: TASK_VAR,
                target: ObjectRef::TaskById(id),
            })
            .push(Statement::Move {
                target: ObjectRef::Var(TASK_VAR),
                to: location,
            });
        Ok(script)
    }
}

/// Filters for listing tasks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub tag: Option<String>,
    pub flagged: Option<bool>,
    /// Include completed and dropped tasks
    pub include_completed: bool,
    pub inbox_only: bool,
    pub due_before: Option<NaiveDateTime>,
    pub due_after: Option<NaiveDateTime>,
    /// Case-insensitive substring of the task name
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TaskFilter {
    /// No filter narrows the source collection; reads the whole database
    pub fn is_full_scan(&self) -> bool {
        self.project_id.is_none() && self.tag.is_none() && !self.inbox_only
    }

    pub fn build(&self) -> Result<Query> {
        if self.inbox_only && self.project_id.is_some() {
            return Err(ConnectorError::validation(
                "inbox_only cannot be combined with project_id",
            ));
        }
        if let (Some(before), Some(after)) = (self.due_before, self.due_after)
            && before <= after
        {
            return Err(ConnectorError::validation(
                "due_before must be later than due_after",
            ));
        }
        if self.limit == Some(0) {
            return Err(ConnectorError::validation("limit must be at least 1"));
        }

        let mut query = Query::new(Projection::Task);
        if let Some(project) = &self.project_id {
            query = query.within(
                ObjectRef::ProjectById(require_id("project_id", project)?),
                "flattened tasks",
            );
        } else if let Some(tag) = &self.tag {
            query = query.within(ObjectRef::TagByName(require_name("tag", tag)?), "tasks");
            if self.inbox_only {
                query = query.filter(Condition::is("in inbox", Value::Bool(true)));
            }
        } else if self.inbox_only {
            query = query.elements("inbox tasks");
        }

        if let Some(flagged) = self.flagged {
            query = query.filter(Condition::is("flagged", Value::Bool(flagged)));
        }
        if !self.include_completed {
            query = query
                .filter(Condition::is("completed", Value::Bool(false)))
                .filter(Condition::is("dropped", Value::Bool(false)));
        }
        if let Some(before) = self.due_before {
            query = query.filter(Condition::new(
                "due date",
                Comparison::LessThan,
                Value::Date(before),
            ));
        }
        if let Some(after) = self.due_after {
            query = query.filter(Condition::new(
                "due date",
                Comparison::GreaterThan,
                Value::Date(after),
            ));
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

    /// Filters that are not pushed into the script: tag (when the source
    /// is a project) and limit.
    pub fn apply_post(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        if self.project_id.is_some()
            && let Some(tag) = &self.tag
        {
            tasks.retain(|t| t.has_tag(tag.trim()));
        }
        if let Some(limit) = self.limit {
            tasks.truncate(limit);
        }
        tasks
    }
}

/// Look up one task by id
pub fn by_id(id: &str) -> Result<Query> {
    let id = require_id("id", id)?;
    Ok(Query::new(Projection::Task).filter(Condition::is("id", Value::text(id))))
}

/// Delete one task
pub fn delete(id: &str) -> Result<WriteScript> {
    let id = require_id("id", id)?;
    let mut script = WriteScript::new(ResultExpr::IdOf(ObjectRef::Var(TASK_VAR)));
    script
        .push(Statement::Bind {
            var: TASK_VAR,
            target: ObjectRef::TaskById(id),
        })
        .capture_now()
        .push(Statement::Command {
            verb: Verb::Delete,
            target: ObjectRef::Var(TASK_VAR),
        });
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_datetime;

    fn render(script: &WriteScript) -> String {
        script.render("OmniFocus")
    }

    #[test]
    fn test_create_inbox_task() {
        let mut create = TaskCreate::new("Test");
        create.due_date = parse_datetime("2025-10-20");
        create.flagged = Some(true);
        create.tags = vec!["A".into(), "B".into(), "a".into()];
        let text = render(&create.build().unwrap());
        assert!(text.contains(
            "set theTask to make new inbox task with properties {name:\"Test\", due date:(my makeDate(2025, 10, 20, 0)), flagged:true}"
        ));
        assert!(text.contains("add (my ensureTag(\"A\")) to tags of theTask"));
        assert!(text.contains("add (my ensureTag(\"B\")) to tags of theTask"));
        assert_eq!(text.matches("ensureTag(\"").count(), 2);
    }

    #[test]
    fn test_create_in_project_and_under_parent() {
        let mut create = TaskCreate::new("Sub");
        create.parent_task_id = Some("t9".into());
        let text = render(&create.build().unwrap());
        assert!(text.contains(
            "make new task at end of tasks of (first flattened task whose id is \"t9\")"
        ));

        create.parent_task_id = None;
        create.project_id = Some("p1".into());
        let text = render(&create.build().unwrap());
        assert!(text.contains(
            "make new task at end of tasks of (first flattened project whose id is \"p1\")"
        ));
    }

    #[test]
    fn test_create_rejects_both_placements() {
        let mut create = TaskCreate::new("x");
        create.project_id = Some("p1".into());
        create.parent_task_id = Some("t1".into());
        assert!(matches!(create.build(), Err(ConnectorError::Validation(_))));
    }

    #[test]
    fn test_update_emits_only_supplied_fields() {
        let update = TaskUpdate {
            flagged: Some(false),
            ..Default::default()
        };
        let script = update.build("t1").unwrap();
        assert_eq!(script.mutation_count(), 1);
        let text = render(&script);
        assert!(text.contains("set flagged of theTask to false"));
        assert!(!text.contains("due date of theTask"));
        assert!(!text.contains("name of theTask to"));
    }

    #[test]
    fn test_update_clear_versus_set_date() {
        let clear = TaskUpdate {
            due_date: Some(Patch::Clear),
            ..Default::default()
        };
        assert!(render(&clear.build("t1").unwrap())
            .contains("set due date of theTask to missing value"));

        let set = TaskUpdate {
            defer_date: Some(Patch::Set(parse_datetime("2025-01-02 08:00").unwrap())),
            ..Default::default()
        };
        assert!(render(&set.build("t1").unwrap())
            .contains("set defer date of theTask to (my makeDate(2025, 1, 2, 28800))"));
    }

    #[test]
    fn test_update_conflicts() {
        let hierarchy = TaskUpdate {
            project_id: Some("p1".into()),
            parent_task_id: Some("t2".into()),
            ..Default::default()
        };
        assert!(matches!(hierarchy.build("t1"), Err(ConnectorError::Validation(_))));

        let tags = TaskUpdate {
            tags: Some(vec!["A".into()]),
            add_tags: vec!["B".into()],
            ..Default::default()
        };
        assert!(matches!(tags.build("t1"), Err(ConnectorError::Validation(_))));

        let overlap = TaskUpdate {
            add_tags: vec!["Home".into()],
            remove_tags: vec!["home".into()],
            ..Default::default()
        };
        assert!(overlap.build("t1").is_err());

        assert!(TaskUpdate::default().build("t1").is_err());
    }

    #[test]
    fn test_update_move_to_inbox_and_parent() {
        let inbox = TaskUpdate {
            project_id: Some(String::new()),
            ..Default::default()
        };
        assert!(render(&inbox.build("t1").unwrap())
            .contains("move theTask to end of inbox tasks"));

        let own_parent = TaskUpdate {
            parent_task_id: Some("t1".into()),
            ..Default::default()
        };
        assert!(own_parent.build("t1").is_err());
    }

    #[test]
    fn test_update_replaces_tags() {
        let update = TaskUpdate {
            tags: Some(vec!["Work".into()]),
            ..Default::default()
        };
        let text = render(&update.build("t1").unwrap());
        let clear = text.find("remove (tags of theTask) from tags of theTask").unwrap();
        let add = text.find("add (my ensureTag(\"Work\")) to tags of theTask").unwrap();
        assert!(clear < add);
    }

    #[test]
    fn test_status_uses_mark_commands() {
        let complete = TaskUpdate {
            status: Some(TaskStatus::Completed),
            flagged: Some(true),
            ..Default::default()
        };
        let text = render(&complete.build("t1").unwrap());
        assert!(text.contains("mark complete theTask"));
        assert!(text.find("set flagged").unwrap() < text.find("mark complete").unwrap());

        let blocked = TaskUpdate {
            status: Some(TaskStatus::Blocked),
            ..Default::default()
        };
        assert!(blocked.build("t1").is_err());
    }

    #[test]
    fn test_reorder_requires_exactly_one_reference() {
        let neither = TaskReorder {
            id: "t1".into(),
            ..Default::default()
        };
        assert!(matches!(neither.build(), Err(ConnectorError::Validation(_))));

        let both = TaskReorder {
            id: "t1".into(),
            before_id: Some("t2".into()),
            after_id: Some("t3".into()),
        };
        assert!(matches!(both.build(), Err(ConnectorError::Validation(_))));

        let itself = TaskReorder {
            id: "t1".into(),
            after_id: Some("t1".into()),
            ..Default::default()
        };
        assert!(itself.build().is_err());

        let after = TaskReorder {
            id: "t1".into(),
            after_id: Some("t3".into()),
            ..Default::default()
        };
        assert!(render(&after.build().unwrap())
            .contains("move theTask to after (first flattened task whose id is \"t3\")"));
    }

    #[test]
    fn test_filter_defaults_hide_completed() {
        let query = TaskFilter::default().build().unwrap();
        let text = query.render("OmniFocus");
        assert!(text.contains("every flattened task whose (completed is q1) and (dropped is q2)"));
        assert!(TaskFilter::default().is_full_scan());
    }

    #[test]
    fn test_filter_validation() {
        let filter = TaskFilter {
            inbox_only: true,
            project_id: Some("p1".into()),
            ..Default::default()
        };
        assert!(filter.build().is_err());

        let range = TaskFilter {
            due_before: parse_datetime("2025-01-01"),
            due_after: parse_datetime("2025-02-01"),
            ..Default::default()
        };
        assert!(range.build().is_err());
    }

    #[test]
    fn test_batch_validate_rejects_self_parent() {
        let batch = BatchTaskUpdate {
            parent_task_id: Some("t2".into()),
            ..Default::default()
        };
        assert!(batch.validate(&["t1".into(), "t2".into()]).is_err());
        assert_eq!(batch.validate(&["t1".into(), "t1".into()]).unwrap(), vec!["t1"]);
    }

    #[test]
    fn test_delete_captures_id_first() {
        let text = render(&delete("t1").unwrap());
        assert!(text.find("set resultId to id of theTask").unwrap() < text.find("delete theTask").unwrap());
    }

    fn reread(id: &str) -> Task {
        Task {
            id: id.into(),
            name: "Call".into(),
            note: String::new(),
            project_id: Some("p1".into()),
            parent_task_id: None,
            due_date: None,
            defer_date: None,
            flagged: false,
            tags: vec!["Büro".into()],
            estimated_minutes: None,
            status: TaskStatus::Active,
            completed: false,
            in_inbox: false,
        }
    }

    #[test]
    fn test_mismatches_check_placement() {
        let task = reread("t1");
        let to_project = TaskUpdate {
            project_id: Some("p2".into()),
            ..Default::default()
        };
        assert_eq!(to_project.mismatches(&task), vec!["project_id"]);

        let to_inbox = TaskUpdate {
            project_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(to_inbox.mismatches(&task), vec!["project_id"]);

        let under_parent = TaskUpdate {
            parent_task_id: Some("t9".into()),
            ..Default::default()
        };
        assert_eq!(under_parent.mismatches(&task), vec!["parent_task_id"]);

        let stays = TaskUpdate {
            project_id: Some("p1".into()),
            ..Default::default()
        };
        assert!(stays.mismatches(&task).is_empty());
    }

    #[test]
    fn test_tag_names_match_beyond_ascii() {
        assert_eq!(
            check_tags("tags", &["Büro".into(), "BÜRO".into()]).unwrap(),
            vec!["Büro"]
        );
        let conflict = TaskUpdate {
            add_tags: vec!["büro".into()],
            remove_tags: vec!["BÜRO".into()],
            ..Default::default()
        };
        assert!(conflict.build("t1").is_err());

        let filter = TaskFilter {
            project_id: Some("p1".into()),
            tag: Some("BÜRO".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply_post(vec![reread("t1")]).len(), 1);
    }
}
