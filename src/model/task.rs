use super::status::TaskStatus;
use super::tag::same_name;
use crate::error::ParseError;
use crate::parser::{FromRecord, Record};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An OmniFocus action (task or subtask)
///
/// `note` is plain text; rich text formatting in OmniFocus notes is not
/// representable and is flattened by the script engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// OmniFocus primary key (e.g. "hB3kX9_aQ2m")
    pub id: String,
    pub name: String,
    pub note: String,
    /// Containing project, absent for inbox tasks
    pub project_id: Option<String>,
    /// Parent action when this task is a subtask
    pub parent_task_id: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub defer_date: Option<NaiveDateTime>,
    pub flagged: bool,
    /// Tag names in the order OmniFocus reports them
    pub tags: Vec<String>,
    pub estimated_minutes: Option<u32>,
    pub status: TaskStatus,
    pub completed: bool,
    pub in_inbox: bool,
}

impl Task {
    /// Check if the task carries a tag (case-insensitive)
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| same_name(t, name))
    }
}

impl FromRecord for Task {
    const KIND: &'static str = "task";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "note",
        "project_id",
        "parent_task_id",
        "due_date",
        "defer_date",
        "flagged",
        "tags",
        "estimated_minutes",
        "completed",
        "dropped",
        "blocked",
        "in_inbox",
    ];

    fn from_record(record: &Record<'_>) -> Result<Self, ParseError> {
        let project_id = record.opt_text("project_id")?;
        // A top-level action reports its project's root task as parent
        let parent_task_id = record
            .opt_text("parent_task_id")?
            .filter(|parent| Some(parent) != project_id.as_ref());
        let completed = record.bool("completed")?;
        let dropped = record.bool("dropped")?;
        let blocked = record.bool("blocked")?;

        Ok(Task {
            id: record.required_text("id")?,
            name: record.text("name")?,
            note: record.text("note")?,
            project_id,
            parent_task_id,
            due_date: record.opt_datetime("due_date")?,
            defer_date: record.opt_datetime("defer_date")?,
            flagged: record.bool("flagged")?,
            tags: record.list("tags")?,
            estimated_minutes: record.opt_u32("estimated_minutes")?,
            status: TaskStatus::from_flags(completed, dropped, blocked),
            completed,
            in_inbox: record.bool("in_inbox")?,
        })
    }
}
