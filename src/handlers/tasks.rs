//! Task tool handlers

use crate::OmniFocusServerHandler;
use crate::commands::{BatchTaskUpdate, TaskCreate, TaskFilter, TaskReorder, TaskUpdate};
use crate::formatting;
use crate::validation::{
    non_empty, parse_date_patch, parse_minutes_patch, parse_optional_date, parse_task_status,
    to_mcp_error,
};
use mcp_attr::Result as McpResult;

/// Arguments shared by `update_task` and `batch_update_tasks`
#[derive(Debug, Default)]
pub struct TaskChangeArgs {
    pub project_id: Option<String>,
    pub parent_task_id: Option<String>,
    pub due_date: Option<String>,
    pub defer_date: Option<String>,
    pub flagged: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub add_tags: Option<Vec<String>>,
    pub remove_tags: Option<Vec<String>>,
    pub estimated_minutes: Option<String>,
    pub status: Option<String>,
}

impl TaskChangeArgs {
    fn into_batch(self) -> McpResult<BatchTaskUpdate> {
        Ok(BatchTaskUpdate {
            project_id: self.project_id,
            parent_task_id: self.parent_task_id,
            due_date: parse_date_patch("due_date", self.due_date.as_deref())?,
            defer_date: parse_date_patch("defer_date", self.defer_date.as_deref())?,
            flagged: self.flagged,
            tags: self.tags,
            add_tags: self.add_tags.unwrap_or_default(),
            remove_tags: self.remove_tags.unwrap_or_default(),
            estimated_minutes: parse_minutes_patch(
                "estimated_minutes",
                self.estimated_minutes.as_deref(),
            )?,
            status: parse_task_status(non_empty(self.status).as_deref())?,
        })
    }
}

impl OmniFocusServerHandler {
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_list_tasks(
        &self,
        project_id: Option<String>,
        tag: Option<String>,
        flagged: Option<bool>,
        include_completed: Option<bool>,
        inbox_only: Option<bool>,
        due_before: Option<String>,
        due_after: Option<String>,
        search: Option<String>,
        limit: Option<u32>,
    ) -> McpResult<String> {
        let filter = TaskFilter {
            project_id: non_empty(project_id),
            tag: non_empty(tag),
            flagged,
            include_completed: include_completed.unwrap_or(false),
            inbox_only: inbox_only.unwrap_or(false),
            due_before: parse_optional_date("due_before", due_before.as_deref())?,
            due_after: parse_optional_date("due_after", due_after.as_deref())?,
            search: non_empty(search),
            limit: limit.map(|n| n as usize),
        };
        let tasks = self
            .connector
            .list_tasks(&filter)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_list("tasks", &tasks)
    }

    pub async fn handle_get_task(&self, id: String) -> McpResult<String> {
        let task = self.connector.get_task(&id).await.map_err(to_mcp_error)?;
        formatting::format_item("task", task.as_ref())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn handle_create_task(
        &self,
        name: String,
        note: Option<String>,
        project_id: Option<String>,
        parent_task_id: Option<String>,
        due_date: Option<String>,
        defer_date: Option<String>,
        flagged: Option<bool>,
        tags: Option<Vec<String>>,
        estimated_minutes: Option<u32>,
    ) -> McpResult<String> {
        let create = TaskCreate {
            name,
            note: non_empty(note),
            project_id: non_empty(project_id),
            parent_task_id: non_empty(parent_task_id),
            due_date: parse_optional_date("due_date", due_date.as_deref())?,
            defer_date: parse_optional_date("defer_date", defer_date.as_deref())?,
            flagged,
            tags: tags.unwrap_or_default(),
            estimated_minutes,
        };
        let outcome = self
            .connector
            .create_task(&create)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_update_task(
        &self,
        id: String,
        name: Option<String>,
        note: Option<String>,
        changes: TaskChangeArgs,
    ) -> McpResult<String> {
        let batch = changes.into_batch()?;
        let update = TaskUpdate {
            name,
            note,
            ..batch.to_update()
        };
        let outcome = self
            .connector
            .update_task(&id, &update)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_batch_update_tasks(
        &self,
        ids: Vec<String>,
        changes: TaskChangeArgs,
    ) -> McpResult<String> {
        let batch = changes.into_batch()?;
        let outcome = self
            .connector
            .batch_update_tasks(&ids, &batch)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_delete_task(&self, id: String) -> McpResult<String> {
        let outcome = self
            .connector
            .delete_task(&id)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_batch_delete_tasks(&self, ids: Vec<String>) -> McpResult<String> {
        let outcome = self
            .connector
            .batch_delete_tasks(&ids)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_reorder_task(
        &self,
        id: String,
        before_id: Option<String>,
        after_id: Option<String>,
    ) -> McpResult<String> {
        let reorder = TaskReorder {
            id,
            before_id: non_empty(before_id),
            after_id: non_empty(after_id),
        };
        let outcome = self
            .connector
            .reorder_task(&reorder)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }
}
