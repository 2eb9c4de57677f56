//! Project tool handlers

use crate::OmniFocusServerHandler;
use crate::commands::{ProjectCreate, ProjectFilter, ProjectUpdate};
use crate::formatting;
use crate::validation::{
    non_empty, parse_date, parse_date_patch, parse_folder_path, parse_optional_date,
    parse_project_status, to_mcp_error,
};
use mcp_attr::Result as McpResult;

impl OmniFocusServerHandler {
    pub async fn handle_list_projects(
        &self,
        folder_path: Option<String>,
        status: Option<String>,
        include_completed: Option<bool>,
        search: Option<String>,
        limit: Option<u32>,
    ) -> McpResult<String> {
        let filter = ProjectFilter {
            folder_path: parse_folder_path(non_empty(folder_path).as_deref()),
            status: parse_project_status(non_empty(status).as_deref())?,
            include_completed: include_completed.unwrap_or(false),
            search: non_empty(search),
            limit: limit.map(|n| n as usize),
        };
        let projects = self
            .connector
            .list_projects(&filter)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_list("projects", &projects)
    }

    pub async fn handle_get_project(&self, id: String) -> McpResult<String> {
        let project = self
            .connector
            .get_project(&id)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_item("project", project.as_ref())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn handle_create_project(
        &self,
        name: String,
        note: Option<String>,
        folder_path: Option<String>,
        folder_id: Option<String>,
        sequential: Option<bool>,
        flagged: Option<bool>,
        status: Option<String>,
        due_date: Option<String>,
        defer_date: Option<String>,
        review_interval_weeks: Option<u32>,
    ) -> McpResult<String> {
        let create = ProjectCreate {
            name,
            note: non_empty(note),
            folder_path: parse_folder_path(non_empty(folder_path).as_deref()),
            folder_id: non_empty(folder_id),
            sequential,
            flagged,
            status: parse_project_status(non_empty(status).as_deref())?,
            due_date: parse_optional_date("due_date", due_date.as_deref())?,
            defer_date: parse_optional_date("defer_date", defer_date.as_deref())?,
            review_interval_weeks,
        };
        let outcome = self
            .connector
            .create_project(&create)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_project(
        &self,
        id: String,
        name: Option<String>,
        note: Option<String>,
        folder_path: Option<String>,
        folder_id: Option<String>,
        sequential: Option<bool>,
        flagged: Option<bool>,
        status: Option<String>,
        due_date: Option<String>,
        defer_date: Option<String>,
        review_interval_weeks: Option<u32>,
        last_reviewed: Option<String>,
    ) -> McpResult<String> {
        let update = ProjectUpdate {
            name,
            note,
            // "" moves the project to the top level
            folder_path: parse_folder_path(folder_path.as_deref()),
            folder_id: non_empty(folder_id),
            sequential,
            flagged,
            status: parse_project_status(non_empty(status).as_deref())?,
            due_date: parse_date_patch("due_date", due_date.as_deref())?,
            defer_date: parse_date_patch("defer_date", defer_date.as_deref())?,
            review_interval_weeks,
            last_reviewed: non_empty(last_reviewed)
                .as_deref()
                .map(|s| parse_date("last_reviewed", s))
                .transpose()?,
        };
        let outcome = self
            .connector
            .update_project(&id, &update)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_delete_project(&self, id: String) -> McpResult<String> {
        let outcome = self
            .connector
            .delete_project(&id)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_batch_delete_projects(&self, ids: Vec<String>) -> McpResult<String> {
        let outcome = self
            .connector
            .batch_delete_projects(&ids)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }
}
