//! Folder tool handlers

use crate::OmniFocusServerHandler;
use crate::commands::{FolderCreate, FolderFilter, FolderUpdate};
use crate::formatting;
use crate::validation::{non_empty, parse_folder_path, to_mcp_error};
use mcp_attr::Result as McpResult;

impl OmniFocusServerHandler {
    pub async fn handle_list_folders(&self, include_dropped: Option<bool>) -> McpResult<String> {
        let filter = FolderFilter {
            include_dropped: include_dropped.unwrap_or(false),
        };
        let folders = self
            .connector
            .list_folders(&filter)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_list("folders", &folders)
    }

    pub async fn handle_get_folder(&self, id: String) -> McpResult<String> {
        let folder = self.connector.get_folder(&id).await.map_err(to_mcp_error)?;
        formatting::format_item("folder", folder.as_ref())
    }

    pub async fn handle_create_folder(
        &self,
        name: String,
        parent_path: Option<String>,
        parent_id: Option<String>,
    ) -> McpResult<String> {
        let create = FolderCreate {
            name,
            parent_path: parse_folder_path(non_empty(parent_path).as_deref()),
            parent_id: non_empty(parent_id),
        };
        let outcome = self
            .connector
            .create_folder(&create)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_update_folder(
        &self,
        id: String,
        name: Option<String>,
        parent_path: Option<String>,
        parent_id: Option<String>,
        dropped: Option<bool>,
    ) -> McpResult<String> {
        let update = FolderUpdate {
            name,
            parent_path: parse_folder_path(parent_path.as_deref()),
            parent_id: non_empty(parent_id),
            dropped,
        };
        let outcome = self
            .connector
            .update_folder(&id, &update)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_delete_folder(&self, id: String) -> McpResult<String> {
        let outcome = self
            .connector
            .delete_folder(&id)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }
}
