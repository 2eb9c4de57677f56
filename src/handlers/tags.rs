//! Tag tool handlers

use crate::OmniFocusServerHandler;
use crate::commands::{TagCreate, TagFilter, TagUpdate};
use crate::formatting;
use crate::validation::{non_empty, to_mcp_error};
use mcp_attr::Result as McpResult;

impl OmniFocusServerHandler {
    pub async fn handle_list_tags(&self, include_hidden: Option<bool>) -> McpResult<String> {
        let filter = TagFilter {
            include_hidden: include_hidden.unwrap_or(false),
        };
        let tags = self
            .connector
            .list_tags(&filter)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_list("tags", &tags)
    }

    pub async fn handle_create_tag(
        &self,
        name: String,
        parent: Option<String>,
    ) -> McpResult<String> {
        let create = TagCreate {
            name,
            parent: non_empty(parent),
        };
        let outcome = self
            .connector
            .create_tag(&create)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_update_tag(
        &self,
        name: String,
        new_name: Option<String>,
        hidden: Option<bool>,
    ) -> McpResult<String> {
        let update = TagUpdate {
            name,
            new_name,
            hidden,
        };
        let outcome = self
            .connector
            .update_tag(&update)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_delete_tag(&self, name: String) -> McpResult<String> {
        let outcome = self
            .connector
            .delete_tag(&name)
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }
}
