//! Perspective and database tool handlers

use crate::OmniFocusServerHandler;
use crate::commands::SwitchPerspective;
use crate::formatting;
use crate::validation::to_mcp_error;
use mcp_attr::Result as McpResult;

impl OmniFocusServerHandler {
    pub async fn handle_list_perspectives(&self) -> McpResult<String> {
        let perspectives = self
            .connector
            .list_perspectives()
            .await
            .map_err(to_mcp_error)?;
        formatting::format_list("perspectives", &perspectives)
    }

    pub async fn handle_switch_perspective(&self, name: String) -> McpResult<String> {
        let outcome = self
            .connector
            .switch_perspective(&SwitchPerspective { name })
            .await
            .map_err(to_mcp_error)?;
        formatting::format_outcome(&outcome)
    }

    pub async fn handle_database_info(&self) -> McpResult<String> {
        let info = self
            .connector
            .database_info()
            .await
            .map_err(to_mcp_error)?;
        formatting::format_item("database", Some(&info))
    }
}
