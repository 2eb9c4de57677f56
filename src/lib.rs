//! OmniFocus MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server that drives
//! OmniFocus on macOS through generated AppleScript.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `OmniFocusServerHandler` and `handlers` - tool arguments in, JSON out
//! - **Connector Layer**: `connector` and `commands` - validation, script assembly, outcomes
//! - **Script Layer**: `script`, `executor` and `parser` - AppleScript text, osascript, response grammar
//!
//! # Example
//!
//! ```no_run
//! use omnifocus_mcp::{Config, OmniFocusServerHandler};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = OmniFocusServerHandler::new(Config::load(None)?);
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod connector;
pub mod error;
pub mod executor;
mod formatting;
mod handlers;
pub mod model;
pub mod outcome;
pub mod parser;
pub mod script;
mod validation;

use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::sync::Arc;

pub use config::{CallClass, Config};
pub use connector::Connector;
pub use error::{ConnectorError, ErrorKind};
pub use executor::{OsaScriptRunner, ScriptOutput, ScriptRunner};
pub use handlers::tasks::TaskChangeArgs;
pub use outcome::{ItemFailure, WriteOutcome};

/// MCP Server handler for OmniFocus
///
/// Every tool call becomes one connector operation. Batch tools run one
/// script per item.
pub struct OmniFocusServerHandler {
    pub(crate) connector: Connector,
}

impl OmniFocusServerHandler {
    /// Create a handler that talks to OmniFocus through osascript
    pub fn new(config: Config) -> Self {
        Self {
            connector: Connector::with_osascript(config),
        }
    }

    /// Create a handler with a custom script runner
    pub fn with_runner(config: Config, runner: Arc<dyn ScriptRunner>) -> Self {
        Self {
            connector: Connector::new(config, runner),
        }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }
}

/// OmniFocus task management server.
///
/// Reads and writes the OmniFocus database of the logged-in macOS user.
///
/// Key concepts:
/// - **task**: an action; lives in the inbox, in a project, or under a parent task
/// - **project**: a multi-step outcome, optionally inside a folder
/// - **folder**: groups projects and other folders; addressed by id or by path like "Work/Clients"
/// - **tag**: a context label, addressed by name
/// - **perspective**: a saved view shown in the OmniFocus window
///
/// Dates use YYYY-MM-DD or YYYY-MM-DD HH:MM in local time.
/// In update tools an empty string "" clears an optional field.
/// Write tools return {success, affected_ids, failures}; a failure carries
/// kind (validation/safety/execution/parse/verification) and message.
#[mcp_server]
impl McpServer for OmniFocusServerHandler {
    /// **List tasks**: Filter by project, tag, flag, inbox and due range. Completed and dropped tasks are hidden unless include_completed=true.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn list_tasks(
        &self,
        /// Only tasks in this project (optional)
        project_id: Option<String>,
        /// Only tasks carrying this tag name (optional)
        tag: Option<String>,
        /// Only flagged (true) or unflagged (false) tasks (optional)
        flagged: Option<bool>,
        /// Include completed and dropped tasks (default false)
        include_completed: Option<bool>,
        /// Only inbox tasks; cannot be combined with project_id (default false)
        inbox_only: Option<bool>,
        /// Due strictly before this date (optional)
        due_before: Option<String>,
        /// Due strictly after this date (optional)
        due_after: Option<String>,
        /// Name contains this text (optional)
        search: Option<String>,
        /// Maximum number of tasks to return (optional)
        limit: Option<u32>,
    ) -> McpResult<String> {
        self.handle_list_tasks(
            project_id,
            tag,
            flagged,
            include_completed,
            inbox_only,
            due_before,
            due_after,
            search,
            limit,
        )
        .await
    }

    /// **Get task**: Fetch one task by id. Returns {"task": null} when it does not exist.
    #[tool]
    async fn get_task(
        &self,
        /// Task id
        id: String,
    ) -> McpResult<String> {
        self.handle_get_task(id).await
    }

    /// **Create task**: Add a task to the inbox (default), a project, or under a parent task.
    /// **Note**: project_id and parent_task_id are mutually exclusive. Missing tags are created.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn create_task(
        &self,
        /// Task name
        name: String,
        /// Note text (optional)
        note: Option<String>,
        /// Project to add the task to (optional)
        project_id: Option<String>,
        /// Parent task to nest under (optional)
        parent_task_id: Option<String>,
        /// Due date (optional)
        due_date: Option<String>,
        /// Defer date (optional)
        defer_date: Option<String>,
        /// Flag the task (optional)
        flagged: Option<bool>,
        /// Tag names (optional)
        tags: Option<Vec<String>>,
        /// Estimated duration in minutes (optional)
        estimated_minutes: Option<u32>,
    ) -> McpResult<String> {
        self.handle_create_task(
            name,
            note,
            project_id,
            parent_task_id,
            due_date,
            defer_date,
            flagged,
            tags,
            estimated_minutes,
        )
        .await
    }

    /// **Update task**: Change only the fields you supply.
    /// **Tip**: Use "" to clear due_date, defer_date, estimated_minutes or note; project_id="" moves the task to the inbox.
    /// **Status**: active/completed/dropped. Completing a repeating task creates its next occurrence.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update_task(
        &self,
        /// Task id
        id: String,
        /// New name (optional)
        name: Option<String>,
        /// New note, ""=clear (optional)
        note: Option<String>,
        /// Move to this project, ""=inbox (optional)
        project_id: Option<String>,
        /// Move under this parent task (optional)
        parent_task_id: Option<String>,
        /// Due date, ""=clear (optional)
        due_date: Option<String>,
        /// Defer date, ""=clear (optional)
        defer_date: Option<String>,
        /// Flag state (optional)
        flagged: Option<bool>,
        /// Replace all tags with these; cannot be combined with add_tags/remove_tags (optional)
        tags: Option<Vec<String>>,
        /// Tags to add (optional)
        add_tags: Option<Vec<String>>,
        /// Tags to remove (optional)
        remove_tags: Option<Vec<String>>,
        /// Estimated minutes, ""=clear (optional)
        estimated_minutes: Option<String>,
        /// active/completed/dropped (optional)
        status: Option<String>,
    ) -> McpResult<String> {
        let changes = TaskChangeArgs {
            project_id,
            parent_task_id,
            due_date,
            defer_date,
            flagged,
            tags,
            add_tags,
            remove_tags,
            estimated_minutes,
            status,
        };
        self.handle_update_task(id, name, note, changes).await
    }

    /// **Batch update tasks**: Apply the same changes to several tasks. Items are processed one by one; failures are reported per id and do not stop the batch.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn batch_update_tasks(
        &self,
        /// Task ids
        ids: Vec<String>,
        /// Move to this project, ""=inbox (optional)
        project_id: Option<String>,
        /// Move under this parent task (optional)
        parent_task_id: Option<String>,
        /// Due date, ""=clear (optional)
        due_date: Option<String>,
        /// Defer date, ""=clear (optional)
        defer_date: Option<String>,
        /// Flag state (optional)
        flagged: Option<bool>,
        /// Replace all tags with these (optional)
        tags: Option<Vec<String>>,
        /// Tags to add (optional)
        add_tags: Option<Vec<String>>,
        /// Tags to remove (optional)
        remove_tags: Option<Vec<String>>,
        /// Estimated minutes, ""=clear (optional)
        estimated_minutes: Option<String>,
        /// active/completed/dropped (optional)
        status: Option<String>,
    ) -> McpResult<String> {
        let changes = TaskChangeArgs {
            project_id,
            parent_task_id,
            due_date,
            defer_date,
            flagged,
            tags,
            add_tags,
            remove_tags,
            estimated_minutes,
            status,
        };
        self.handle_batch_update_tasks(ids, changes).await
    }

    /// **Delete task**: Permanently delete a task and its subtasks. Refused in safety mode unless a test database is open.
    #[tool]
    async fn delete_task(
        &self,
        /// Task id
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_task(id).await
    }

    /// **Batch delete tasks**: Delete several tasks one by one, reporting failures per id.
    #[tool]
    async fn batch_delete_tasks(
        &self,
        /// Task ids
        ids: Vec<String>,
    ) -> McpResult<String> {
        self.handle_batch_delete_tasks(ids).await
    }

    /// **Reorder task**: Move a task directly before or after a sibling. Supply exactly one of before_id/after_id.
    #[tool]
    async fn reorder_task(
        &self,
        /// Task to move
        id: String,
        /// Place before this task (optional)
        before_id: Option<String>,
        /// Place after this task (optional)
        after_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_reorder_task(id, before_id, after_id).await
    }

    /// **List projects**: Filter by folder, status and name. Done and dropped projects are hidden unless include_completed=true or a status is given.
    #[tool]
    async fn list_projects(
        &self,
        /// Folder path like "Work/Clients" (optional)
        folder_path: Option<String>,
        /// active/on_hold/done/dropped (optional)
        status: Option<String>,
        /// Include done and dropped projects (default false)
        include_completed: Option<bool>,
        /// Name contains this text (optional)
        search: Option<String>,
        /// Maximum number of projects to return (optional)
        limit: Option<u32>,
    ) -> McpResult<String> {
        self.handle_list_projects(folder_path, status, include_completed, search, limit)
            .await
    }

    /// **Get project**: Fetch one project by id. Returns {"project": null} when it does not exist.
    #[tool]
    async fn get_project(
        &self,
        /// Project id
        id: String,
    ) -> McpResult<String> {
        self.handle_get_project(id).await
    }

    /// **Create project**: Create a project at the top level or inside a folder (folder_path or folder_id, not both).
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn create_project(
        &self,
        /// Project name
        name: String,
        /// Note text (optional)
        note: Option<String>,
        /// Folder path like "Work/Clients" (optional)
        folder_path: Option<String>,
        /// Folder id (optional)
        folder_id: Option<String>,
        /// Actions must be done in order (optional)
        sequential: Option<bool>,
        /// Flag the project (optional)
        flagged: Option<bool>,
        /// active/on_hold/done/dropped (optional)
        status: Option<String>,
        /// Due date (optional)
        due_date: Option<String>,
        /// Defer date (optional)
        defer_date: Option<String>,
        /// Review every N weeks (optional)
        review_interval_weeks: Option<u32>,
    ) -> McpResult<String> {
        self.handle_create_project(
            name,
            note,
            folder_path,
            folder_id,
            sequential,
            flagged,
            status,
            due_date,
            defer_date,
            review_interval_weeks,
        )
        .await
    }

    /// **Update project**: Change only the fields you supply. folder_path="" moves the project to the top level.
    /// **Review**: Set last_reviewed to mark the project reviewed.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update_project(
        &self,
        /// Project id
        id: String,
        /// New name (optional)
        name: Option<String>,
        /// New note, ""=clear (optional)
        note: Option<String>,
        /// Move to folder path, ""=top level (optional)
        folder_path: Option<String>,
        /// Move to folder id (optional)
        folder_id: Option<String>,
        /// Sequential flag (optional)
        sequential: Option<bool>,
        /// Flag state (optional)
        flagged: Option<bool>,
        /// active/on_hold/done/dropped (optional)
        status: Option<String>,
        /// Due date, ""=clear (optional)
        due_date: Option<String>,
        /// Defer date, ""=clear (optional)
        defer_date: Option<String>,
        /// Review every N weeks (optional)
        review_interval_weeks: Option<u32>,
        /// Last review date (optional)
        last_reviewed: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_project(
            id,
            name,
            note,
            folder_path,
            folder_id,
            sequential,
            flagged,
            status,
            due_date,
            defer_date,
            review_interval_weeks,
            last_reviewed,
        )
        .await
    }

    /// **Delete project**: Permanently delete a project with all its tasks. Refused in safety mode unless a test database is open.
    #[tool]
    async fn delete_project(
        &self,
        /// Project id
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_project(id).await
    }

    /// **Batch delete projects**: Delete several projects one by one, reporting failures per id.
    #[tool]
    async fn batch_delete_projects(
        &self,
        /// Project ids
        ids: Vec<String>,
    ) -> McpResult<String> {
        self.handle_batch_delete_projects(ids).await
    }

    /// **List folders**: All folders with their paths. Dropped folders are hidden unless include_dropped=true.
    #[tool]
    async fn list_folders(
        &self,
        /// Include dropped folders (default false)
        include_dropped: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_folders(include_dropped).await
    }

    /// **Get folder**: Fetch one folder by id. Returns {"folder": null} when it does not exist.
    #[tool]
    async fn get_folder(
        &self,
        /// Folder id
        id: String,
    ) -> McpResult<String> {
        self.handle_get_folder(id).await
    }

    /// **Create folder**: Create a folder at the top level or inside a parent (parent_path or parent_id, not both).
    #[tool]
    async fn create_folder(
        &self,
        /// Folder name
        name: String,
        /// Parent folder path like "Work" (optional)
        parent_path: Option<String>,
        /// Parent folder id (optional)
        parent_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_create_folder(name, parent_path, parent_id).await
    }

    /// **Update folder**: Rename, move (parent_path=""=top level) or drop a folder.
    #[tool]
    async fn update_folder(
        &self,
        /// Folder id
        id: String,
        /// New name (optional)
        name: Option<String>,
        /// Move to parent path, ""=top level (optional)
        parent_path: Option<String>,
        /// Move to parent folder id (optional)
        parent_id: Option<String>,
        /// Drop (true) or restore (false) the folder (optional)
        dropped: Option<bool>,
    ) -> McpResult<String> {
        self.handle_update_folder(id, name, parent_path, parent_id, dropped)
            .await
    }

    /// **Delete folder**: Permanently delete a folder with everything inside it. Refused in safety mode unless a test database is open.
    #[tool]
    async fn delete_folder(
        &self,
        /// Folder id
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_folder(id).await
    }

    /// **List tags**: All tags with their parent. Hidden tags are omitted unless include_hidden=true.
    #[tool]
    async fn list_tags(
        &self,
        /// Include hidden tags (default false)
        include_hidden: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_tags(include_hidden).await
    }

    /// **Create tag**: Create a tag, optionally nested under an existing tag.
    #[tool]
    async fn create_tag(
        &self,
        /// Tag name
        name: String,
        /// Parent tag name (optional)
        parent: Option<String>,
    ) -> McpResult<String> {
        self.handle_create_tag(name, parent).await
    }

    /// **Update tag**: Rename or hide a tag.
    #[tool]
    async fn update_tag(
        &self,
        /// Current tag name
        name: String,
        /// New name (optional)
        new_name: Option<String>,
        /// Hide (true) or show (false) the tag (optional)
        hidden: Option<bool>,
    ) -> McpResult<String> {
        self.handle_update_tag(name, new_name, hidden).await
    }

    /// **Delete tag**: Delete a tag; tasks keep their other tags. Refused in safety mode unless a test database is open.
    #[tool]
    async fn delete_tag(
        &self,
        /// Tag name
        name: String,
    ) -> McpResult<String> {
        self.handle_delete_tag(name).await
    }

    /// **List perspectives**: Built-in and custom perspectives, marking the one currently shown.
    #[tool]
    async fn list_perspectives(&self) -> McpResult<String> {
        self.handle_list_perspectives().await
    }

    /// **Switch perspective**: Show a perspective in the front OmniFocus window. The name must be one of list_perspectives.
    #[tool]
    async fn switch_perspective(
        &self,
        /// Perspective name
        name: String,
    ) -> McpResult<String> {
        self.handle_switch_perspective(name).await
    }

    /// **Database info**: Name and size of the open OmniFocus database. Safety mode uses the name to recognize a test database.
    #[tool]
    async fn database_info(&self) -> McpResult<String> {
        self.handle_database_info().await
    }
}
