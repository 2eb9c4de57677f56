//! OmniFocus connector
//!
//! One method per operation. Each method validates its parameters, assembles
//! a script, runs it through the injected [`ScriptRunner`] and parses the
//! answer. Reads propagate execution and parse failures as errors; writes
//! fold them into a [`WriteOutcome`] so batches can report per-item results.

use crate::commands::{
    self, BatchTaskUpdate, FolderCreate, FolderFilter, FolderUpdate, ProjectCreate,
    ProjectFilter, ProjectUpdate, SwitchPerspective, TagCreate, TagFilter, TagUpdate, TaskCreate,
    TaskFilter, TaskReorder, TaskUpdate, unique_ids,
};
use crate::config::{CallClass, Config};
use crate::error::{ConnectorError, ErrorKind, Result};
use crate::executor::{OsaScriptRunner, ScriptOutput, ScriptRunner};
use crate::model::{DatabaseInfo, Folder, Perspective, Project, Tag, Task};
use crate::outcome::{ItemFailure, WriteOutcome};
use crate::parser::{FromRecord, parse_optional, parse_records, parse_single, parse_write_result};
use crate::script::{Query, WriteScript, database_info_script, perspectives_script};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct Connector {
    runner: Arc<dyn ScriptRunner>,
    config: Config,
}

impl Connector {
    pub fn new(config: Config, runner: Arc<dyn ScriptRunner>) -> Self {
        Self { runner, config }
    }

    /// Connector that talks to OmniFocus through osascript
    pub fn with_osascript(config: Config) -> Self {
        let runner = Arc::new(OsaScriptRunner::new(config.osascript.clone()));
        Self::new(config, runner)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn execute(&self, operation: &str, script: String, class: CallClass) -> Result<String> {
        let timeout = self.config.timeouts.for_class(class);
        let started = Instant::now();
        debug!(operation, script_bytes = script.len(), "running script");
        let result = self
            .runner
            .run(&script, timeout)
            .await
            .and_then(ScriptOutput::into_stdout);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(operation, elapsed_ms, "script finished"),
            Err(e) => warn!(operation, elapsed_ms, error = %e, "script failed"),
        }
        result
    }

    async fn read<T: FromRecord>(
        &self,
        operation: &str,
        query: &Query,
        class: CallClass,
    ) -> Result<Vec<T>> {
        let out = self
            .execute(operation, query.render(&self.config.application), class)
            .await?;
        Ok(parse_records(&out)?)
    }

    async fn read_one<T: FromRecord>(&self, operation: &str, query: &Query) -> Result<Option<T>> {
        let out = self
            .execute(
                operation,
                query.render(&self.config.application),
                CallClass::Single,
            )
            .await?;
        Ok(parse_optional(&out)?)
    }

    async fn write(&self, operation: &str, script: &WriteScript, class: CallClass) -> Result<String> {
        let out = self
            .execute(operation, script.render(&self.config.application), class)
            .await?;
        Ok(parse_write_result(&out)?)
    }

    /// Refuse destructive operations unless the open database is marked
    /// as a test database
    async fn ensure_destructive_allowed(&self, operation: &str) -> Result<()> {
        let safety = &self.config.safety;
        if !safety.enabled {
            return Ok(());
        }
        let info = self
            .database_info()
            .await
            .map_err(|e| ConnectorError::Safety {
                operation: operation.to_string(),
                reason: format!("could not identify the open database: {}", e),
            })?;
        let marker = safety.database_marker.to_lowercase();
        if !info.document_name.to_lowercase().contains(&marker) {
            warn!(
                operation,
                document = %info.document_name,
                marker = %safety.database_marker,
                "safety mode blocked destructive operation"
            );
            return Err(ConnectorError::Safety {
                operation: operation.to_string(),
                reason: format!(
                    "open database '{}' does not contain marker '{}'",
                    info.document_name, safety.database_marker
                ),
            });
        }
        Ok(())
    }

    async fn delete_each(
        &self,
        operation: &str,
        ids: Vec<String>,
        build: fn(&str) -> Result<WriteScript>,
    ) -> WriteOutcome {
        let mut outcome = WriteOutcome::new();
        for id in &ids {
            let result = match build(id) {
                Ok(script) => self.write(operation, &script, CallClass::Batch).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(affected) => outcome.record_success(affected),
                Err(e) => {
                    warn!(operation, id = %id, error = %e, "batch item failed");
                    outcome.record_failure(ItemFailure::from_error(Some(id), &e));
                }
            }
        }
        info!(
            operation,
            total = ids.len(),
            failed = outcome.failures.len(),
            "batch finished"
        );
        outcome
    }

    // ---- tasks ----

    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let query = filter.build()?;
        let class = if filter.is_full_scan() {
            CallClass::FullScan
        } else {
            CallClass::Single
        };
        let tasks = self.read("list_tasks", &query, class).await?;
        Ok(filter.apply_post(tasks))
    }

    pub async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let query = commands::task::by_id(id)?;
        self.read_one("get_task", &query).await
    }

    pub async fn create_task(&self, create: &TaskCreate) -> Result<WriteOutcome> {
        let script = create.build()?;
        let result = self.write("create_task", &script, CallClass::Single).await;
        if let Ok(id) = &result {
            info!(id = %id, "task created");
        }
        Ok(WriteOutcome::single(None, result))
    }

    pub async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<WriteOutcome> {
        let script = update.build(id)?;
        let mut outcome = WriteOutcome::new();
        match self
            .apply_task_update("update_task", id, &script, update, CallClass::Single)
            .await
        {
            Ok(affected) => outcome.record_success(affected),
            Err(failure) => outcome.record_failure(failure),
        }
        Ok(outcome)
    }

    async fn apply_task_update(
        &self,
        operation: &str,
        id: &str,
        script: &WriteScript,
        update: &TaskUpdate,
        class: CallClass,
    ) -> std::result::Result<String, ItemFailure> {
        let affected = self
            .write(operation, script, class)
            .await
            .map_err(|e| ItemFailure::from_error(Some(id), &e))?;
        if self.config.verify_writes {
            let reread = self.get_task(&affected).await;
            verify(&affected, reread, |task| update.mismatches(task))?;
        }
        Ok(affected)
    }

    pub async fn delete_task(&self, id: &str) -> Result<WriteOutcome> {
        let script = commands::task::delete(id)?;
        self.ensure_destructive_allowed("delete_task").await?;
        let result = self.write("delete_task", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(Some(id), result))
    }

    pub async fn reorder_task(&self, reorder: &TaskReorder) -> Result<WriteOutcome> {
        let script = reorder.build()?;
        let result = self.write("reorder_task", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(Some(&reorder.id), result))
    }

    /// Apply the same changes to every task, one script per task
    pub async fn batch_update_tasks(
        &self,
        ids: &[String],
        batch: &BatchTaskUpdate,
    ) -> Result<WriteOutcome> {
        let ids = batch.validate(ids)?;
        let update = batch.to_update();
        let mut outcome = WriteOutcome::new();
        for id in &ids {
            let result = match update.build(id) {
                Ok(script) => {
                    self.apply_task_update(
                        "batch_update_tasks",
                        id,
                        &script,
                        &update,
                        CallClass::Batch,
                    )
                    .await
                }
                Err(e) => Err(ItemFailure::from_error(Some(id), &e)),
            };
            match result {
                Ok(affected) => outcome.record_success(affected),
                Err(failure) => {
                    warn!(id = %id, error = %failure.message, "batch item failed");
                    outcome.record_failure(failure);
                }
            }
        }
        info!(
            operation = "batch_update_tasks",
            total = ids.len(),
            failed = outcome.failures.len(),
            "batch finished"
        );
        Ok(outcome)
    }

    pub async fn batch_delete_tasks(&self, ids: &[String]) -> Result<WriteOutcome> {
        let ids = unique_ids("ids", ids)?;
        self.ensure_destructive_allowed("batch_delete_tasks").await?;
        Ok(self
            .delete_each("batch_delete_tasks", ids, commands::task::delete)
            .await)
    }

    // ---- projects ----

    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let query = filter.build()?;
        let class = if filter.is_full_scan() {
            CallClass::FullScan
        } else {
            CallClass::Single
        };
        let projects = self.read("list_projects", &query, class).await?;
        Ok(filter.apply_post(projects))
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let query = commands::project::by_id(id)?;
        self.read_one("get_project", &query).await
    }

    pub async fn create_project(&self, create: &ProjectCreate) -> Result<WriteOutcome> {
        let script = create.build()?;
        let result = self.write("create_project", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(None, result))
    }

    pub async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<WriteOutcome> {
        let script = update.build(id)?;
        let mut outcome = WriteOutcome::new();
        match self.write("update_project", &script, CallClass::Single).await {
            Ok(affected) => {
                let verified = if self.config.verify_writes {
                    let reread = self.get_project(&affected).await;
                    verify(&affected, reread, |project| update.mismatches(project))
                } else {
                    Ok(())
                };
                match verified {
                    Ok(()) => outcome.record_success(affected),
                    Err(failure) => outcome.record_failure(failure),
                }
            }
            Err(e) => outcome.record_failure(ItemFailure::from_error(Some(id), &e)),
        }
        Ok(outcome)
    }

    pub async fn delete_project(&self, id: &str) -> Result<WriteOutcome> {
        let script = commands::project::delete(id)?;
        self.ensure_destructive_allowed("delete_project").await?;
        let result = self.write("delete_project", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(Some(id), result))
    }

    pub async fn batch_delete_projects(&self, ids: &[String]) -> Result<WriteOutcome> {
        let ids = commands::project::batch_ids(ids)?;
        self.ensure_destructive_allowed("batch_delete_projects").await?;
        Ok(self
            .delete_each("batch_delete_projects", ids, commands::project::delete)
            .await)
    }

    // ---- folders ----

    pub async fn list_folders(&self, filter: &FolderFilter) -> Result<Vec<Folder>> {
        self.read("list_folders", &filter.build(), CallClass::Single)
            .await
    }

    pub async fn get_folder(&self, id: &str) -> Result<Option<Folder>> {
        let query = commands::folder::by_id(id)?;
        self.read_one("get_folder", &query).await
    }

    pub async fn create_folder(&self, create: &FolderCreate) -> Result<WriteOutcome> {
        let script = create.build()?;
        let result = self.write("create_folder", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(None, result))
    }

    pub async fn update_folder(&self, id: &str, update: &FolderUpdate) -> Result<WriteOutcome> {
        let script = update.build(id)?;
        let result = self.write("update_folder", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(Some(id), result))
    }

    pub async fn delete_folder(&self, id: &str) -> Result<WriteOutcome> {
        let script = commands::folder::delete(id)?;
        self.ensure_destructive_allowed("delete_folder").await?;
        let result = self.write("delete_folder", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(Some(id), result))
    }

    // ---- tags ----

    pub async fn list_tags(&self, filter: &TagFilter) -> Result<Vec<Tag>> {
        self.read("list_tags", &filter.build(), CallClass::Single)
            .await
    }

    pub async fn create_tag(&self, create: &TagCreate) -> Result<WriteOutcome> {
        let script = create.build()?;
        let result = self.write("create_tag", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(None, result))
    }

    pub async fn update_tag(&self, update: &TagUpdate) -> Result<WriteOutcome> {
        let script = update.build()?;
        let result = self.write("update_tag", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(Some(update.name.trim()), result))
    }

    pub async fn delete_tag(&self, name: &str) -> Result<WriteOutcome> {
        let script = commands::tag::delete(name)?;
        self.ensure_destructive_allowed("delete_tag").await?;
        let result = self.write("delete_tag", &script, CallClass::Single).await;
        Ok(WriteOutcome::single(Some(name.trim()), result))
    }

    // ---- perspectives and database ----

    pub async fn list_perspectives(&self) -> Result<Vec<Perspective>> {
        let out = self
            .execute(
                "list_perspectives",
                perspectives_script(&self.config.application),
                CallClass::Single,
            )
            .await?;
        Ok(parse_records(&out)?)
    }

    pub async fn switch_perspective(&self, switch: &SwitchPerspective) -> Result<WriteOutcome> {
        let name = commands::require_name("name", switch.name.trim())?;
        let known = match self.list_perspectives().await {
            Ok(known) => known,
            Err(e) => return Ok(WriteOutcome::single(Some(&name), Err(e))),
        };
        let script = switch.build(&known)?;
        let result = self
            .write("switch_perspective", &script, CallClass::Single)
            .await;
        Ok(WriteOutcome::single(Some(switch.name.trim()), result))
    }

    pub async fn database_info(&self) -> Result<DatabaseInfo> {
        let out = self
            .execute(
                "database_info",
                database_info_script(&self.config.application),
                CallClass::Single,
            )
            .await?;
        Ok(parse_single(&out)?)
    }
}

/// Turn a read-back into a verification failure when fields did not stick
fn verify<T>(
    id: &str,
    reread: Result<Option<T>>,
    mismatches: impl FnOnce(&T) -> Vec<&'static str>,
) -> std::result::Result<(), ItemFailure> {
    let failure = |message: String| ItemFailure::new(Some(id), ErrorKind::Verification, message);
    match reread {
        Ok(Some(item)) => {
            let fields = mismatches(&item);
            if fields.is_empty() {
                Ok(())
            } else {
                warn!(id, fields = ?fields, "write did not take effect");
                Err(failure(format!(
                    "OmniFocus accepted the update but these fields did not change: {}",
                    fields.join(", ")
                )))
            }
        }
        Ok(None) => Err(failure("Item not found when reading it back".to_string())),
        Err(e) => Err(failure(format!("Reading the item back failed: {}", e))),
    }
}
