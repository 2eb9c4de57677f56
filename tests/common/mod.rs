//! Common test utilities for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use omnifocus_mcp::error::Result;
use omnifocus_mcp::{Config, Connector, ConnectorError, OmniFocusServerHandler, ScriptOutput, ScriptRunner};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const US: char = '\u{1f}';
pub const RS: char = '\u{1e}';
pub const GS: char = '\u{1d}';
pub const EOT: char = '\u{04}';

/// What the fake osascript answers to the next script
#[derive(Debug, Clone)]
pub enum Reply {
    Stdout(String),
    Fail { code: i32, stderr: String },
    Timeout,
}

/// Script runner that replays queued replies and records every script
#[derive(Default)]
pub struct FakeRunner {
    replies: Mutex<VecDeque<Reply>>,
    scripts: Mutex<Vec<String>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl FakeRunner {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            scripts: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
        })
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    /// Timeout passed with each script, in call order
    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.scripts.lock().unwrap().len()
    }
}

#[async_trait]
impl ScriptRunner for FakeRunner {
    async fn run(&self, script: &str, timeout: Duration) -> Result<ScriptOutput> {
        self.scripts.lock().unwrap().push(script.to_string());
        self.timeouts.lock().unwrap().push(timeout);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Stdout(stdout)) => Ok(ScriptOutput {
                stdout,
                stderr: String::new(),
                exit_code: Some(0),
            }),
            Some(Reply::Fail { code, stderr }) => Ok(ScriptOutput {
                stdout: String::new(),
                stderr,
                exit_code: Some(code),
            }),
            Some(Reply::Timeout) => Err(ConnectorError::Timeout(timeout)),
            None => Ok(ScriptOutput {
                stdout: String::new(),
                stderr: "no reply queued".to_string(),
                exit_code: Some(1),
            }),
        }
    }
}

/// Successful write answering with an identifier
pub fn id_reply(id: &str) -> Reply {
    Reply::Stdout(format!("{}{}\n", id, EOT))
}

/// osascript failure like "Can't get task"
pub fn not_found_reply() -> Reply {
    Reply::Fail {
        code: 1,
        stderr: "execution error: OmniFocus got an error: Can't get task. (-1728)".to_string(),
    }
}

/// Join records with the response separators
pub fn records_reply(records: &[Vec<String>]) -> Reply {
    let joined: Vec<String> = records.iter().map(|r| r.join(&US.to_string())).collect();
    Reply::Stdout(format!("{}{}\n", joined.join(&RS.to_string()), EOT))
}

/// Task record in prelude field order
pub fn task_fields(id: &str, name: &str) -> Vec<String> {
    vec![
        id.to_string(),
        name.to_string(),
        String::new(),           // note
        String::new(),           // project_id
        String::new(),           // parent_task_id
        String::new(),           // due_date
        String::new(),           // defer_date
        "false".to_string(),     // flagged
        String::new(),           // tags
        String::new(),           // estimated_minutes
        "false".to_string(),     // completed
        "false".to_string(),     // dropped
        "false".to_string(),     // blocked
        "true".to_string(),      // in_inbox
    ]
}

/// Project record in prelude field order
pub fn project_fields(id: &str, name: &str) -> Vec<String> {
    vec![
        id.to_string(),
        name.to_string(),
        String::new(),              // note
        String::new(),              // folder_path
        String::new(),              // folder_id
        "active status".to_string(), // status
        "false".to_string(),        // sequential
        "false".to_string(),        // flagged
        String::new(),              // due_date
        String::new(),              // defer_date
        "1 week".to_string(),       // review_interval
        String::new(),              // last_reviewed
        String::new(),              // next_review
    ]
}

pub fn database_reply(document_name: &str) -> Reply {
    records_reply(&[vec![
        document_name.to_string(),
        "4.5".to_string(),
        "120".to_string(),
        "12".to_string(),
    ]])
}

/// Connector over a fake runner
pub fn connector(config: Config, replies: Vec<Reply>) -> (Connector, Arc<FakeRunner>) {
    let runner = FakeRunner::new(replies);
    (Connector::new(config, runner.clone()), runner)
}

/// MCP handler over a fake runner
pub fn handler(replies: Vec<Reply>) -> (OmniFocusServerHandler, Arc<FakeRunner>) {
    let runner = FakeRunner::new(replies);
    (
        OmniFocusServerHandler::with_runner(Config::default(), runner.clone()),
        runner,
    )
}

pub fn safety_config(marker: &str) -> Config {
    let mut config = Config::default();
    config.safety.enabled = true;
    config.safety.database_marker = marker.to_string();
    config
}
