//! MCP tool handlers: argument parsing and JSON results
mod common;

use common::*;
use omnifocus_mcp::{Config, OmniFocusServerHandler, TaskChangeArgs};
use std::io::Write;
use tempfile::NamedTempFile;

fn parse(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_list_tasks_returns_json() {
    let (handler, _runner) = handler(vec![records_reply(&[
        task_fields("t1", "A"),
        task_fields("t2", "B"),
    ])]);
    let text = handler
        .handle_list_tasks(None, None, None, None, Some(true), None, None, None, None)
        .await
        .unwrap();
    let value = parse(&text);
    assert_eq!(value["count"], 2);
    assert_eq!(value["tasks"][0]["id"], "t1");
    assert_eq!(value["tasks"][1]["status"], "active");
}

#[tokio::test]
async fn test_update_task_empty_string_clears() {
    let (handler, runner) = handler(vec![id_reply("t1")]);
    let changes = TaskChangeArgs {
        due_date: Some(String::new()),
        estimated_minutes: Some(String::new()),
        project_id: Some(String::new()),
        ..Default::default()
    };
    let text = handler
        .handle_update_task("t1".into(), None, None, changes)
        .await
        .unwrap();
    assert_eq!(parse(&text)["success"], true);

    let script = &runner.scripts()[0];
    assert!(script.contains("set due date of theTask to missing value"));
    assert!(script.contains("set estimated minutes of theTask to missing value"));
    assert!(script.contains("move theTask to end of inbox tasks"));
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let (handler, runner) = handler(vec![]);
    let result = handler
        .handle_create_task(
            "Task".into(),
            None,
            None,
            None,
            Some("next friday".into()),
            None,
            None,
            None,
            None,
        )
        .await;
    assert!(result.is_err());
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_batch_outcome_json() {
    let (handler, _runner) = handler(vec![id_reply("t1"), not_found_reply()]);
    let changes = TaskChangeArgs {
        status: Some("completed".into()),
        ..Default::default()
    };
    let text = handler
        .handle_batch_update_tasks(vec!["t1".into(), "t2".into()], changes)
        .await
        .unwrap();
    let value = parse(&text);
    assert_eq!(value["success"], false);
    assert_eq!(value["affected_ids"][0], "t1");
    assert_eq!(value["failures"][0]["id"], "t2");
    assert_eq!(value["failures"][0]["kind"], "execution");
}

#[tokio::test]
async fn test_switch_perspective_checks_known_names() {
    let perspectives = records_reply(&[
        vec!["Inbox".into(), "true".into()],
        vec!["Forecast".into(), "false".into()],
    ]);
    let (handler, runner) = handler(vec![perspectives.clone(), id_reply("Forecast")]);
    let text = handler
        .handle_switch_perspective("forecast".into())
        .await
        .unwrap();
    assert_eq!(parse(&text)["affected_ids"][0], "Forecast");
    assert!(runner.scripts()[1].contains("set perspective name of document window 1 to \"Forecast\""));

    let (handler, runner) = common::handler(vec![perspectives]);
    assert!(handler.handle_switch_perspective("Review".into()).await.is_err());
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_get_project_not_found_is_null() {
    let (handler, _runner) = handler(vec![Reply::Stdout(EOT.to_string())]);
    let text = handler.handle_get_project("p9".into()).await.unwrap();
    assert!(parse(&text)["project"].is_null());
}

#[tokio::test]
async fn test_handler_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "application = \"OmniFocus 4\"\n[safety]\nenabled = true").unwrap();
    let config = Config::load(Some(file.path())).unwrap();
    let runner = FakeRunner::new(vec![database_reply("Work"), id_reply("t1")]);
    let handler = OmniFocusServerHandler::with_runner(config, runner.clone());

    assert!(handler.handle_delete_task("t1".into()).await.is_err());
    let scripts = runner.scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("tell application \"OmniFocus 4\""));
    assert!(handler.connector().config().safety.enabled);
}

#[tokio::test]
async fn test_switch_perspective_listing_failure_is_outcome() {
    let (handler, runner) = handler(vec![not_found_reply()]);
    let text = handler
        .handle_switch_perspective("Forecast".into())
        .await
        .unwrap();
    let value = parse(&text);
    assert_eq!(value["success"], false);
    assert_eq!(value["failures"][0]["id"], "Forecast");
    assert_eq!(value["failures"][0]["kind"], "execution");
    assert_eq!(runner.call_count(), 1);

    let (handler, runner) = common::handler(vec![]);
    assert!(handler.handle_switch_perspective("  ".into()).await.is_err());
    assert_eq!(runner.call_count(), 0);
}
