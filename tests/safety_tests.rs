//! Safety mode gates destructive operations on the open database's name
mod common;

use common::*;
use omnifocus_mcp::{Config, ConnectorError};

#[tokio::test]
async fn test_delete_allowed_on_marked_database() {
    let replies = vec![database_reply("OmniFocus-TEST.ofocus"), id_reply("t1")];
    let (connector, runner) = connector(safety_config("test"), replies);

    let outcome = connector.delete_task("t1").await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.affected_ids, vec!["t1"]);
    let scripts = runner.scripts();
    assert_eq!(scripts.len(), 2);
    assert!(scripts[0].contains("name of default document"));
    assert!(scripts[1].contains("delete theTask"));
}

#[tokio::test]
async fn test_delete_refused_on_production_database() {
    let replies = vec![database_reply("OmniFocus.ofocus")];
    let (connector, runner) = connector(safety_config("test"), replies);

    let err = connector.delete_project("p1").await.unwrap_err();

    match &err {
        ConnectorError::Safety { operation, reason } => {
            assert_eq!(operation, "delete_project");
            assert!(reason.contains("OmniFocus.ofocus"));
        }
        other => panic!("expected safety error, got {:?}", other),
    }
    // Only the database check ran
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_batch_delete_refused_before_any_item() {
    let replies = vec![database_reply("Personal")];
    let (connector, runner) = connector(safety_config("sandbox"), replies);
    let ids = vec!["t1".to_string(), "t2".to_string()];
    assert!(matches!(
        connector.batch_delete_tasks(&ids).await,
        Err(ConnectorError::Safety { .. })
    ));
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_unreadable_database_blocks_deletes() {
    let (connector, runner) = connector(safety_config("test"), vec![not_found_reply()]);
    let err = connector.delete_tag("Errands").await.unwrap_err();
    assert!(err.is_caller_error());
    assert!(err.to_string().contains("could not identify"));
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_safety_off_skips_database_check() {
    let (connector, runner) = connector(Config::default(), vec![id_reply("f1")]);
    let outcome = connector.delete_folder("f1").await.unwrap();
    assert!(outcome.success);
    assert_eq!(runner.call_count(), 1);
    assert!(runner.scripts()[0].contains("delete theFolder"));
}

#[tokio::test]
async fn test_non_destructive_writes_skip_database_check() {
    let (connector, runner) = connector(safety_config("test"), vec![id_reply("t1")]);
    let create = omnifocus_mcp::commands::TaskCreate::new("Call Bob");
    let outcome = connector.create_task(&create).await.unwrap();
    assert!(outcome.success);
    assert_eq!(runner.call_count(), 1);
}
