//! Each call class runs with its own configured timeout
mod common;

use common::*;
use omnifocus_mcp::Config;
use omnifocus_mcp::commands::{BatchTaskUpdate, TaskFilter};
use std::time::Duration;

fn config() -> Config {
    let mut config = Config::default();
    config.timeouts.single_secs = 7;
    config.timeouts.batch_secs = 11;
    config.timeouts.full_scan_secs = 13;
    config
}

#[tokio::test]
async fn test_unfiltered_listing_uses_full_scan_timeout() {
    let (connector, runner) = connector(config(), vec![records_reply(&[task_fields("t1", "A")])]);
    connector.list_tasks(&TaskFilter::default()).await.unwrap();
    assert_eq!(runner.timeouts(), vec![Duration::from_secs(13)]);
}

#[tokio::test]
async fn test_scoped_listing_and_lookup_use_single_timeout() {
    let replies = vec![
        records_reply(&[task_fields("t1", "A")]),
        records_reply(&[task_fields("t1", "A")]),
    ];
    let (connector, runner) = connector(config(), replies);
    let scoped = TaskFilter {
        project_id: Some("p1".into()),
        ..Default::default()
    };
    connector.list_tasks(&scoped).await.unwrap();
    connector.get_task("t1").await.unwrap();
    assert_eq!(
        runner.timeouts(),
        vec![Duration::from_secs(7), Duration::from_secs(7)]
    );
}

#[tokio::test]
async fn test_batch_items_use_batch_timeout() {
    let (connector, runner) = connector(config(), vec![id_reply("t1"), id_reply("t2")]);
    let batch = BatchTaskUpdate {
        flagged: Some(true),
        ..Default::default()
    };
    let ids = vec!["t1".to_string(), "t2".to_string()];
    connector.batch_update_tasks(&ids, &batch).await.unwrap();
    connector.batch_delete_tasks(&[]).await.unwrap_err();
    assert_eq!(
        runner.timeouts(),
        vec![Duration::from_secs(11), Duration::from_secs(11)]
    );
}

#[tokio::test]
async fn test_single_write_uses_single_timeout() {
    let (connector, runner) = connector(config(), vec![id_reply("t1")]);
    connector.delete_task("t1").await.unwrap();
    assert_eq!(runner.timeouts(), vec![Duration::from_secs(7)]);
}
