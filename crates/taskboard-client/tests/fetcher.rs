mod common;

use common::{RecordingTransport, task_json};
use serde_json::json;
use std::time::Duration;
use taskboard_client::{FetchMessage, Fetcher, QueryData, QueryKey, TrackerClient};
use taskboard_core::board::{Board, DropEvent};
use taskboard_core::models::{Task, TaskFilter, TaskStatus};
use tokio::time::timeout;

fn fetcher(
    transport: RecordingTransport,
) -> (
    Fetcher<RecordingTransport>,
    tokio::sync::mpsc::UnboundedReceiver<FetchMessage>,
) {
    Fetcher::new(TrackerClient::new(transport))
}

#[tokio::test]
async fn test_fetch_reports_result() {
    let (fetcher, mut rx) = fetcher(RecordingTransport::new(|_| {
        Ok(json!([task_json(1, "todo")]))
    }));

    let key = QueryKey::Tasks(TaskFilter::default());
    fetcher.fetch(key.clone());

    match rx.recv().await.unwrap() {
        FetchMessage::Fetched {
            key: got,
            result: Ok(QueryData::Tasks(tasks)),
        } => {
            assert_eq!(got, key);
            assert_eq!(tasks.len(), 1);
        }
        other => panic!("unexpected message {:?}", other),
    }
}

#[tokio::test]
async fn test_teardown_cancels_reads_but_not_moves() {
    let transport = RecordingTransport::new(|_| Ok(task_json(1, "in_progress"))).holding_reads();
    let (mut fetcher, mut rx) = fetcher(transport);

    fetcher.fetch(QueryKey::Projects);
    fetcher.fetch(QueryKey::Tasks(TaskFilter::default()));

    let tasks: Vec<Task> = serde_json::from_value(json!([task_json(1, "todo")])).unwrap();
    let mut board = Board::new(tasks);
    let mv = board
        .begin_move(&DropEvent::new(
            1,
            TaskStatus::Todo,
            Some(TaskStatus::InProgress),
        ))
        .unwrap();
    fetcher.send_move(mv);
    fetcher.teardown();

    let message = timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    match message {
        FetchMessage::MoveFinished { mv: got, result } => {
            assert_eq!(got, mv);
            assert_eq!(result.unwrap().status, TaskStatus::InProgress);
        }
        other => panic!("unexpected message {:?}", other),
    }

    // the held reads were cancelled, so nothing else ever arrives
    assert!(
        timeout(Duration::from_millis(100), rx.recv())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_fetch_after_teardown_still_runs() {
    let (mut fetcher, mut rx) = fetcher(RecordingTransport::new(|_| Ok(json!([]))));
    fetcher.teardown();
    fetcher.fetch(QueryKey::Users);

    let message = timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        message,
        FetchMessage::Fetched {
            key: QueryKey::Users,
            result: Ok(QueryData::Users(_))
        }
    ));
}
