mod common;

use common::{client, server_error, task_json};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use taskboard_client::sync::drop_and_sync;
use taskboard_client::{ApiRequest, Method, MoveOutcome, Result};
use taskboard_core::board::{Board, DropEvent};
use taskboard_core::models::{Task, TaskFilter, TaskStatus};

/// A tiny tracker backend: lists tasks and applies status moves
fn backend(
    tasks: Vec<Value>,
    accept_moves: bool,
) -> impl Fn(&ApiRequest) -> Result<Value> + Send + Sync + 'static {
    let state = Arc::new(Mutex::new(tasks));
    move |req: &ApiRequest| {
        let mut tasks = state.lock().unwrap();
        match (req.method, req.path.as_str()) {
            (Method::Get, "/api/tasks") => Ok(Value::Array(tasks.clone())),
            (Method::Put, path) if path.ends_with("/move") => {
                if !accept_moves {
                    return Err(server_error());
                }
                let id: i64 = path
                    .trim_start_matches("/api/tasks/")
                    .trim_end_matches("/move")
                    .parse()
                    .unwrap();
                let body = req.body.clone().unwrap();
                let task = tasks.iter_mut().find(|t| t["id"] == id).unwrap();
                task["status"] = body["status"].clone();
                Ok(task.clone())
            }
            other => panic!("unexpected request {:?}", other),
        }
    }
}

fn initial_board() -> Board {
    let tasks: Vec<Task> =
        serde_json::from_value(json!([task_json(1, "todo"), task_json(2, "done")])).unwrap();
    Board::new(tasks)
}

fn drag(task_id: i64, to: Option<&str>) -> DropEvent {
    DropEvent {
        task_id,
        source: "todo".to_string(),
        destination: to.map(str::to_string),
    }
}

#[tokio::test]
async fn test_drag_issues_single_move_call() {
    let client = client(backend(
        vec![task_json(1, "todo"), task_json(2, "done")],
        true,
    ));
    let mut board = initial_board();

    let outcome = drop_and_sync(
        &client,
        &mut board,
        &TaskFilter::default(),
        &drag(1, Some("in_progress")),
    )
    .await;

    assert!(matches!(outcome, Some(MoveOutcome::Moved(ref t)) if t.status == TaskStatus::InProgress));

    let writes = client.transport().writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, Method::Put);
    assert_eq!(writes[0].path, "/api/tasks/1/move");
    assert_eq!(writes[0].body, Some(json!({"status": "in_progress"})));
    assert!(
        client
            .transport()
            .requests()
            .iter()
            .all(|r| !r.path.starts_with("/api/tasks/2"))
    );

    // board reloaded from the server
    assert_eq!(board.task(1).unwrap().status, TaskStatus::InProgress);
    assert_eq!(board.task(2).unwrap().status, TaskStatus::Done);
    assert_eq!(board.pending_count(), 0);
}

#[tokio::test]
async fn test_subsequent_fetch_reflects_move() {
    let client = client(backend(vec![task_json(1, "todo")], true));
    let mut board = initial_board();

    for status in TaskStatus::ALL.into_iter().rev() {
        let drop = DropEvent::new(1, board.task(1).unwrap().status, Some(status));
        drop_and_sync(&client, &mut board, &TaskFilter::default(), &drop).await;

        let fetched = client.list_tasks(&TaskFilter::default()).await.unwrap();
        assert_eq!(fetched[0].status, status);
    }
}

#[tokio::test]
async fn test_failed_move_rolls_back() {
    let client = client(backend(
        vec![task_json(1, "todo"), task_json(2, "done")],
        false,
    ));
    let mut board = initial_board();

    let outcome = drop_and_sync(
        &client,
        &mut board,
        &TaskFilter::default(),
        &drag(1, Some("done")),
    )
    .await;

    match outcome {
        Some(MoveOutcome::RolledBack { reason, restored }) => {
            assert!(restored);
            assert_eq!(reason, "Internal Server Error");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(board.task(1).unwrap().status, TaskStatus::Todo);
    assert_eq!(board.pending_count(), 0);
    // rollback is followed by a reload
    let last = client.transport().requests().pop().unwrap();
    assert_eq!(last.method, Method::Get);
}

#[tokio::test]
async fn test_drop_without_destination_is_noop() {
    let client = client(backend(vec![task_json(1, "todo")], true));
    let mut board = initial_board();

    for drop in [drag(1, None), drag(1, Some("todo")), drag(1, Some("archived")), drag(42, Some("done"))] {
        let outcome = drop_and_sync(&client, &mut board, &TaskFilter::default(), &drop).await;
        assert!(outcome.is_none());
    }

    assert!(client.transport().requests().is_empty());
    assert_eq!(board.task(1).unwrap().status, TaskStatus::Todo);
}

#[tokio::test]
async fn test_filter_is_sent_with_reload() {
    let client = client(backend(vec![task_json(1, "todo")], true));
    let mut board = initial_board();
    let filter = TaskFilter::for_project(Some(1));

    drop_and_sync(&client, &mut board, &filter, &drag(1, Some("in_review"))).await;

    let reload = client.transport().requests().pop().unwrap();
    assert_eq!(reload.path, "/api/tasks");
    assert_eq!(reload.query, vec![("project_id".to_string(), "1".to_string())]);
}
