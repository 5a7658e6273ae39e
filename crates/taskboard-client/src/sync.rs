//! Board move synchronization and dialog option loading

use crate::client::TrackerClient;
use crate::error::Result;
use crate::transport::Transport;
use taskboard_core::board::{Board, DropEvent, PendingMove};
use taskboard_core::models::{Id, Project, Sprint, Task, TaskFilter, User};

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Server accepted the move
    Moved(Task),
    /// Server rejected the move. `restored` is false when a newer move of
    /// the same card was already in flight and the card stayed put.
    RolledBack { reason: String, restored: bool },
}

/// Persist one optimistic move
pub async fn send_move<T: Transport>(client: &TrackerClient<T>, mv: &PendingMove) -> Result<Task> {
    client.set_task_status(mv.task_id, mv.to).await
}

/// Fold the result of [`send_move`] back into the board
pub fn settle_move(board: &mut Board, mv: &PendingMove, result: Result<Task>) -> MoveOutcome {
    match result {
        Ok(task) => {
            board.complete_move(mv);
            tracing::info!(task_id = mv.task_id, status = %mv.to, "task moved");
            MoveOutcome::Moved(task)
        }
        Err(e) => {
            let restored = board.rollback_move(mv);
            tracing::warn!(
                task_id = mv.task_id,
                from = %mv.from,
                to = %mv.to,
                restored,
                error = %e,
                "failed to move task"
            );
            MoveOutcome::RolledBack {
                reason: e.user_message(),
                restored,
            }
        }
    }
}

/// Handle a drop end to end: move locally, persist, settle, then reload the
/// board from the server. Returns `None` for drops that change nothing.
pub async fn drop_and_sync<T: Transport>(
    client: &TrackerClient<T>,
    board: &mut Board,
    filter: &TaskFilter,
    drop: &DropEvent,
) -> Option<MoveOutcome> {
    let mv = board.begin_move(drop)?;
    let result = send_move(client, &mv).await;
    let outcome = settle_move(board, &mv, result);

    match client.list_tasks(filter).await {
        Ok(tasks) => board.replace(tasks),
        Err(e) => tracing::warn!(error = %e, "failed to reload board after move"),
    }
    Some(outcome)
}

/// Option lists for the create dialogs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOptions {
    pub projects: Vec<Project>,
    pub sprints: Vec<Sprint>,
    pub users: Vec<User>,
}

/// Fetch projects, sprints and users concurrently; fails if any of them does
pub async fn load_form_options<T: Transport>(client: &TrackerClient<T>) -> Result<FormOptions> {
    let (projects, sprints, users) = tokio::try_join!(
        client.list_projects(),
        client.list_sprints(None),
        client.list_users(),
    )?;
    Ok(FormOptions {
        projects,
        sprints,
        users,
    })
}

impl FormOptions {
    pub fn sprints_for(&self, project_id: Option<Id>) -> Vec<&Sprint> {
        self.sprints
            .iter()
            .filter(|s| Some(s.project_id) == project_id)
            .collect()
    }
}
