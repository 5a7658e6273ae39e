//! Kanban board state and optimistic status moves

use crate::models::{Id, Task, TaskStatus};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardColumn {
    pub id: &'static str,
    pub label: &'static str,
    pub status: TaskStatus,
}

/// Columns left to right
pub const BOARD_COLUMNS: [BoardColumn; 4] = [
    BoardColumn {
        id: "todo",
        label: "To Do",
        status: TaskStatus::Todo,
    },
    BoardColumn {
        id: "in_progress",
        label: "In Progress",
        status: TaskStatus::InProgress,
    },
    BoardColumn {
        id: "in_review",
        label: "In Review",
        status: TaskStatus::InReview,
    },
    BoardColumn {
        id: "done",
        label: "Done",
        status: TaskStatus::Done,
    },
];

/// Resolve a column identifier to the status it represents
pub fn column_status(id: &str) -> Option<TaskStatus> {
    BOARD_COLUMNS
        .iter()
        .find(|column| column.id == id)
        .map(|column| column.status)
}

/// A card released over the board, from a mouse drag or a keyboard move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub task_id: Id,
    pub source: String,
    /// `None` when the drag was cancelled or released outside any column
    pub destination: Option<String>,
}

impl DropEvent {
    pub fn new(task_id: Id, source: TaskStatus, destination: Option<TaskStatus>) -> Self {
        Self {
            task_id,
            source: source.as_str().to_string(),
            destination: destination.map(|status| status.as_str().to_string()),
        }
    }
}

/// A status change applied locally and not yet confirmed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub task_id: Id,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct Board {
    tasks: Vec<Task>,
    pending: HashMap<Id, PendingMove>,
    next_generation: u64,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: Id) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Cards of one column, in snapshot order
    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    pub fn is_pending(&self, task_id: Id) -> bool {
        self.pending.contains_key(&task_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Apply a drop locally. Returns the move to send, or `None` when the drop
    /// does not change anything.
    pub fn begin_move(&mut self, drop: &DropEvent) -> Option<PendingMove> {
        let to = column_status(drop.destination.as_deref()?)?;
        let task = self.tasks.iter_mut().find(|t| t.id == drop.task_id)?;
        if task.status == to {
            return None;
        }

        let from = task.status;
        task.status = to;

        self.next_generation += 1;
        let mv = PendingMove {
            task_id: drop.task_id,
            from,
            to,
            generation: self.next_generation,
        };
        self.pending.insert(mv.task_id, mv);
        Some(mv)
    }

    /// Forget a confirmed move. A newer move of the same task stays pending.
    pub fn complete_move(&mut self, mv: &PendingMove) -> bool {
        if self.is_latest(mv) {
            self.pending.remove(&mv.task_id);
            true
        } else {
            false
        }
    }

    /// Undo a failed move, unless a later move of the same task superseded it
    pub fn rollback_move(&mut self, mv: &PendingMove) -> bool {
        if !self.is_latest(mv) {
            return false;
        }
        self.pending.remove(&mv.task_id);
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == mv.task_id) {
            task.status = mv.from;
        }
        true
    }

    /// Take a server snapshot; cards with a move in flight keep their local column
    pub fn replace(&mut self, snapshot: Vec<Task>) {
        self.tasks = snapshot;
        for task in &mut self.tasks {
            if let Some(mv) = self.pending.get(&task.id) {
                task.status = mv.to;
            }
        }
    }

    fn is_latest(&self, mv: &PendingMove) -> bool {
        self.pending
            .get(&mv.task_id)
            .is_some_and(|current| current.generation == mv.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskType;
    use crate::models::task::tests::task;

    fn board() -> Board {
        Board::new(vec![
            task(1, TaskStatus::Todo, TaskType::Task),
            task(2, TaskStatus::Done, TaskType::Bug),
        ])
    }

    fn drop_to(task_id: Id, source: TaskStatus, destination: &str) -> DropEvent {
        DropEvent {
            task_id,
            source: source.as_str().to_string(),
            destination: Some(destination.to_string()),
        }
    }

    #[test]
    fn test_columns_match_statuses() {
        let ids: Vec<&str> = BOARD_COLUMNS.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["todo", "in_progress", "in_review", "done"]);
        for column in BOARD_COLUMNS {
            assert_eq!(column.status.as_str(), column.id);
            assert_eq!(column.status.label(), column.label);
        }
        assert_eq!(column_status("blocked"), None);
    }

    #[test]
    fn test_begin_move_is_optimistic() {
        let mut board = board();
        let mv = board
            .begin_move(&drop_to(1, TaskStatus::Todo, "in_progress"))
            .unwrap();

        assert_eq!(mv.from, TaskStatus::Todo);
        assert_eq!(mv.to, TaskStatus::InProgress);
        assert_eq!(board.task(1).unwrap().status, TaskStatus::InProgress);
        assert!(board.is_pending(1));
        assert!(board.column(TaskStatus::Todo).is_empty());
        assert_eq!(board.task(2).unwrap().status, TaskStatus::Done);
    }

    #[test]
    fn test_noop_drops() {
        let mut board = board();

        let cancelled = DropEvent {
            task_id: 1,
            source: "todo".to_string(),
            destination: None,
        };
        assert!(board.begin_move(&cancelled).is_none());
        assert!(board.begin_move(&drop_to(1, TaskStatus::Todo, "todo")).is_none());
        assert!(board.begin_move(&drop_to(1, TaskStatus::Todo, "backlog")).is_none());
        assert!(board.begin_move(&drop_to(99, TaskStatus::Todo, "done")).is_none());

        assert_eq!(board.pending_count(), 0);
        assert_eq!(board.task(1).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_rollback_restores_previous_column() {
        let mut board = board();
        let mv = board
            .begin_move(&drop_to(1, TaskStatus::Todo, "in_review"))
            .unwrap();

        assert!(board.rollback_move(&mv));
        assert_eq!(board.task(1).unwrap().status, TaskStatus::Todo);
        assert!(!board.is_pending(1));
    }

    #[test]
    fn test_superseded_move_is_not_rolled_back() {
        let mut board = board();
        let first = board
            .begin_move(&drop_to(1, TaskStatus::Todo, "in_progress"))
            .unwrap();
        let second = board
            .begin_move(&drop_to(1, TaskStatus::InProgress, "done"))
            .unwrap();
        assert!(second.generation > first.generation);

        assert!(!board.rollback_move(&first));
        assert_eq!(board.task(1).unwrap().status, TaskStatus::Done);
        assert!(!board.complete_move(&first));
        assert!(board.is_pending(1));

        assert!(board.complete_move(&second));
        assert!(!board.is_pending(1));
    }

    #[test]
    fn test_snapshot_keeps_pending_card() {
        let mut board = board();
        board
            .begin_move(&drop_to(1, TaskStatus::Todo, "in_progress"))
            .unwrap();

        // stale snapshot still has the old status
        board.replace(vec![
            task(1, TaskStatus::Todo, TaskType::Task),
            task(2, TaskStatus::InReview, TaskType::Bug),
            task(3, TaskStatus::Todo, TaskType::Story),
        ]);

        assert_eq!(board.task(1).unwrap().status, TaskStatus::InProgress);
        assert_eq!(board.task(2).unwrap().status, TaskStatus::InReview);
        assert_eq!(board.column(TaskStatus::Todo).len(), 1);
    }

    #[test]
    fn test_drop_event_from_statuses() {
        let drop = DropEvent::new(5, TaskStatus::InReview, Some(TaskStatus::Done));
        assert_eq!(drop.source, "in_review");
        assert_eq!(drop.destination.as_deref(), Some("done"));
    }
}
