//! Task data model

use super::{Id, timestamp};
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Id,
    pub project_id: Id,
    #[serde(default)]
    pub sprint_id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default)]
    pub story_points: Option<u32>,
    #[serde(default)]
    pub assigned_to: Option<Id>,
    pub created_by: Id,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    InReview,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Story,
    Task,
    Bug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Body of `POST /api/tasks`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTask {
    pub project_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<Id>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Id>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Id,
}

/// Body of `PUT /api/tasks/{id}`; unset fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<Id>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/tasks/{id}/move`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskMove {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<Id>,
}

/// Body of `PUT /api/tasks/{id}/assign`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskAssign {
    pub user_id: Id,
}

/// Server-side filters accepted by `GET /api/tasks`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Id>,
}

impl Task {
    /// Tasks without a sprint make up the backlog
    pub fn is_backlog(&self) -> bool {
        self.sprint_id.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

impl TaskMove {
    pub fn to_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            sprint_id: None,
        }
    }

    pub fn to_sprint(sprint_id: Id) -> Self {
        Self {
            status: None,
            sprint_id: Some(sprint_id),
        }
    }
}

impl TaskFilter {
    pub fn for_project(project_id: Option<Id>) -> Self {
        Self {
            project_id,
            ..Self::default()
        }
    }

    pub fn for_sprint(sprint_id: Id) -> Self {
        Self {
            sprint_id: Some(sprint_id),
            ..Self::default()
        }
    }

    /// Query pairs in the order the API documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.project_id {
            pairs.push(("project_id", id.to_string()));
        }
        if let Some(id) = self.sprint_id {
            pairs.push(("sprint_id", id.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(id) = self.assigned_to {
            pairs.push(("assigned_to", id.to_string()));
        }
        pairs
    }
}

impl TaskStatus {
    /// Board column order
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::InReview, Self::Done];

    /// Wire identifier, also used as the board column identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::InReview => "in_review",
            TaskStatus::Done => "done",
        }
    }

    /// Get a human-readable string for the status
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::InReview => "In Review",
            TaskStatus::Done => "Done",
        }
    }

    pub fn column_index(&self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::InReview => 2,
            TaskStatus::Done => 3,
        }
    }

    pub fn from_column_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl TaskType {
    pub const ALL: [Self; 3] = [Self::Story, Self::Task, Self::Bug];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Story => "story",
            TaskType::Task => "task",
            TaskType::Bug => "bug",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Story => "Story",
            TaskType::Task => "Task",
            TaskType::Bug => "Bug",
        }
    }
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::UnknownVariant {
                kind: "task status",
                value: s.to_string(),
            })
    }
}

impl FromStr for TaskType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownVariant {
                kind: "task type",
                value: s.to_string(),
            })
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| Error::UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal task for tests in this crate
    pub(crate) fn task(id: Id, status: TaskStatus, task_type: TaskType) -> Task {
        let now = Utc::now();
        Task {
            id,
            project_id: 1,
            sprint_id: None,
            title: format!("Task {}", id),
            description: None,
            task_type,
            status,
            priority: Priority::Medium,
            story_points: None,
            assigned_to: None,
            created_by: 1,
            created_at: now,
            updated_at: now,
            due_date: None,
        }
    }

    #[test]
    fn test_deserialize_api_task() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": 12,
            "project_id": 1,
            "sprint_id": null,
            "title": "Fix login",
            "description": "Crash on submit",
            "task_type": "bug",
            "status": "in_review",
            "priority": "critical",
            "story_points": 3,
            "assigned_to": 2,
            "created_by": 1,
            "created_at": "2024-05-01T09:30:00",
            "updated_at": "2024-05-01T09:30:00",
            "due_date": null,
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::InReview);
        assert_eq!(task.task_type, TaskType::Bug);
        assert_eq!(task.priority, Priority::Critical);
        assert!(task.is_backlog());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_status_identifiers() {
        let ids: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, vec!["todo", "in_progress", "in_review", "done"]);

        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
            assert_eq!(
                TaskStatus::from_column_index(status.column_index()),
                Some(status)
            );
        }

        assert!("archived".parse::<TaskStatus>().is_err());
        assert_eq!(TaskStatus::from_column_index(4), None);
    }

    #[test]
    fn test_status_as_label() {
        assert_eq!(TaskStatus::Todo.label(), "To Do");
        assert_eq!(TaskStatus::InProgress.label(), "In Progress");
        assert_eq!(TaskStatus::InReview.label(), "In Review");
        assert_eq!(TaskStatus::Done.label(), "Done");
    }

    #[test]
    fn test_move_body_only_carries_status() {
        let body = serde_json::to_value(TaskMove::to_status(TaskStatus::InProgress)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "in_progress"}));
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = TaskFilter {
            project_id: Some(2),
            status: Some(TaskStatus::Done),
            ..TaskFilter::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("project_id", "2".to_string()), ("status", "done".to_string())]
        );
        assert!(TaskFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::Low < Priority::Medium);
    }
}
