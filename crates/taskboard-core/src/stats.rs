//! Dashboard and progress aggregation over loaded tasks

use crate::models::{Id, Project, Sprint, Task, TaskStatus, TaskType};
use chrono::{DateTime, Utc};

/// Sprint cards show at most this many assignees
pub const MAX_SPRINT_ASSIGNEES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledCount {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub in_progress: usize,
    pub done: usize,
    pub bugs: usize,
    pub by_type: Vec<LabeledCount>,
    pub by_status: Vec<LabeledCount>,
}

impl DashboardStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count_status =
            |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        let count_type = |kind: TaskType| tasks.iter().filter(|t| t.task_type == kind).count();

        Self {
            total: tasks.len(),
            in_progress: count_status(TaskStatus::InProgress),
            done: count_status(TaskStatus::Done),
            bugs: count_type(TaskType::Bug),
            by_type: TaskType::ALL
                .into_iter()
                .map(|kind| LabeledCount {
                    label: kind.label(),
                    count: count_type(kind),
                })
                .collect(),
            by_status: TaskStatus::ALL
                .into_iter()
                .map(|status| LabeledCount {
                    label: status.label(),
                    count: count_status(status),
                })
                .collect(),
        }
    }

    pub fn completion_percent(&self) -> f64 {
        percent(self.done, self.total)
    }
}

/// `part / total * 100`, 0 for an empty total
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectProgress {
    pub project_id: Id,
    pub total: usize,
    pub done: usize,
}

impl ProjectProgress {
    pub fn for_project(project: &Project, tasks: &[Task]) -> Self {
        let mine: Vec<&Task> = tasks.iter().filter(|t| t.project_id == project.id).collect();
        Self {
            project_id: project.id,
            total: mine.len(),
            done: mine.iter().filter(|t| t.is_completed()).count(),
        }
    }

    pub fn percent(&self) -> f64 {
        percent(self.done, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SprintProgress {
    pub sprint_id: Id,
    pub total: usize,
    pub done: usize,
    /// Only for active sprints that have not ended yet
    pub days_remaining: Option<i64>,
    /// Distinct assignees in task order, capped at [`MAX_SPRINT_ASSIGNEES`]
    pub assignees: Vec<Id>,
}

impl SprintProgress {
    pub fn for_sprint(sprint: &Sprint, tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mine: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.sprint_id == Some(sprint.id))
            .collect();

        let days_remaining = Some(sprint.days_remaining(now))
            .filter(|days| sprint.is_active() && *days >= 0);

        let mut assignees = Vec::new();
        for id in mine.iter().filter_map(|t| t.assigned_to) {
            if assignees.len() == MAX_SPRINT_ASSIGNEES {
                break;
            }
            if !assignees.contains(&id) {
                assignees.push(id);
            }
        }

        Self {
            sprint_id: sprint.id,
            total: mine.len(),
            done: mine.iter().filter(|t| t.is_completed()).count(),
            days_remaining,
            assignees,
        }
    }

    pub fn percent(&self) -> f64 {
        percent(self.done, self.total)
    }
}
