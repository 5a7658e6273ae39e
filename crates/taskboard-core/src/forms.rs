//! Create-dialog input and its validation
//!
//! Each form holds the raw text a user typed plus the values picked from
//! option lists. `validate` turns it into the request payload, or a
//! [`Error::Validation`] carrying the message shown in the dialog. Nothing
//! here touches the network.

use crate::models::{
    Id, NewProject, NewSprint, NewTask, Priority, SprintStatus, TaskStatus, TaskType,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};

pub const PROJECT_KEY_MIN: usize = 2;
pub const PROJECT_KEY_MAX: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub key: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub project_id: Option<Id>,
    pub sprint_id: Option<Id>,
    pub task_type: TaskType,
    pub priority: Priority,
    pub status: TaskStatus,
    pub story_points: String,
    pub assigned_to: Option<Id>,
    pub due_date: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SprintForm {
    pub name: String,
    pub goal: String,
    pub project_id: Option<Id>,
    pub start_date: String,
    pub end_date: String,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(value: &str, field: &str) -> Result<DateTime<Utc>> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::Validation(format!("{} must be a date (YYYY-MM-DD)", field)))
}

impl ProjectForm {
    pub fn validate(&self) -> Result<NewProject> {
        let name = self.name.trim();
        let key = self.key.trim();
        if name.is_empty() || key.is_empty() {
            return Err(Error::Validation("Name and Key are required".to_string()));
        }

        let len = key.chars().count();
        if !(PROJECT_KEY_MIN..=PROJECT_KEY_MAX).contains(&len) {
            return Err(Error::Validation(format!(
                "Project key must be between {} and {} characters",
                PROJECT_KEY_MIN, PROJECT_KEY_MAX
            )));
        }

        Ok(NewProject {
            name: name.to_string(),
            key: key.to_uppercase(),
            description: non_blank(&self.description),
        })
    }
}

impl TaskForm {
    /// Empty form preselecting the board's project
    pub fn new(project_id: Option<Id>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            project_id,
            sprint_id: None,
            task_type: TaskType::Task,
            priority: Priority::Medium,
            status: TaskStatus::Todo,
            story_points: String::new(),
            assigned_to: None,
            due_date: String::new(),
        }
    }

    pub fn validate(&self, created_by: Id) -> Result<NewTask> {
        let title = self.title.trim();
        let project_id = match self.project_id {
            Some(id) if !title.is_empty() => id,
            _ => {
                return Err(Error::Validation(
                    "Title and Project are required".to_string(),
                ));
            }
        };

        let story_points = match non_blank(&self.story_points) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                Error::Validation("Story points must be a non-negative whole number".to_string())
            })?),
            None => None,
        };

        let due_date = match non_blank(&self.due_date) {
            Some(raw) => Some(parse_date(&raw, "Due date")?),
            None => None,
        };

        Ok(NewTask {
            project_id,
            sprint_id: self.sprint_id,
            title: title.to_string(),
            description: non_blank(&self.description),
            task_type: self.task_type,
            status: self.status,
            priority: self.priority,
            story_points,
            assigned_to: self.assigned_to,
            due_date,
            created_by,
        })
    }
}

impl SprintForm {
    pub fn new(project_id: Option<Id>) -> Self {
        Self {
            project_id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<NewSprint> {
        let name = self.name.trim();
        let project_id = match self.project_id {
            Some(id)
                if !name.is_empty()
                    && !self.start_date.trim().is_empty()
                    && !self.end_date.trim().is_empty() =>
            {
                id
            }
            _ => {
                return Err(Error::Validation(
                    "Name, Project, Start and End date are required".to_string(),
                ));
            }
        };

        let start_date = parse_date(&self.start_date, "Start date")?;
        let end_date = parse_date(&self.end_date, "End date")?;
        if end_date < start_date {
            return Err(Error::Validation(
                "End date cannot be before start date".to_string(),
            ));
        }

        Ok(NewSprint {
            project_id,
            name: name.to_string(),
            goal: non_blank(&self.goal),
            start_date,
            end_date,
            status: SprintStatus::Planned,
        })
    }
}

/// Render a stored date the way the forms accept it
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_form(name: &str, key: &str) -> ProjectForm {
        ProjectForm {
            name: name.to_string(),
            key: key.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_project_requires_name_and_key() {
        let err = project_form("", "DTB").validate().unwrap_err();
        assert_eq!(err.to_string(), "Name and Key are required");

        let err = project_form("Board", "   ").validate().unwrap_err();
        assert_eq!(err.to_string(), "Name and Key are required");
    }

    #[test]
    fn test_project_key_length() {
        for key in ["A", "ABCDEFGHIJK"] {
            let err = project_form("Board", key).validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                "Project key must be between 2 and 10 characters"
            );
        }
        assert!(project_form("Board", "AB").validate().is_ok());
        assert!(project_form("Board", "ABCDEFGHIJ").validate().is_ok());
    }

    #[test]
    fn test_project_key_uppercased_and_blank_description_dropped() {
        let mut form = project_form(" Board ", "dtb");
        form.description = "  ".to_string();
        let project = form.validate().unwrap();
        assert_eq!(project.name, "Board");
        assert_eq!(project.key, "DTB");
        assert!(project.description.is_none());

        let body = serde_json::to_value(&project).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Board", "key": "DTB"}));
    }

    #[test]
    fn test_task_defaults() {
        let mut form = TaskForm::new(Some(4));
        form.title = "Write docs".to_string();
        let task = form.validate(7).unwrap();

        assert_eq!(task.project_id, 4);
        assert_eq!(task.created_by, 7);
        assert_eq!(task.task_type, TaskType::Task);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.story_points.is_none());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_task_requires_title_and_project() {
        let mut form = TaskForm::new(None);
        form.title = "Orphan".to_string();
        let err = form.validate(1).unwrap_err();
        assert_eq!(err.to_string(), "Title and Project are required");

        let form = TaskForm::new(Some(1));
        assert!(form.validate(1).is_err());
    }

    #[test]
    fn test_task_story_points_and_due_date() {
        let mut form = TaskForm::new(Some(1));
        form.title = "Estimate".to_string();

        form.story_points = "-3".to_string();
        assert!(form.validate(1).is_err());

        form.story_points = "5".to_string();
        form.due_date = "31/12/2024".to_string();
        assert!(form.validate(1).is_err());

        form.due_date = "2024-12-31".to_string();
        let task = form.validate(1).unwrap();
        assert_eq!(task.story_points, Some(5));
        assert_eq!(format_date(&task.due_date.unwrap()), "2024-12-31");
    }

    #[test]
    fn test_sprint_dates() {
        let mut form = SprintForm::new(Some(2));
        form.name = "Sprint 3".to_string();
        form.start_date = "2024-06-10".to_string();
        form.end_date = "2024-06-01".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "End date cannot be before start date");

        form.end_date = "2024-06-24".to_string();
        let sprint = form.validate().unwrap();
        assert_eq!(sprint.status, SprintStatus::Planned);
        assert!(sprint.goal.is_none());
    }

    #[test]
    fn test_sprint_requires_fields() {
        let form = SprintForm::new(Some(2));
        assert!(form.validate().is_err());
    }
}
