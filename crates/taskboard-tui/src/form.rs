//! Create-dialog editing state
//!
//! Wraps the core forms with field focus, option cycling and the inline
//! error line. Text fields take typed characters; select fields cycle with
//! Left/Right.

use taskboard_client::FormOptions;
use taskboard_core::forms::{ProjectForm, SprintForm, TaskForm};
use taskboard_core::models::{Id, Priority, TaskStatus, TaskType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn text(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        kind: FieldKind::Text,
    }
}

const fn select(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        kind: FieldKind::Select,
    }
}

const PROJECT_FIELDS: [FieldSpec; 3] = [text("Name"), text("Key"), text("Description")];

const TASK_FIELDS: [FieldSpec; 10] = [
    text("Title"),
    text("Description"),
    select("Project"),
    select("Sprint"),
    select("Type"),
    select("Priority"),
    select("Status"),
    text("Story points"),
    select("Assignee"),
    text("Due date (YYYY-MM-DD)"),
];

const SPRINT_FIELDS: [FieldSpec; 5] = [
    text("Name"),
    text("Goal"),
    select("Project"),
    text("Start date (YYYY-MM-DD)"),
    text("End date (YYYY-MM-DD)"),
];

#[derive(Debug, Clone)]
pub enum FormKind {
    Project(ProjectForm),
    Task(TaskForm),
    Sprint(SprintForm),
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub focused: usize,
    pub error: Option<String>,
    pub options: FormOptions,
}

/// Step through `ids`, optionally passing through "none"
fn cycle_id(current: Option<Id>, ids: &[Id], allow_none: bool, delta: i32) -> Option<Id> {
    let mut choices: Vec<Option<Id>> = Vec::with_capacity(ids.len() + 1);
    if allow_none {
        choices.push(None);
    }
    choices.extend(ids.iter().copied().map(Some));
    if choices.is_empty() {
        return current;
    }

    let len = choices.len() as i32;
    let pos = choices.iter().position(|c| *c == current).map(|p| p as i32);
    let next = match pos {
        Some(p) => (p + delta).rem_euclid(len),
        None => 0,
    };
    choices[next as usize]
}

fn cycle_value<T: Copy + PartialEq>(current: T, all: &[T], delta: i32) -> T {
    let len = all.len() as i32;
    let pos = all.iter().position(|v| *v == current).unwrap_or(0) as i32;
    all[(pos + delta).rem_euclid(len) as usize]
}

impl FormState {
    pub fn project() -> Self {
        Self {
            kind: FormKind::Project(ProjectForm::default()),
            focused: 0,
            error: None,
            options: FormOptions::default(),
        }
    }

    pub fn task(project_id: Option<Id>, options: FormOptions) -> Self {
        let project_id = project_id.or_else(|| options.projects.first().map(|p| p.id));
        Self {
            kind: FormKind::Task(TaskForm::new(project_id)),
            focused: 0,
            error: None,
            options,
        }
    }

    pub fn sprint(project_id: Option<Id>, options: FormOptions) -> Self {
        let project_id = project_id.or_else(|| options.projects.first().map(|p| p.id));
        Self {
            kind: FormKind::Sprint(SprintForm::new(project_id)),
            focused: 0,
            error: None,
            options,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Project(_) => " New Project ",
            FormKind::Task(_) => " New Task ",
            FormKind::Sprint(_) => " New Sprint ",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self.kind {
            FormKind::Project(_) => &PROJECT_FIELDS,
            FormKind::Task(_) => &TASK_FIELDS,
            FormKind::Sprint(_) => &SPRINT_FIELDS,
        }
    }

    pub fn focused_kind(&self) -> FieldKind {
        self.fields()[self.focused].kind
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields().len();
    }

    pub fn focus_previous(&mut self) {
        let len = self.fields().len();
        self.focused = (self.focused + len - 1) % len;
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        let field = match &mut self.kind {
            FormKind::Project(form) => match self.focused {
                0 => &mut form.name,
                1 => &mut form.key,
                2 => &mut form.description,
                _ => return None,
            },
            FormKind::Task(form) => match self.focused {
                0 => &mut form.title,
                1 => &mut form.description,
                7 => &mut form.story_points,
                9 => &mut form.due_date,
                _ => return None,
            },
            FormKind::Sprint(form) => match self.focused {
                0 => &mut form.name,
                1 => &mut form.goal,
                3 => &mut form.start_date,
                4 => &mut form.end_date,
                _ => return None,
            },
        };
        Some(field)
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.text_mut() {
            field.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.text_mut() {
            field.pop();
        }
    }

    /// Cycle the focused select field
    pub fn cycle(&mut self, delta: i32) {
        let project_ids: Vec<Id> = self.options.projects.iter().map(|p| p.id).collect();
        let user_ids: Vec<Id> = self.options.users.iter().map(|u| u.id).collect();

        match &mut self.kind {
            FormKind::Task(form) => match self.focused {
                2 => {
                    form.project_id = cycle_id(form.project_id, &project_ids, false, delta);
                    let keeps_sprint = form.sprint_id.is_some_and(|sid| {
                        self.options
                            .sprints
                            .iter()
                            .any(|s| s.id == sid && Some(s.project_id) == form.project_id)
                    });
                    if !keeps_sprint {
                        form.sprint_id = None;
                    }
                }
                3 => {
                    let sprint_ids: Vec<Id> = self
                        .options
                        .sprints_for(form.project_id)
                        .iter()
                        .map(|s| s.id)
                        .collect();
                    form.sprint_id = cycle_id(form.sprint_id, &sprint_ids, true, delta);
                }
                4 => form.task_type = cycle_value(form.task_type, &TaskType::ALL, delta),
                5 => form.priority = cycle_value(form.priority, &Priority::ALL, delta),
                6 => form.status = cycle_value(form.status, &TaskStatus::ALL, delta),
                8 => form.assigned_to = cycle_id(form.assigned_to, &user_ids, true, delta),
                _ => {}
            },
            FormKind::Sprint(form) => {
                if self.focused == 2 {
                    form.project_id = cycle_id(form.project_id, &project_ids, false, delta);
                }
            }
            FormKind::Project(_) => {}
        }
    }

    fn project_label(&self, id: Option<Id>) -> String {
        id.and_then(|id| self.options.projects.iter().find(|p| p.id == id))
            .map(|p| p.display_name())
            .unwrap_or_else(|| "(select)".to_string())
    }

    /// Display text of field `index`
    pub fn value(&self, index: usize) -> String {
        match &self.kind {
            FormKind::Project(form) => match index {
                0 => form.name.clone(),
                1 => form.key.clone(),
                2 => form.description.clone(),
                _ => String::new(),
            },
            FormKind::Task(form) => match index {
                0 => form.title.clone(),
                1 => form.description.clone(),
                2 => self.project_label(form.project_id),
                3 => form
                    .sprint_id
                    .and_then(|id| self.options.sprints.iter().find(|s| s.id == id))
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "Backlog".to_string()),
                4 => form.task_type.label().to_string(),
                5 => form.priority.as_str().to_string(),
                6 => form.status.label().to_string(),
                7 => form.story_points.clone(),
                8 => form
                    .assigned_to
                    .and_then(|id| self.options.users.iter().find(|u| u.id == id))
                    .map(|u| u.full_name.clone())
                    .unwrap_or_else(|| "Unassigned".to_string()),
                9 => form.due_date.clone(),
                _ => String::new(),
            },
            FormKind::Sprint(form) => match index {
                0 => form.name.clone(),
                1 => form.goal.clone(),
                2 => self.project_label(form.project_id),
                3 => form.start_date.clone(),
                4 => form.end_date.clone(),
                _ => String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskboard_core::models::{Project, Sprint, SprintStatus, User};

    fn options() -> FormOptions {
        let now = Utc::now();
        let project = |id: Id, key: &str| Project {
            id,
            name: format!("Project {}", key),
            key: key.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        FormOptions {
            projects: vec![project(1, "ONE"), project(2, "TWO")],
            sprints: vec![Sprint {
                id: 10,
                project_id: 1,
                name: "Sprint 1".to_string(),
                goal: None,
                start_date: now,
                end_date: now,
                status: SprintStatus::Planned,
                created_at: now,
            }],
            users: vec![User {
                id: 5,
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                full_name: "Ada Lovelace".to_string(),
                avatar_url: None,
                created_at: now,
            }],
        }
    }

    #[test]
    fn test_task_form_defaults_to_first_project() {
        let form = FormState::task(None, options());
        assert_eq!(form.value(2), "Project ONE (ONE)");
        assert_eq!(form.value(3), "Backlog");
        assert_eq!(form.value(8), "Unassigned");
    }

    #[test]
    fn test_typing_only_reaches_text_fields() {
        let mut form = FormState::task(Some(1), options());
        form.input_char('H');
        form.input_char('i');
        form.focused = 2;
        form.input_char('x');
        assert_eq!(form.value(0), "Hi");
        assert_eq!(form.focused_kind(), FieldKind::Select);

        form.focused = 0;
        form.backspace();
        assert_eq!(form.value(0), "H");
    }

    #[test]
    fn test_cycle_selects() {
        let mut form = FormState::task(Some(1), options());

        form.focused = 3;
        form.cycle(1);
        assert_eq!(form.value(3), "Sprint 1");

        // switching project drops a sprint from another project
        form.focused = 2;
        form.cycle(1);
        assert_eq!(form.value(2), "Project TWO (TWO)");
        assert_eq!(form.value(3), "Backlog");

        form.focused = 4;
        form.cycle(-1);
        assert_eq!(form.value(4), "Story");

        form.focused = 8;
        form.cycle(1);
        assert_eq!(form.value(8), "Ada Lovelace");
        form.cycle(1);
        assert_eq!(form.value(8), "Unassigned");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = FormState::project();
        form.focus_previous();
        assert_eq!(form.focused, 2);
        form.focus_next();
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn test_cycle_id_without_choices() {
        assert_eq!(cycle_id(Some(3), &[], false, 1), Some(3));
        assert_eq!(cycle_id(None, &[1, 2], false, 1), Some(1));
        assert_eq!(cycle_id(Some(2), &[1, 2], false, 1), Some(1));
    }
}
