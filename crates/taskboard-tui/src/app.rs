//! Application state management

use crate::form::{FormKind, FormState};
use chrono::Utc;
use std::time::Duration;
use taskboard_client::sync::{self, FormOptions, load_form_options};
use taskboard_client::{
    Error, FetchMessage, Fetcher, HttpTransport, MoveOutcome, QueryCache, QueryKey, Transport,
};
use taskboard_core::board::{BOARD_COLUMNS, Board, DropEvent};
use taskboard_core::models::{
    ActivityLog, Comment, Config, Id, NewComment, Project, Sprint, SprintStatus, Task, TaskFilter,
    TaskStatus, User,
};
use taskboard_core::table::TableFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Dashboard,
    Board,
    Backlog,
    Projects,
    Sprints,
}

impl AppView {
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Board,
        Self::Backlog,
        Self::Projects,
        Self::Sprints,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Board => "Board",
            Self::Backlog => "Backlog",
            Self::Projects => "Projects",
            Self::Sprints => "Sprints",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Dashboard => "📊",
            Self::Board => "📋",
            Self::Backlog => "📝",
            Self::Projects => "📁",
            Self::Sprints => "🏃",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Comment,
    AssignUser,
    DeleteTaskConfirm,
    DeleteProjectConfirm,
}

/// Backlog status filter choices, `None` meaning all statuses
pub const STATUS_FILTERS: [Option<TaskStatus>; 5] = [
    None,
    Some(TaskStatus::Todo),
    Some(TaskStatus::InProgress),
    Some(TaskStatus::InReview),
    Some(TaskStatus::Done),
];

#[derive(Debug, Clone)]
pub struct KanbanDragState {
    pub source_column: usize,
    pub source_card_index: usize,
    pub source_task_id: Id,
    pub source_task_title: String,
    /// `None` while the pointer is outside every column
    pub current_hover_column: Option<usize>,
    pub current_mouse_x: u16,
    pub current_mouse_y: u16,
}

pub struct App<T: Transport = HttpTransport> {
    pub fetcher: Fetcher<T>,
    pub config: Config,
    pub cache: QueryCache,
    pub current_view: AppView,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub show_help: bool,
    pub should_quit: bool,
    pub status_message: String,

    pub board: Board,
    pub board_project: Option<Id>,
    pub selected_column_index: usize,
    pub selected_kanban_card_index: usize,
    pub kanban_drag: Option<KanbanDragState>,

    pub backlog_filter: TableFilter,
    pub selected_backlog_index: usize,
    pub selected_project_index: usize,
    pub selected_sprint_index: usize,

    pub drawer_task: Option<Id>,
    pub picker_index: usize,
    pub form: Option<FormState>,
}

fn describe(key: &QueryKey) -> &'static str {
    match key {
        QueryKey::Projects => "projects",
        QueryKey::Sprints(_) => "sprints",
        QueryKey::Tasks(_) => "tasks",
        QueryKey::Users => "users",
        QueryKey::Comments(_) => "comments",
        QueryKey::Activity(_) => "activity",
    }
}

/// Unfiltered task list shared by the dashboard, backlog and progress views
pub fn all_tasks_key() -> QueryKey {
    QueryKey::Tasks(TaskFilter::default())
}

impl<T: Transport> App<T> {
    pub fn new(fetcher: Fetcher<T>, config: Config) -> Self {
        let cache = QueryCache::new(Duration::from_secs(config.ui.stale_after_secs));
        let board_project = config.ui.default_project;

        Self {
            fetcher,
            config,
            cache,
            current_view: AppView::Dashboard,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            show_help: false,
            should_quit: false,
            status_message: String::new(),
            board: Board::default(),
            board_project,
            selected_column_index: 0,
            selected_kanban_card_index: 0,
            kanban_drag: None,
            backlog_filter: TableFilter::default(),
            selected_backlog_index: 0,
            selected_project_index: 0,
            selected_sprint_index: 0,
            drawer_task: None,
            picker_index: 0,
            form: None,
        }
    }

    pub fn user_id(&self) -> Id {
        self.config.ui.default_user_id
    }

    pub fn board_key(&self) -> QueryKey {
        QueryKey::Tasks(TaskFilter::for_project(self.board_project))
    }

    /// Queries the current screen reads from
    pub fn needed_keys(&self) -> Vec<QueryKey> {
        let mut keys = match self.current_view {
            AppView::Dashboard => vec![all_tasks_key(), QueryKey::Projects],
            AppView::Board => vec![self.board_key(), QueryKey::Projects, QueryKey::Users],
            AppView::Backlog => vec![all_tasks_key(), QueryKey::Users, QueryKey::Projects],
            AppView::Projects => vec![QueryKey::Projects, all_tasks_key()],
            AppView::Sprints => vec![
                QueryKey::Sprints(None),
                all_tasks_key(),
                QueryKey::Users,
                QueryKey::Projects,
            ],
        };

        if let Some(task_id) = self.drawer_task {
            keys.push(QueryKey::Comments(task_id));
            keys.push(QueryKey::Activity(task_id));
            if !keys.contains(&QueryKey::Users) {
                keys.push(QueryKey::Users);
            }
        }
        keys
    }

    pub fn is_loading(&self, key: &QueryKey) -> bool {
        self.cache.get(key).is_none()
    }

    /// Fetch whatever the current screen needs that is missing or stale
    pub fn load_view(&mut self) {
        let stale = self.cache.stale_keys(&self.needed_keys());
        if !stale.is_empty() {
            tracing::debug!(view = ?self.current_view, count = stale.len(), "fetching stale queries");
        }
        self.fetcher.fetch_all(stale);
        self.sync_board_from_cache();
    }

    /// Switch screens. Reads still running for the old screen are dropped.
    pub fn enter_view(&mut self, view: AppView) {
        if view == self.current_view {
            return;
        }
        self.fetcher.teardown();
        self.kanban_drag = None;
        self.drawer_task = None;
        self.current_view = view;
        self.status_message.clear();
        self.load_view();
    }

    pub fn refresh(&mut self) {
        let keys = self.needed_keys();
        self.cache.invalidate_many(&keys);
        self.status_message = "Refreshing...".to_string();
        self.load_view();
    }

    fn sync_board_from_cache(&mut self) {
        if let Some(tasks) = self.cache.tasks(&TaskFilter::for_project(self.board_project)) {
            self.board.replace(tasks.to_vec());
        }
        self.clamp_selection();
    }

    pub fn handle_message(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Fetched { key, result } => match result {
                Ok(data) => {
                    let is_board =
                        self.current_view == AppView::Board && key == self.board_key();
                    self.cache.store(key, data);
                    if is_board {
                        self.sync_board_from_cache();
                    }
                    self.clamp_selection();
                }
                Err(e) => {
                    self.status_message =
                        format!("Failed to load {}: {}", describe(&key), e.user_message());
                }
            },
            FetchMessage::MoveFinished { mv, result } => {
                let outcome = sync::settle_move(&mut self.board, &mv, result);
                self.cache.invalidate_task(Some(mv.task_id));
                self.status_message = match outcome {
                    MoveOutcome::Moved(task) => {
                        format!("Moved '{}' to {}", task.title, task.status.label())
                    }
                    MoveOutcome::RolledBack { reason, .. } => format!("Move failed: {}", reason),
                };
                self.load_view();
            }
        }
    }

    fn report_error(&mut self, action: &str, error: &Error) {
        tracing::warn!(error = %error, "{} failed", action);
        self.status_message = format!("Failed to {}: {}", action, error.user_message());
    }

    // Cached data

    pub fn projects(&self) -> &[Project] {
        self.cache.projects().unwrap_or(&[])
    }

    pub fn sprints(&self) -> &[Sprint] {
        self.cache.sprints(None).unwrap_or(&[])
    }

    pub fn users(&self) -> &[User] {
        self.cache.users().unwrap_or(&[])
    }

    pub fn all_tasks(&self) -> &[Task] {
        self.cache.tasks(&TaskFilter::default()).unwrap_or(&[])
    }

    pub fn user(&self, id: Id) -> Option<&User> {
        self.users().iter().find(|u| u.id == id)
    }

    pub fn assignee_name(&self, id: Option<Id>) -> String {
        match id {
            Some(id) => self
                .user(id)
                .map(|u| u.full_name.clone())
                .unwrap_or_else(|| format!("User #{}", id)),
            None => "Unassigned".to_string(),
        }
    }

    pub fn project_name(&self, id: Id) -> String {
        self.projects()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.key.clone())
            .unwrap_or_else(|| format!("#{}", id))
    }

    pub fn board_project_label(&self) -> String {
        match self.board_project {
            Some(id) => self
                .projects()
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.display_name())
                .unwrap_or_else(|| format!("Project #{}", id)),
            None => "All projects".to_string(),
        }
    }

    // Board

    pub fn get_kanban_tasks(&self, column_index: usize) -> Vec<&Task> {
        BOARD_COLUMNS
            .get(column_index)
            .map(|column| self.board.column(column.status))
            .unwrap_or_default()
    }

    pub fn selected_kanban_task(&self) -> Option<&Task> {
        self.get_kanban_tasks(self.selected_column_index)
            .get(self.selected_kanban_card_index)
            .copied()
    }

    /// Drop `task_id` on `destination`. The board updates at once and the
    /// server call runs in the background.
    pub fn drop_task(&mut self, task_id: Id, destination: Option<TaskStatus>) {
        let Some(task) = self.board.task(task_id) else {
            return;
        };
        let title = task.title.clone();
        let drop = DropEvent::new(task_id, task.status, destination);

        match self.board.begin_move(&drop) {
            Some(mv) => {
                tracing::info!(task_id, from = %mv.from, to = %mv.to, "moving task");
                self.status_message = format!("Moving '{}' to {}...", title, mv.to.label());
                self.fetcher.send_move(mv);
            }
            None => {
                self.status_message = "Drag cancelled".to_string();
            }
        }
    }

    /// Keyboard move of the selected card one column left or right
    pub fn move_kanban_card(&mut self, direction: i32) {
        let Some(task) = self.selected_kanban_task() else {
            return;
        };
        let task_id = task.id;
        let target = self.selected_column_index as i32 + direction;
        let Some(destination) = usize::try_from(target)
            .ok()
            .and_then(TaskStatus::from_column_index)
        else {
            return;
        };

        self.drop_task(task_id, Some(destination));
        self.selected_column_index = destination.column_index();
        if let Some(idx) = self
            .get_kanban_tasks(self.selected_column_index)
            .iter()
            .position(|t| t.id == task_id)
        {
            self.selected_kanban_card_index = idx;
        }
    }

    /// Step the board through "all projects" and each project
    pub fn cycle_board_project(&mut self) {
        let mut choices: Vec<Option<Id>> = vec![None];
        choices.extend(self.projects().iter().map(|p| Some(p.id)));

        let pos = choices
            .iter()
            .position(|c| *c == self.board_project)
            .unwrap_or(0);
        self.set_board_project(choices[(pos + 1) % choices.len()]);
        self.status_message = format!("Board: {}", self.board_project_label());
        self.load_view();
    }

    fn set_board_project(&mut self, project_id: Option<Id>) {
        self.board_project = project_id;
        self.selected_kanban_card_index = 0;

        let tasks = self
            .cache
            .tasks(&TaskFilter::for_project(project_id))
            .map(<[Task]>::to_vec)
            .unwrap_or_default();
        self.board.replace(tasks);
    }

    /// Jump to the board filtered to the selected project
    pub fn open_selected_project_board(&mut self) {
        let Some(project_id) = self.selected_project().map(|p| p.id) else {
            return;
        };
        self.set_board_project(Some(project_id));
        self.enter_view(AppView::Board);
    }

    // Backlog

    pub fn backlog_tasks(&self) -> Vec<&Task> {
        self.backlog_filter
            .apply(self.all_tasks())
            .into_iter()
            .filter(|t| t.is_backlog())
            .collect()
    }

    pub fn selected_backlog_task(&self) -> Option<&Task> {
        self.backlog_tasks()
            .get(self.selected_backlog_index)
            .copied()
    }

    pub fn cycle_status_filter(&mut self) {
        let current = self
            .backlog_filter
            .status
            .as_deref()
            .and_then(|s| s.parse::<TaskStatus>().ok());
        let pos = STATUS_FILTERS
            .iter()
            .position(|f| *f == current)
            .unwrap_or(0);
        let next = STATUS_FILTERS[(pos + 1) % STATUS_FILTERS.len()];
        self.backlog_filter.status = next.map(|s| s.as_str().to_string());
        self.selected_backlog_index = 0;
        self.status_message = format!(
            "Status filter: {}",
            next.map(|s| s.label()).unwrap_or("All")
        );
    }

    pub fn apply_search(&mut self) {
        self.backlog_filter.search = self.input_buffer.trim().to_string();
        self.selected_backlog_index = 0;
    }

    // Projects and sprints

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects().get(self.selected_project_index)
    }

    pub fn selected_sprint(&self) -> Option<&Sprint> {
        self.sprints().get(self.selected_sprint_index)
    }

    pub fn list_next(&mut self) {
        let len = match self.current_view {
            AppView::Backlog => self.backlog_tasks().len(),
            AppView::Projects => self.projects().len(),
            AppView::Sprints => self.sprints().len(),
            _ => return,
        };
        let index = match self.current_view {
            AppView::Backlog => &mut self.selected_backlog_index,
            AppView::Projects => &mut self.selected_project_index,
            _ => &mut self.selected_sprint_index,
        };
        if *index + 1 < len {
            *index += 1;
        }
    }

    pub fn list_previous(&mut self) {
        let index = match self.current_view {
            AppView::Backlog => &mut self.selected_backlog_index,
            AppView::Projects => &mut self.selected_project_index,
            AppView::Sprints => &mut self.selected_sprint_index,
            _ => return,
        };
        *index = index.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let clamp = |index: &mut usize, len: usize| {
            if *index >= len {
                *index = len.saturating_sub(1);
            }
        };

        let kanban_len = self.get_kanban_tasks(self.selected_column_index).len();
        clamp(&mut self.selected_kanban_card_index, kanban_len);
        let backlog_len = self.backlog_tasks().len();
        clamp(&mut self.selected_backlog_index, backlog_len);
        let projects_len = self.projects().len();
        clamp(&mut self.selected_project_index, projects_len);
        let sprints_len = self.sprints().len();
        clamp(&mut self.selected_sprint_index, sprints_len);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // Task drawer

    pub fn open_drawer(&mut self, task_id: Id) {
        self.drawer_task = Some(task_id);
        self.load_view();
    }

    pub fn close_drawer(&mut self) {
        self.drawer_task = None;
        self.input_mode = InputMode::Normal;
    }

    /// Task shown in the drawer. The board's optimistic copy is only current
    /// while the board is on screen; other views read the cached task list.
    pub fn drawer_task(&self) -> Option<&Task> {
        let id = self.drawer_task?;
        let from_board = match self.current_view {
            AppView::Board => self.board.task(id),
            _ => None,
        };
        from_board.or_else(|| self.all_tasks().iter().find(|t| t.id == id))
    }

    pub fn drawer_comments(&self) -> Option<&[Comment]> {
        self.cache.comments(self.drawer_task?)
    }

    pub fn drawer_activity(&self) -> Option<&[ActivityLog]> {
        self.cache.activity(self.drawer_task?)
    }

    fn after_task_change(&mut self, task_id: Option<Id>) {
        self.cache.invalidate_task(task_id);
        self.load_view();
    }

    pub async fn submit_comment(&mut self) {
        let Some(task_id) = self.drawer_task else {
            return;
        };
        let comment = match NewComment::new(task_id, self.user_id(), &self.input_buffer) {
            Ok(comment) => comment,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };

        let client = self.fetcher.client().clone();
        match client.add_comment(&comment).await {
            Ok(_) => {
                self.input_buffer.clear();
                self.input_mode = InputMode::Normal;
                self.status_message = "Comment added".to_string();
                self.after_task_change(Some(task_id));
            }
            Err(e) => self.report_error("add comment", &e),
        }
    }

    pub async fn assign_picked_user(&mut self) {
        let Some(task_id) = self.drawer_task else {
            return;
        };
        let Some(user) = self.users().get(self.picker_index).cloned() else {
            return;
        };

        let client = self.fetcher.client().clone();
        match client.assign_task(task_id, user.id).await {
            Ok(task) => {
                self.input_mode = InputMode::Normal;
                self.status_message = format!("Assigned '{}' to {}", task.title, user.full_name);
                self.after_task_change(Some(task_id));
            }
            Err(e) => self.report_error("assign task", &e),
        }
    }

    pub async fn complete_drawer_task(&mut self) {
        let Some(task) = self.drawer_task().cloned() else {
            return;
        };
        if task.is_completed() {
            self.status_message = "Task is already done".to_string();
            return;
        }

        let client = self.fetcher.client().clone();
        match client.set_task_status(task.id, TaskStatus::Done).await {
            Ok(task) => {
                self.status_message = format!("Completed '{}'", task.title);
                self.after_task_change(Some(task.id));
            }
            Err(e) => self.report_error("complete task", &e),
        }
    }

    pub async fn delete_drawer_task(&mut self) {
        let Some(task_id) = self.drawer_task else {
            return;
        };

        let client = self.fetcher.client().clone();
        match client.delete_task(task_id).await {
            Ok(()) => {
                tracing::info!(task_id, "task deleted");
                self.status_message = "Task deleted".to_string();
                self.drawer_task = None;
                self.after_task_change(Some(task_id));
            }
            Err(e) => self.report_error("delete task", &e),
        }
    }

    pub async fn delete_selected_project(&mut self) {
        let Some(project) = self.selected_project().cloned() else {
            return;
        };

        let client = self.fetcher.client().clone();
        match client.delete_project(project.id).await {
            Ok(()) => {
                tracing::info!(project_id = project.id, "project deleted");
                if self.board_project == Some(project.id) {
                    self.board_project = None;
                }
                self.status_message = format!("Deleted project '{}'", project.name);
                self.cache.invalidate_projects();
                self.load_view();
            }
            Err(e) => self.report_error("delete project", &e),
        }
    }

    /// Start a planned sprint, or complete an active one
    pub async fn advance_selected_sprint(&mut self, target: SprintStatus) {
        let Some(sprint) = self.selected_sprint().cloned() else {
            return;
        };

        let client = self.fetcher.client().clone();
        let result = match (sprint.status, target) {
            (SprintStatus::Planned, SprintStatus::Active) => client.start_sprint(sprint.id).await,
            (SprintStatus::Active, SprintStatus::Completed) => {
                client.complete_sprint(sprint.id).await
            }
            (current, _) => {
                self.status_message =
                    format!("Sprint '{}' is {}", sprint.name, current.label().to_lowercase());
                return;
            }
        };

        match result {
            Ok(sprint) => {
                self.status_message =
                    format!("Sprint '{}' is now {}", sprint.name, sprint.status.label());
                self.cache.invalidate_sprints();
                self.load_view();
            }
            Err(e) => self.report_error("update sprint", &e),
        }
    }

    // Create dialogs

    pub fn open_project_form(&mut self) {
        self.form = Some(FormState::project());
        self.input_mode = InputMode::Form;
    }

    pub async fn open_task_form(&mut self) {
        self.open_form_with_options(FormState::task).await;
    }

    pub async fn open_sprint_form(&mut self) {
        self.open_form_with_options(FormState::sprint).await;
    }

    /// Task and sprint dialogs need their pickers filled before they open
    async fn open_form_with_options(&mut self, build: fn(Option<Id>, FormOptions) -> FormState) {
        self.status_message = "Loading...".to_string();
        let client = self.fetcher.client().clone();
        match load_form_options(&client).await {
            Ok(options) => {
                self.form = Some(build(self.board_project, options));
                self.input_mode = InputMode::Form;
                self.status_message.clear();
            }
            Err(e) => self.report_error("load form options", &e),
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    /// Validate and send the open dialog. Problems stay inline in the dialog.
    pub async fn submit_form(&mut self) {
        let Some(kind) = self.form.as_ref().map(|form| form.kind.clone()) else {
            return;
        };
        let client = self.fetcher.client().clone();
        let created_by = self.user_id();

        let result = match &kind {
            FormKind::Project(f) => match f.validate() {
                Ok(project) => client.create_project(&project).await.map(|p| {
                    self.cache.invalidate_projects();
                    format!("Created project '{}'", p.name)
                }),
                Err(e) => Err(e.into()),
            },
            FormKind::Task(f) => match f.validate(created_by) {
                Ok(task) => client.create_task(&task).await.map(|t| {
                    self.cache.invalidate_task(None);
                    format!("Created task '{}'", t.title)
                }),
                Err(e) => Err(e.into()),
            },
            FormKind::Sprint(f) => match f.validate() {
                Ok(sprint) => client.create_sprint(&sprint).await.map(|s| {
                    self.cache.invalidate_sprints();
                    format!("Created sprint '{}'", s.name)
                }),
                Err(e) => Err(e.into()),
            },
        };

        match result {
            Ok(message) => {
                tracing::info!("{}", message);
                self.status_message = message;
                self.close_form();
                self.load_view();
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.user_message());
                }
            }
        }
    }

    pub fn sprint_assignees(&self, sprint: &Sprint) -> Vec<String> {
        taskboard_core::stats::SprintProgress::for_sprint(sprint, self.all_tasks(), Utc::now())
            .assignees
            .iter()
            .map(|id| {
                self.user(*id)
                    .map(User::initials)
                    .unwrap_or_else(|| "?".to_string())
            })
            .collect()
    }
}
