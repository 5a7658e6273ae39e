mod app;
mod form;
mod ui;

use anyhow::{Context, Result};
use app::{App, AppView, InputMode, KanbanDragState};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size,
    },
};
use form::FieldKind;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io;
use std::path::PathBuf;
use taskboard_client::{Fetcher, TrackerClient};
use taskboard_core::board::BOARD_COLUMNS;
use taskboard_core::models::{Id, SprintStatus, TaskStatus};
use taskboard_core::storage::{self, ConfigStorage};
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn setup_logging(level: &str) -> Result<()> {
    let mut log_path = std::env::temp_dir();
    log_path.push("taskboard-tui.log");

    let log_file = std::fs::File::create(log_path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taskboard={}", level)));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);

        tracing::error!(?panic_info, "Application panicked");

        eprintln!("A fatal error occurred: {}", panic_info);

        original_hook(panic_info);
    }));
}

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(about = "Taskboard TUI - Kanban client for the tracker API", long_about = None)]
struct Args {
    /// Tracker API base URL, overrides the config file
    #[arg(long, env = "TASKBOARD_API_URL")]
    api_url: Option<String>,

    /// Open the board on this project
    #[arg(short, long)]
    project: Option<Id>,

    /// Acting user for new tasks and comments
    #[arg(short, long)]
    user: Option<Id>,

    /// Directory holding config.json
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<taskboard_core::models::Config> {
    let config_dir = match &args.config_dir {
        Some(dir) => dir.clone(),
        None => storage::init_config_dir()?,
    };
    let storage = ConfigStorage::new(config_dir);
    let mut config = storage
        .load()
        .with_context(|| format!("Failed to load {}", storage.path().display()))?;

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(project) = args.project {
        config.ui.default_project = Some(project);
    }
    if let Some(user) = args.user {
        config.ui.default_user_id = user;
    }
    config.validate()?;
    Ok(config)
}

fn content_area(term_size: Rect) -> Rect {
    let content_start_y = 3;
    let content_end_y = term_size.height.saturating_sub(3);
    Rect {
        x: 0,
        y: content_start_y,
        width: term_size.width,
        height: content_end_y.saturating_sub(content_start_y),
    }
}

fn handle_mouse_event(app: &mut App, mouse: event::MouseEvent, term_size: Rect) {
    let area = content_area(term_size);

    match mouse.kind {
        event::MouseEventKind::Down(event::MouseButton::Left) => {
            if app.input_mode != InputMode::Normal || app.show_help {
                return;
            }
            if mouse.row == 1 {
                handle_tab_click(app, mouse, term_size);
            } else if app.current_view == AppView::Board
                && app.drawer_task.is_none()
                && mouse.row >= area.y
                && mouse.row < area.bottom()
            {
                handle_kanban_mouse_down(app, mouse, area);
            }
        }
        event::MouseEventKind::Drag(event::MouseButton::Left) => {
            if app.current_view == AppView::Board {
                handle_kanban_mouse_drag(app, mouse, area);
            }
        }
        event::MouseEventKind::Up(event::MouseButton::Left) => {
            if app.current_view == AppView::Board && app.kanban_drag.is_some() {
                handle_kanban_mouse_up(app);
            }
        }
        _ => {}
    }
}

/// Tabs render centered as `[n]<icon><title>`, the active one as ` <icon><title> `
fn handle_tab_click(app: &mut App, mouse: event::MouseEvent, term_size: Rect) {
    const EMOJI_WIDTH: u16 = 2;
    const PREFIX_WIDTH: u16 = 16;
    const SUFFIX_WIDTH: u16 = 10;

    let tab_widths: Vec<(AppView, u16)> = AppView::ALL
        .iter()
        .map(|view| {
            let name = view.title().len() as u16;
            let width = if *view == app.current_view {
                1 + EMOJI_WIDTH + name + 1
            } else {
                3 + EMOJI_WIDTH + name
            };
            (*view, width)
        })
        .collect();

    let tabs_width: u16 = tab_widths.iter().map(|(_, w)| w).sum::<u16>()
        + tab_widths.len().saturating_sub(1) as u16;
    let total_width = PREFIX_WIDTH + tabs_width + SUFFIX_WIDTH;
    let mut current_x = term_size.width.saturating_sub(total_width) / 2 + PREFIX_WIDTH;

    for (i, (view, width)) in tab_widths.iter().enumerate() {
        if i > 0 {
            current_x += 1;
        }
        if mouse.column >= current_x && mouse.column < current_x + width {
            app.enter_view(*view);
            return;
        }
        current_x += width;
    }
}

fn get_kanban_column_from_mouse(mouse_x: u16, mouse_y: u16, area: Rect) -> Option<usize> {
    if mouse_y < area.y || mouse_y >= area.bottom() {
        return None;
    }
    let col_width = area.width.saturating_div(BOARD_COLUMNS.len() as u16);
    if col_width == 0 {
        return None;
    }
    let click_x = mouse_x.saturating_sub(area.x);
    Some(((click_x / col_width) as usize).min(BOARD_COLUMNS.len() - 1))
}

/// Cards are two lines tall below the column border
fn get_kanban_card_from_mouse(mouse_y: u16, area: Rect, tasks_len: usize) -> Option<usize> {
    let click_y = mouse_y.saturating_sub(area.y);
    if click_y >= 1 {
        let item_idx = ((click_y - 1) / 2) as usize;
        if item_idx < tasks_len {
            return Some(item_idx);
        }
    }
    None
}

fn handle_kanban_mouse_down(app: &mut App, mouse: event::MouseEvent, area: Rect) {
    let Some(col_idx) = get_kanban_column_from_mouse(mouse.column, mouse.row, area) else {
        return;
    };

    app.selected_column_index = col_idx;

    let tasks = app.get_kanban_tasks(col_idx);
    let Some(card_idx) = get_kanban_card_from_mouse(mouse.row, area, tasks.len()) else {
        return;
    };
    let task_id = tasks[card_idx].id;
    let task_title = tasks[card_idx].title.clone();

    app.selected_kanban_card_index = card_idx;
    app.kanban_drag = Some(KanbanDragState {
        source_column: col_idx,
        source_card_index: card_idx,
        source_task_id: task_id,
        source_task_title: task_title.clone(),
        current_hover_column: Some(col_idx),
        current_mouse_x: mouse.column,
        current_mouse_y: mouse.row,
    });
    app.status_message = format!("Dragging: {} - drop in another column to move", task_title);
}

fn handle_kanban_mouse_drag(app: &mut App, mouse: event::MouseEvent, area: Rect) {
    if let Some(ref mut drag) = app.kanban_drag {
        drag.current_mouse_x = mouse.column;
        drag.current_mouse_y = mouse.row;

        let hover = get_kanban_column_from_mouse(mouse.column, mouse.row, area);
        if drag.current_hover_column != hover {
            drag.current_hover_column = hover;
            app.status_message = match hover {
                Some(col_idx) => format!(
                    "Dragging '{}' → Release to move to {}",
                    drag.source_task_title, BOARD_COLUMNS[col_idx].label
                ),
                None => format!("Dragging '{}' → Release to cancel", drag.source_task_title),
            };
        }
    }
}

fn handle_kanban_mouse_up(app: &mut App) {
    let Some(drag) = app.kanban_drag.take() else {
        return;
    };

    let destination = drag
        .current_hover_column
        .and_then(TaskStatus::from_column_index);
    app.drop_task(drag.source_task_id, destination);

    if let Some(status) = destination {
        app.selected_column_index = status.column_index();
        if let Some(idx) = app
            .get_kanban_tasks(app.selected_column_index)
            .iter()
            .position(|t| t.id == drag.source_task_id)
        {
            app.selected_kanban_card_index = idx;
        }
    }
}

async fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.input_mode {
        InputMode::DeleteTaskConfirm | InputMode::DeleteProjectConfirm => {
            match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    let mode = app.input_mode;
                    app.input_mode = InputMode::Normal;
                    if mode == InputMode::DeleteTaskConfirm {
                        app.delete_drawer_task().await;
                    } else {
                        app.delete_selected_project().await;
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => {
                    app.input_mode = InputMode::Normal;
                }
                _ => {}
            }
            return Ok(());
        }
        InputMode::Form => {
            handle_form_keys(app, code, modifiers).await;
            return Ok(());
        }
        InputMode::Search => {
            match code {
                KeyCode::Enter => {
                    app.input_mode = InputMode::Normal;
                    app.status_message.clear();
                }
                KeyCode::Esc => {
                    app.input_buffer.clear();
                    app.apply_search();
                    app.input_mode = InputMode::Normal;
                    app.status_message.clear();
                }
                KeyCode::Backspace => {
                    app.input_buffer.pop();
                    app.apply_search();
                }
                KeyCode::Char(c) => {
                    app.input_buffer.push(c);
                    app.apply_search();
                }
                _ => {}
            }
            return Ok(());
        }
        InputMode::Comment => {
            match code {
                KeyCode::Enter => app.submit_comment().await,
                KeyCode::Esc => {
                    app.input_buffer.clear();
                    app.input_mode = InputMode::Normal;
                    app.status_message.clear();
                }
                KeyCode::Backspace => {
                    app.input_buffer.pop();
                }
                KeyCode::Char(c) => app.input_buffer.push(c),
                _ => {}
            }
            return Ok(());
        }
        InputMode::AssignUser => {
            let user_count = app.users().len();
            match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    app.picker_index = app.picker_index.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if app.picker_index + 1 < user_count {
                        app.picker_index += 1;
                    }
                }
                KeyCode::Enter => app.assign_picked_user().await,
                KeyCode::Esc => app.input_mode = InputMode::Normal,
                _ => {}
            }
            return Ok(());
        }
        InputMode::Normal => {}
    }

    if app.drawer_task.is_some() && handle_drawer_keys(app, code).await {
        return Ok(());
    }

    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return Ok(());
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            return Ok(());
        }
        KeyCode::Char('r') => {
            app.refresh();
            return Ok(());
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.enter_view(AppView::ALL[index]);
            return Ok(());
        }
        _ => {}
    }

    match app.current_view {
        AppView::Dashboard => {}
        AppView::Board => handle_kanban_keys(app, code).await,
        AppView::Backlog => handle_backlog_keys(app, code).await,
        AppView::Projects => handle_projects_keys(app, code),
        AppView::Sprints => handle_sprints_keys(app, code).await,
    }

    Ok(())
}

/// Returns true when the drawer consumed the key
async fn handle_drawer_keys(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc => app.close_drawer(),
        KeyCode::Char('c') => {
            app.input_buffer.clear();
            app.status_message = " Add comment: ".to_string();
            app.input_mode = InputMode::Comment;
        }
        KeyCode::Char('a') => {
            let current = app.drawer_task().and_then(|t| t.assigned_to);
            app.picker_index = current
                .and_then(|id| app.users().iter().position(|u| u.id == id))
                .unwrap_or(0);
            app.input_mode = InputMode::AssignUser;
        }
        KeyCode::Char('x') => app.complete_drawer_task().await,
        KeyCode::Char('d') => app.input_mode = InputMode::DeleteTaskConfirm,
        _ => return false,
    }
    true
}

async fn handle_form_keys(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if code == KeyCode::Enter {
        app.submit_form().await;
        return;
    }
    if code == KeyCode::Esc {
        app.close_form();
        return;
    }

    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Left if form.focused_kind() == FieldKind::Select => form.cycle(-1),
        KeyCode::Right if form.focused_kind() == FieldKind::Select => form.cycle(1),
        KeyCode::Char(' ') if form.focused_kind() == FieldKind::Select => form.cycle(1),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        _ => {}
    }
}

async fn handle_kanban_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('h') | KeyCode::Left => {
            app.selected_column_index = app.selected_column_index.saturating_sub(1);
            app.selected_kanban_card_index = 0;
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.selected_column_index + 1 < BOARD_COLUMNS.len() {
                app.selected_column_index += 1;
                app.selected_kanban_card_index = 0;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.get_kanban_tasks(app.selected_column_index).len();
            if app.selected_kanban_card_index + 1 < len {
                app.selected_kanban_card_index += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selected_kanban_card_index = app.selected_kanban_card_index.saturating_sub(1);
        }
        KeyCode::Char('H') => app.move_kanban_card(-1),
        KeyCode::Char('L') => app.move_kanban_card(1),
        KeyCode::Char('p') => app.cycle_board_project(),
        KeyCode::Char('n') => app.open_task_form().await,
        KeyCode::Enter => {
            if let Some(task_id) = app.selected_kanban_task().map(|t| t.id) {
                app.open_drawer(task_id);
            }
        }
        _ => {}
    }
}

async fn handle_backlog_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.list_next(),
        KeyCode::Char('k') | KeyCode::Up => app.list_previous(),
        KeyCode::Char('/') => {
            app.input_buffer = app.backlog_filter.search.clone();
            app.status_message = " Search tasks: ".to_string();
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('s') => app.cycle_status_filter(),
        KeyCode::Char('c') => {
            app.backlog_filter = Default::default();
            app.selected_backlog_index = 0;
            app.status_message = "Filters cleared".to_string();
        }
        KeyCode::Char('n') => app.open_task_form().await,
        KeyCode::Enter => {
            if let Some(task_id) = app.selected_backlog_task().map(|t| t.id) {
                app.open_drawer(task_id);
            }
        }
        _ => {}
    }
}

fn handle_projects_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.list_next(),
        KeyCode::Char('k') | KeyCode::Up => app.list_previous(),
        KeyCode::Char('n') => app.open_project_form(),
        KeyCode::Char('d') => {
            if app.selected_project().is_some() {
                app.input_mode = InputMode::DeleteProjectConfirm;
            }
        }
        KeyCode::Enter => app.open_selected_project_board(),
        _ => {}
    }
}

async fn handle_sprints_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.list_next(),
        KeyCode::Char('k') | KeyCode::Up => app.list_previous(),
        KeyCode::Char('n') => app.open_sprint_form().await,
        KeyCode::Char('s') => app.advance_selected_sprint(SprintStatus::Active).await,
        KeyCode::Char('c') => app.advance_selected_sprint(SprintStatus::Completed).await,
        _ => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    setup_logging(&config.log_level)?;
    setup_panic_hook();
    info!(api = %config.api.base_url, "Taskboard TUI starting up");

    let client = TrackerClient::connect(&config.api)?;
    let (fetcher, mut rx) = Fetcher::new(client);
    let mut app = App::new(fetcher, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.load_view();

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            Some(message) = rx.recv() => {
                app.handle_message(message);
            }
            _ = tokio::time::sleep(Duration::from_millis(16)) => {
                if event::poll(Duration::from_millis(0))? {
                    let event = event::read()?;
                    match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            info!(code = ?key.code, "key pressed");
                            handle_key_event(&mut app, key.code, key.modifiers).await?;
                        }
                        Event::Mouse(mouse) => {
                            let (w, h) = size()?;
                            handle_mouse_event(&mut app, mouse, Rect::new(0, 0, w, h));
                        }
                        Event::Resize(width, height) => {
                            info!(width, height, "Terminal resized");
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    info!("Taskboard TUI shutting down");

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kanban_column_from_mouse() {
        let area = Rect::new(0, 3, 80, 20);
        assert_eq!(get_kanban_column_from_mouse(0, 5, area), Some(0));
        assert_eq!(get_kanban_column_from_mouse(25, 5, area), Some(1));
        assert_eq!(get_kanban_column_from_mouse(79, 5, area), Some(3));
        // above or below the columns
        assert_eq!(get_kanban_column_from_mouse(25, 1, area), None);
        assert_eq!(get_kanban_column_from_mouse(25, 23, area), None);
    }

    #[test]
    fn test_kanban_card_from_mouse() {
        let area = Rect::new(0, 3, 80, 20);
        assert_eq!(get_kanban_card_from_mouse(3, area, 2), None);
        assert_eq!(get_kanban_card_from_mouse(4, area, 2), Some(0));
        assert_eq!(get_kanban_card_from_mouse(5, area, 2), Some(0));
        assert_eq!(get_kanban_card_from_mouse(6, area, 2), Some(1));
        assert_eq!(get_kanban_card_from_mouse(8, area, 2), None);
    }

    #[test]
    fn test_content_area_excludes_bars() {
        let area = content_area(Rect::new(0, 0, 100, 30));
        assert_eq!(area, Rect::new(0, 3, 100, 24));
    }
}
