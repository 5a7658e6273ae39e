mod backlog;
mod confirmation;
mod dashboard;
mod drawer;
mod forms;
pub mod helpers;
mod input;
mod kanban;
mod projects;
mod sprints;

use crate::app::{App, AppView, InputMode};
use backlog::draw_backlog;
use confirmation::draw_confirmation_modal;
use dashboard::draw_dashboard;
use drawer::draw_drawer;
use forms::draw_form_modal;
use helpers::centered_rect;
use input::draw_input_modal;
use kanban::draw_kanban;
use projects::draw_projects;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use sprints::draw_sprints;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_title_bar(f, app, chunks[0]);

    match app.current_view {
        AppView::Dashboard => draw_dashboard(f, app, chunks[1]),
        AppView::Board => draw_kanban(f, app, chunks[1]),
        AppView::Backlog => draw_backlog(f, app, chunks[1]),
        AppView::Projects => draw_projects(f, app, chunks[1]),
        AppView::Sprints => draw_sprints(f, app, chunks[1]),
    }

    if app.drawer_task.is_some() {
        draw_drawer(f, app, chunks[1]);
    }

    draw_status_bar(f, app, chunks[2]);

    if app.show_help {
        draw_help_modal(f);
    }

    match app.input_mode {
        InputMode::DeleteTaskConfirm | InputMode::DeleteProjectConfirm => {
            draw_confirmation_modal(f, app);
        }
        InputMode::Search | InputMode::Comment => draw_input_modal(f, app),
        InputMode::AssignUser => draw_user_picker_modal(f, app),
        InputMode::Form => draw_form_modal(f, app),
        InputMode::Normal => {}
    }
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "🗂  Taskboard ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
    ];

    for (i, view) in AppView::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }

        let is_active = *view == app.current_view;
        let style = if is_active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        if is_active {
            spans.push(Span::styled(
                format!(" {}{} ", view.icon(), view.title()),
                style,
            ));
        } else {
            spans.push(Span::styled(
                format!("[{}]{}{}", i + 1, view.icon(), view.title()),
                style,
            ));
        }
    }

    spans.push(Span::raw(" │ [q]Quit"));

    let title = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(title, area);
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn draw_help_modal(f: &mut Frame) {
    let area = f.area();
    let modal_width = (area.width as f32 * 0.85) as u16;
    let modal_height = (area.height as f32 * 0.85) as u16;
    let modal_area = centered_rect(area, modal_width, modal_height);

    f.render_widget(Clear, modal_area);

    let help_text = vec![
        Line::from(Span::styled(
            "  🗂  Taskboard - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("  GLOBAL NAVIGATION"),
        Line::from("    [1]-[5]      Dashboard / Board / Backlog / Projects / Sprints"),
        Line::from("    [r]          Refresh the current view"),
        Line::from("    [?]          Toggle this Help"),
        Line::from("    [q]          Quit"),
        Line::from(""),
        section("  BOARD"),
        Line::from("    [h/l]        Switch Column"),
        Line::from("    [j/k]        Navigate Cards in Column"),
        Line::from("    [Shift+h/l]  Move Card to Adjacent Column"),
        Line::from("    [p]          Cycle Project"),
        Line::from("    [n]          New Task"),
        Line::from("    [Enter]      Open Task Details"),
        Line::from("    Mouse        Drag cards between columns"),
        Line::from(""),
        section("  BACKLOG"),
        Line::from("    [/]          Search"),
        Line::from("    [s]          Cycle Status Filter"),
        Line::from("    [c]          Clear Filters"),
        Line::from("    [n]          New Task"),
        Line::from("    [Enter]      Open Task Details"),
        Line::from(""),
        section("  PROJECTS / SPRINTS"),
        Line::from("    [n]          New Project / New Sprint"),
        Line::from("    [d]          Delete Selected Project"),
        Line::from("    [s] / [c]    Start / Complete Selected Sprint"),
        Line::from(""),
        section("  TASK DETAILS"),
        Line::from("    [c]          Add Comment"),
        Line::from("    [a]          Assign"),
        Line::from("    [x]          Mark Done"),
        Line::from("    [d]          Delete Task"),
        Line::from("    [Esc]        Close"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press any key to close this help",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("❓ Help")
                .border_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .style(Style::default().bg(Color::Black));

    f.render_widget(help_paragraph, modal_area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_content = if !app.status_message.is_empty() && app.input_mode == InputMode::Normal
    {
        let bg_color = if app.status_message.starts_with("Failed")
            || app.status_message.starts_with("Move failed")
        {
            Color::Red
        } else {
            Color::Yellow
        };
        Span::styled(
            format!(" {} ", app.status_message),
            Style::default().fg(Color::Black).bg(bg_color),
        )
    } else {
        match app.input_mode {
            InputMode::Normal => {
                let hints = if app.drawer_task.is_some() {
                    "[c]Comment • [a]Assign • [x]Done • [d]Delete • [Esc]Close"
                } else {
                    match app.current_view {
                        AppView::Dashboard => "[1-5]Views • [r]Refresh • [?]Help • [q]Quit",
                        AppView::Board => {
                            "[h/l]Col • [j/k]Card • [H/L]Move • [p]Project • [n]New • [Enter]Open"
                        }
                        AppView::Backlog => {
                            "[/]Search • [s]Status • [c]Clear • [n]New • [Enter]Open"
                        }
                        AppView::Projects => "[j/k]Nav • [n]New • [d]Delete",
                        AppView::Sprints => "[j/k]Nav • [n]New • [s]Start • [c]Complete",
                    }
                };
                Span::raw(hints)
            }
            InputMode::DeleteTaskConfirm | InputMode::DeleteProjectConfirm => Span::styled(
                " Confirm: [Y]es / [N]o ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            InputMode::Form => Span::raw("[Tab]Next field • [←/→]Change • [Enter]Create • [Esc]Cancel"),
            _ => Span::raw("[Enter] Submit  [Esc] Cancel"),
        }
    };

    let pending = app.board.pending_count();
    let mut spans = vec![
        Span::styled(
            format!(" 📁 {} ", app.board_project_label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" │ "),
        status_content,
    ];
    if pending > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!(" ⟳ {} saving ", pending),
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(status, area);
}

fn draw_user_picker_modal(f: &mut Frame, app: &App) {
    let area = f.area();
    let users = app.users();
    let modal_width = 50.min(area.width.saturating_sub(4));
    let modal_height = (users.len() as u16 + 4)
        .min(area.height.saturating_sub(4))
        .max(6);
    let modal_area = centered_rect(area, modal_width, modal_height);

    f.render_widget(Clear, modal_area);

    let items: Vec<ListItem> = if users.is_empty() {
        vec![ListItem::new(Line::from(helpers::loading_span()))]
    } else {
        users
            .iter()
            .enumerate()
            .map(|(i, user)| {
                let is_selected = i == app.picker_index;
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let prefix = if is_selected { "→ " } else { "  " };
                ListItem::new(format!(
                    "{}[{}] {} (@{})",
                    prefix,
                    user.initials(),
                    user.full_name,
                    user.username
                ))
                .style(style)
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Assign to ")
            .title_bottom(Line::from(" [j/k]Select [Enter]Assign [Esc]Cancel ").right_aligned())
            .border_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );

    f.render_widget(list, modal_area);
}
