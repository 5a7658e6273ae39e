//! Task details side panel: fields, comments and activity

use crate::app::App;
use crate::ui::helpers::{loading_span, priority_color, status_color, type_icon};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use taskboard_core::forms::format_date;

pub fn draw_drawer(f: &mut Frame, app: &App, area: Rect) {
    let width = (area.width / 2).max(40).min(area.width);
    let drawer_area = Rect {
        x: area.right().saturating_sub(width),
        y: area.y,
        width,
        height: area.height,
    };

    f.render_widget(Clear, drawer_area);

    let Some(task) = app.drawer_task() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Task ")
            .border_style(Style::default().fg(Color::Cyan));
        f.render_widget(
            Paragraph::new(Line::from(loading_span()))
                .block(block)
                .style(Style::default().bg(Color::Black)),
            drawer_area,
        );
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" #{} {} ", task.id, task.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" [c]Comment [a]Assign [x]Done [d]Delete [Esc]Close ").right_aligned())
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(drawer_area);
    f.render_widget(block, drawer_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(4),
            Constraint::Length(7),
        ])
        .split(inner);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
    let details = vec![
        Line::from(vec![
            label("Type      "),
            Span::raw(format!("{} {}", type_icon(task.task_type), task.task_type.label())),
        ]),
        Line::from(vec![
            label("Status    "),
            Span::styled(task.status.label(), Style::default().fg(status_color(task.status))),
        ]),
        Line::from(vec![
            label("Priority  "),
            Span::styled(
                task.priority.as_str(),
                Style::default().fg(priority_color(task.priority)),
            ),
        ]),
        Line::from(vec![
            label("Points    "),
            Span::raw(
                task.story_points
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]),
        Line::from(vec![
            label("Assignee  "),
            Span::raw(app.assignee_name(task.assigned_to)),
        ]),
        Line::from(vec![
            label("Due       "),
            Span::raw(
                task.due_date
                    .as_ref()
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            task.description.as_deref().unwrap_or("No description"),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    f.render_widget(Paragraph::new(details).wrap(Wrap { trim: false }), chunks[0]);

    let comments: Vec<Line> = match app.drawer_comments() {
        None => vec![Line::from(loading_span())],
        Some([]) => vec![Line::from(Span::styled(
            "No comments yet",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(comments) => comments
            .iter()
            .flat_map(|c| {
                let author = app
                    .user(c.user_id)
                    .map(|u| u.full_name.clone())
                    .unwrap_or_else(|| format!("User #{}", c.user_id));
                [
                    Line::from(vec![
                        Span::styled(author, Style::default().fg(Color::Cyan)),
                        Span::styled(
                            format!("  {}", c.created_at.format("%Y-%m-%d %H:%M")),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                    Line::from(format!("  {}", c.content)),
                ]
            })
            .collect(),
    };
    f.render_widget(
        Paragraph::new(comments)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP).title(" Comments ")),
        chunks[1],
    );

    let activity: Vec<Line> = match app.drawer_activity() {
        None => vec![Line::from(loading_span())],
        Some(entries) => entries
            .iter()
            .rev()
            .take(chunks[2].height.saturating_sub(1) as usize)
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!("{} ", entry.created_at.format("%m-%d %H:%M")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(entry.summary()),
                ])
            })
            .collect(),
    };
    f.render_widget(
        Paragraph::new(activity).block(Block::default().borders(Borders::TOP).title(" Activity ")),
        chunks[2],
    );
}
