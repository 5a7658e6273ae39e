use crate::app::{App, all_tasks_key};
use crate::ui::helpers::{loading_span, status_color};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use serde_json::Value;
use std::collections::HashMap;
use taskboard_core::models::{Id, TaskStatus};
use taskboard_core::table::{Align, Column, value_text};

fn backlog_columns(app: &App) -> Vec<Column> {
    let names: HashMap<Id, String> = app
        .users()
        .iter()
        .map(|u| (u.id, u.full_name.clone()))
        .collect();

    vec![
        Column::new("title", "Task").min_width(24),
        Column::new("task_type", "Type").format(|v| {
            value_text(v)
                .and_then(|s| s.parse::<taskboard_core::models::TaskType>().ok())
                .map(|t| t.label().to_string())
                .unwrap_or_default()
        }),
        Column::new("priority", "Priority").min_width(8),
        Column::new("status", "Status").min_width(11).format(|v| {
            value_text(v)
                .and_then(|s| s.parse::<TaskStatus>().ok())
                .map(|s| s.label().to_string())
                .unwrap_or_default()
        }),
        Column::new("story_points", "Points")
            .align(Align::Right)
            .format(|v| value_text(v).unwrap_or_else(|| "-".to_string())),
        Column::new("assigned_to", "Assignee")
            .min_width(16)
            .format(move |v| match v.as_i64() {
                Some(id) => names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| format!("User #{}", id)),
                None => "Unassigned".to_string(),
            }),
    ]
}

fn aligned(text: String, align: Align) -> Line<'static> {
    let line = Line::from(text);
    match align {
        Align::Left => line,
        Align::Center => line.centered(),
        Align::Right => line.right_aligned(),
    }
}

pub fn draw_backlog(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_filter_bar(f, app, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 📝 Backlog ")
        .border_style(Style::default().fg(Color::Cyan));

    if app.is_loading(&all_tasks_key()) {
        f.render_widget(Paragraph::new(Line::from(loading_span())).block(block), chunks[1]);
        return;
    }

    let tasks = app.backlog_tasks();
    if tasks.is_empty() {
        let message = if app.backlog_filter.is_empty() {
            " No tasks in the backlog"
        } else {
            " No tasks match the current filters"
        };
        let empty = Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(empty, chunks[1]);
        return;
    }

    let columns = backlog_columns(app);

    let header = Row::new(
        columns
            .iter()
            .map(|c| Cell::from(aligned(c.label.to_string(), c.align))),
    )
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = tasks
        .iter()
        .map(|task| {
            let value = serde_json::to_value(task).unwrap_or(Value::Null);
            let cells = columns.iter().map(|c| {
                let cell = Cell::from(aligned(c.render(&value), c.align));
                if c.id == "status" {
                    cell.style(Style::default().fg(status_color(task.status)))
                } else {
                    cell
                }
            });
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|c| {
            if c.id == "title" {
                Constraint::Min(c.min_width)
            } else {
                Constraint::Length(c.min_width.max(c.label.len() as u16) + 2)
            }
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title_bottom(
            Line::from(format!(" {} task(s) ", tasks.len())).right_aligned(),
        ))
        .row_highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    let mut state = TableState::default().with_selected(Some(app.selected_backlog_index));
    f.render_stateful_widget(table, chunks[1], &mut state);
}

fn draw_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let filter = &app.backlog_filter;
    let search = if filter.search.is_empty() {
        Span::styled("(none)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!("\"{}\"", filter.search),
            Style::default().fg(Color::White),
        )
    };
    let status = filter
        .status
        .as_deref()
        .and_then(|s| s.parse::<TaskStatus>().ok())
        .map(|s| s.label())
        .unwrap_or("All");

    let line = Line::from(vec![
        Span::styled(" [/]Search: ", Style::default().fg(Color::Yellow)),
        search,
        Span::raw("  │  "),
        Span::styled("[s]Status: ", Style::default().fg(Color::Yellow)),
        Span::raw(status),
    ]);

    f.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}
