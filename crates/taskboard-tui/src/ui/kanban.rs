use crate::app::{App, KanbanDragState};
use crate::ui::helpers::{loading_span, priority_color, status_color, truncate, type_icon};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use taskboard_core::board::BOARD_COLUMNS;

pub fn draw_kanban(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let loading = app.is_loading(&app.board_key()) && app.board.tasks().is_empty();

    let is_dragging = app.kanban_drag.is_some();
    let drag_source_col = app.kanban_drag.as_ref().map(|d| d.source_column);
    let drag_source_card = app.kanban_drag.as_ref().map(|d| d.source_card_index);
    let drag_hover_col = app
        .kanban_drag
        .as_ref()
        .and_then(|d| d.current_hover_column);

    let bottom_hint = if is_dragging {
        " Release mouse to drop | Drag to another column ".to_string()
    } else {
        format!(" {} | [p]Project ", app.board_project_label())
    };

    for (col_idx, column) in BOARD_COLUMNS.iter().enumerate() {
        let color = status_color(column.status);
        let is_col_selected = app.selected_column_index == col_idx;
        let tasks = app.get_kanban_tasks(col_idx);

        let is_drag_source_col = drag_source_col == Some(col_idx);
        let is_drag_target_col =
            is_dragging && drag_hover_col == Some(col_idx) && drag_source_col != Some(col_idx);

        let drop_here = || {
            ListItem::new(Line::from(Span::styled(
                " ┌─ Drop here ─┐",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )))
        };

        let items: Vec<ListItem> = if loading {
            vec![ListItem::new(Line::from(loading_span()))]
        } else if tasks.is_empty() {
            if is_drag_target_col {
                vec![drop_here()]
            } else {
                vec![ListItem::new(Line::from(Span::styled(
                    " (empty)",
                    Style::default().fg(Color::DarkGray),
                )))]
            }
        } else {
            let mut list_items: Vec<ListItem> = tasks
                .iter()
                .enumerate()
                .map(|(j, task)| {
                    let is_card_selected = is_col_selected && app.selected_kanban_card_index == j;
                    let is_being_dragged =
                        is_drag_source_col && drag_source_card == Some(j) && is_dragging;
                    let is_saving = app.board.is_pending(task.id);

                    let style = if is_being_dragged {
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
                    } else if is_card_selected {
                        Style::default()
                            .fg(Color::Black)
                            .bg(color)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };

                    let available_width = (chunks[col_idx].width as usize).saturating_sub(2);
                    let saving = if is_saving { " ⟳" } else { "" };

                    let title_line = if is_card_selected && !is_dragging {
                        let left_arrow = if col_idx > 0 { "←[H] " } else { "     " };
                        let right_arrow = if col_idx + 1 < BOARD_COLUMNS.len() {
                            " [L]→"
                        } else {
                            "     "
                        };
                        let title = truncate(&task.title, available_width.saturating_sub(12));
                        let padding = available_width
                            .saturating_sub(10 + title.chars().count() + saving.chars().count());

                        Line::from(vec![
                            Span::raw(left_arrow),
                            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                            Span::raw(saving),
                            Span::raw(" ".repeat(padding)),
                            Span::raw(right_arrow),
                        ])
                    } else if is_being_dragged {
                        Line::from(format!(" [dragging] {} ", task.title))
                    } else {
                        Line::from(format!(
                            " {} {}{} ",
                            type_icon(task.task_type),
                            truncate(&task.title, available_width.saturating_sub(6)),
                            saving
                        ))
                    };

                    let meta_style = if is_card_selected {
                        Style::default().fg(Color::Black)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    let mut meta = vec![
                        Span::raw("   "),
                        Span::styled(
                            task.priority.as_str(),
                            if is_card_selected {
                                meta_style
                            } else {
                                Style::default().fg(priority_color(task.priority))
                            },
                        ),
                    ];
                    if let Some(points) = task.story_points {
                        meta.push(Span::styled(format!(" • {} pts", points), meta_style));
                    }
                    if let Some(user) = task.assigned_to.and_then(|id| app.user(id)) {
                        meta.push(Span::styled(format!(" • {}", user.initials()), meta_style));
                    }

                    ListItem::new(vec![title_line, Line::from(meta)]).style(style)
                })
                .collect();

            if is_drag_target_col {
                list_items.push(drop_here());
            }

            list_items
        };

        let border_style = if is_drag_target_col {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if is_col_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block_title = if is_drag_target_col {
            format!(" ▼ {} ({}) ▼ ", column.label, tasks.len())
        } else {
            format!(" {} ({}) ", column.label, tasks.len())
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(block_title)
            .border_style(border_style);

        if (is_col_selected && !is_dragging) || (col_idx == 1 && is_dragging) {
            block = block.title_bottom(Line::from(bottom_hint.as_str()).right_aligned());
        }

        f.render_widget(List::new(items).block(block), chunks[col_idx]);
    }

    if let Some(ref drag) = app.kanban_drag {
        draw_ghost_card(f, drag, area);
    }
}

fn draw_ghost_card(f: &mut Frame, drag: &KanbanDragState, area: Rect) {
    let ghost_width = (drag.source_task_title.chars().count() + 6).min(30) as u16;
    let ghost_height = 3;

    let ghost_x = drag
        .current_mouse_x
        .saturating_sub(ghost_width / 2)
        .min(area.right().saturating_sub(ghost_width));
    let ghost_y = drag
        .current_mouse_y
        .saturating_sub(1)
        .min(area.bottom().saturating_sub(ghost_height));

    let ghost_area = Rect {
        x: ghost_x,
        y: ghost_y,
        width: ghost_width.min(area.width),
        height: ghost_height.min(area.height),
    };

    f.render_widget(Clear, ghost_area);

    let ghost = Paragraph::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            truncate(&drag.source_task_title, 24),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black)),
    );

    f.render_widget(ghost, ghost_area);
}
