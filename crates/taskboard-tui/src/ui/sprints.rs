use crate::app::App;
use crate::ui::helpers::{focused_border_style, loading_span};
use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use taskboard_client::QueryKey;
use taskboard_core::forms::format_date;
use taskboard_core::models::SprintStatus;
use taskboard_core::stats::SprintProgress;

const CARD_HEIGHT: u16 = 7;

fn sprint_status_color(status: SprintStatus) -> Color {
    match status {
        SprintStatus::Planned => Color::Blue,
        SprintStatus::Active => Color::Green,
        SprintStatus::Completed => Color::DarkGray,
    }
}

pub fn draw_sprints(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 🏃 Sprints ")
        .title_bottom(Line::from(" [n]New [s]Start [c]Complete ").right_aligned())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.is_loading(&QueryKey::Sprints(None)) {
        f.render_widget(Paragraph::new(Line::from(loading_span())), inner);
        return;
    }

    let sprints = app.sprints();
    if sprints.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                " No sprints yet. Press [n] to plan one.",
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
        return;
    }

    let now = Utc::now();
    let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
    let first = app.selected_sprint_index.saturating_sub(visible - 1);

    for (slot, (i, sprint)) in sprints
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .enumerate()
    {
        let card_area = Rect {
            x: inner.x,
            y: inner.y + slot as u16 * CARD_HEIGHT,
            width: inner.width,
            height: CARD_HEIGHT.min(inner.height),
        };
        let progress = SprintProgress::for_sprint(sprint, app.all_tasks(), now);
        let status_color = sprint_status_color(sprint.status);

        let card = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::styled(
                    format!(" {} ", sprint.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("[{}] ", sprint.status.label()),
                    Style::default().fg(status_color),
                ),
            ]))
            .title_bottom(
                Line::from(format!(" {} ", app.project_name(sprint.project_id))).right_aligned(),
            )
            .border_style(focused_border_style(i == app.selected_sprint_index));
        let card_inner = card.inner(card_area);
        f.render_widget(card, card_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(card_inner);

        let mut dates = vec![Span::styled(
            format!(
                "{} → {}",
                format_date(&sprint.start_date),
                format_date(&sprint.end_date)
            ),
            Style::default().fg(Color::Gray),
        )];
        if let Some(days) = progress.days_remaining {
            dates.push(Span::styled(
                format!("  • {} day(s) left", days),
                Style::default().fg(Color::Yellow),
            ));
        }

        let assignees = app.sprint_assignees(sprint);
        let team = if assignees.is_empty() {
            Span::styled("No assignees", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                assignees
                    .iter()
                    .map(|a| format!("[{}]", a))
                    .collect::<Vec<_>>()
                    .join(" "),
                Style::default().fg(Color::Cyan),
            )
        };

        let goal = sprint.goal.as_deref().unwrap_or("No goal set");
        let info = Paragraph::new(vec![
            Line::from(Span::styled(goal, Style::default().fg(Color::White))),
            Line::from(dates),
            Line::from(vec![
                Span::styled(
                    format!("{}/{} done  ", progress.done, progress.total),
                    Style::default().fg(Color::DarkGray),
                ),
                team,
            ]),
        ]);
        f.render_widget(info, rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(status_color).bg(Color::DarkGray))
            .ratio((progress.percent() / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.0}%", progress.percent()));
        f.render_widget(gauge, rows[1]);
    }
}
