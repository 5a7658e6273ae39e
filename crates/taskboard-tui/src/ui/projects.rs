use crate::app::App;
use crate::ui::helpers::{focused_border_style, loading_span};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use taskboard_client::QueryKey;
use taskboard_core::stats::ProjectProgress;

const CARD_HEIGHT: u16 = 6;

pub fn draw_projects(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 📁 Projects ")
        .title_bottom(Line::from(" [n]New [d]Delete ").right_aligned())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.is_loading(&QueryKey::Projects) {
        f.render_widget(Paragraph::new(Line::from(loading_span())), inner);
        return;
    }

    let projects = app.projects();
    if projects.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                " No projects yet. Press [n] to create one.",
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
        return;
    }

    let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
    let first = app.selected_project_index.saturating_sub(visible - 1);
    let tasks = app.all_tasks();

    for (slot, (i, project)) in projects
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
        let progress = ProjectProgress::for_project(project, tasks);
        let is_selected = i == app.selected_project_index;

        let card = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {} ", project.display_name()),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .border_style(focused_border_style(is_selected));
        let card_inner = card.inner(card_area);
        f.render_widget(card, card_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1)])
            .split(card_inner);

        let description = project
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description");
        let info = Paragraph::new(vec![
            Line::from(Span::styled(description, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                format!("{}/{} tasks done", progress.done, progress.total),
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        f.render_widget(info, rows[0]);

        let ratio = (progress.percent() / 100.0).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .ratio(ratio)
            .label(format!("{:.0}%", progress.percent()));
        f.render_widget(gauge, rows[1]);
    }
}
