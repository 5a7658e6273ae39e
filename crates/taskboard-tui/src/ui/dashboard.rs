use crate::app::{App, all_tasks_key};
use crate::ui::helpers::{loading_span, status_color};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, Paragraph},
};
use taskboard_core::models::TaskStatus;
use taskboard_core::stats::{DashboardStats, LabeledCount};

pub fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    if app.is_loading(&all_tasks_key()) {
        let block = Block::default().borders(Borders::ALL).title(" 📊 Dashboard ");
        f.render_widget(Paragraph::new(Line::from(loading_span())).block(block), area);
        return;
    }

    let stats = DashboardStats::from_tasks(app.all_tasks());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(8),
        ])
        .split(area);

    draw_kpi_cards(f, &stats, chunks[0]);
    draw_completion(f, app, &stats, chunks[1]);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    draw_breakdown(f, " Tasks by Type ", &stats.by_type, Color::Cyan, chart_chunks[0]);
    draw_breakdown(
        f,
        " Tasks by Status ",
        &stats.by_status,
        Color::Yellow,
        chart_chunks[1],
    );
}

fn draw_kpi_cards(f: &mut Frame, stats: &DashboardStats, area: Rect) {
    let cards = [
        ("Total Tasks", stats.total, Color::Cyan),
        ("In Progress", stats.in_progress, status_color(TaskStatus::InProgress)),
        ("Done", stats.done, status_color(TaskStatus::Done)),
        ("Bugs", stats.bugs, Color::Red),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (i, (label, value, color)) in cards.iter().enumerate() {
        let text = vec![
            Line::from(Span::styled(
                value.to_string(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(*label, Style::default().fg(Color::Gray))),
        ];
        let card = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(card, chunks[i]);
    }
}

fn draw_completion(f: &mut Frame, app: &App, stats: &DashboardStats, area: Rect) {
    let percent = stats.completion_percent();
    let projects = app.projects().len();

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Completion across {} project(s) ", projects)),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}% ({}/{})", percent, stats.done, stats.total));
    f.render_widget(gauge, area);
}

fn draw_breakdown(f: &mut Frame, title: &str, counts: &[LabeledCount], color: Color, area: Rect) {
    let data: Vec<(&str, u64)> = counts
        .iter()
        .map(|c| (c.label, c.count as u64))
        .collect();

    let bar_width = (area.width.saturating_sub(2) / counts.len().max(1) as u16)
        .saturating_sub(2)
        .clamp(3, 14);

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(2)
        .bar_style(Style::default().fg(color))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(chart, area);
}
