use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
};
use taskboard_core::models::{Priority, TaskStatus, TaskType};

pub fn focused_border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Red,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::InReview => Color::Magenta,
        TaskStatus::Done => Color::Green,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Gray,
        Priority::Medium => Color::Blue,
        Priority::High => Color::Yellow,
        Priority::Critical => Color::Red,
    }
}

pub fn type_icon(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Story => "📗",
        TaskType::Task => "☑",
        TaskType::Bug => "🐞",
    }
}

pub fn loading_span() -> Span<'static> {
    Span::styled(
        " Loading...",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
