use crate::app::{App, InputMode};
use crate::ui::helpers::centered_rect;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn draw_confirmation_modal(f: &mut Frame, app: &App) {
    let modal_area = centered_rect(f.area(), 60, 10);

    f.render_widget(Clear, modal_area);

    let (title, message) = if app.input_mode == InputMode::DeleteTaskConfirm {
        let task_name = app
            .drawer_task()
            .map(|t| t.title.as_str())
            .unwrap_or("this task");
        (
            "Delete Task?",
            format!("Are you sure you want to delete \"{}\" ?", task_name),
        )
    } else {
        let project_name = app
            .selected_project()
            .map(|p| p.name.as_str())
            .unwrap_or("this project");
        (
            "Delete Project?",
            format!(
                "Delete \"{}\" and every task in it? This cannot be undone.",
                project_name
            ),
        )
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  [Y]es, Delete  ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled(
                "  [N]o, Cancel   ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(paragraph, modal_area);
}
