use crate::app::App;
use crate::ui::helpers::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Single-line prompt, titled with the current status message
pub fn draw_input_modal(f: &mut Frame, app: &App) {
    let width = 60;
    let modal_area = centered_rect(f.area(), width, 3);

    f.render_widget(Clear, modal_area);

    let title = if app.status_message.is_empty() {
        "Input"
    } else {
        &app.status_message
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(" [Enter] Submit  [Esc] Cancel ")
        .border_style(Style::default().fg(Color::Cyan));

    let input = Paragraph::new(app.input_buffer.as_str()).block(block);
    f.render_widget(input, modal_area);

    let cursor_x = (modal_area.x + 1 + app.input_buffer.chars().count() as u16)
        .min(modal_area.x + modal_area.width.saturating_sub(2));
    f.set_cursor_position((cursor_x, modal_area.y + 1));
}
