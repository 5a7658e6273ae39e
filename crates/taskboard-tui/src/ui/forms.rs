use crate::app::App;
use crate::form::FieldKind;
use crate::ui::helpers::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const LABEL_WIDTH: usize = 24;

pub fn draw_form_modal(f: &mut Frame, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };

    let fields = form.fields();
    let height = fields.len() as u16 + 5;
    let modal_area = centered_rect(f.area(), 70, height);

    f.render_widget(Clear, modal_area);

    let mut lines = Vec::with_capacity(fields.len() + 2);
    let mut cursor = None;

    for (i, field) in fields.iter().enumerate() {
        let is_focused = i == form.focused;
        let value = form.value(i);

        let label_style = if is_focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let prefix = if is_focused { "→ " } else { "  " };

        let value_span = match field.kind {
            FieldKind::Text => Span::styled(
                value.clone(),
                Style::default().fg(Color::White),
            ),
            FieldKind::Select => {
                let style = if is_focused {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                Span::styled(format!("◀ {} ▶", value), style)
            }
        };

        if is_focused && field.kind == FieldKind::Text {
            let x = modal_area.x + 1 + (2 + LABEL_WIDTH + value.chars().count()) as u16;
            let y = modal_area.y + 1 + i as u16;
            cursor = Some((x.min(modal_area.right().saturating_sub(2)), y));
        }

        lines.push(Line::from(vec![
            Span::styled(prefix, label_style),
            Span::styled(format!("{:<width$}", field.label, width = LABEL_WIDTH), label_style),
            value_span,
        ]));
    }

    lines.push(Line::from(""));
    lines.push(match &form.error {
        Some(error) => Line::from(Span::styled(
            format!("  ✗ {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(""),
    });

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            form.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::from(" [Tab]Next [←/→]Change [Enter]Create [Esc]Cancel ").right_aligned(),
        )
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Paragraph::new(lines).block(block), modal_area);

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}
