use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

fn key_hints(app: &App) -> &'static str {
    match app.mode {
        Mode::AddLink => "Tab field  Enter add  Esc cancel",
        Mode::AddGroup => "Enter add  Esc cancel",
        Mode::ConfirmDelete(_) => "y delete  n keep",
        Mode::Navigate if app.controller.edit().is_some() => "Enter save  Esc cancel",
        Mode::Navigate => "a add  g group  e edit  x remove  ? help  q quit",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (text, color) = if let Some(msg) = &app.status_message {
        (msg.clone(), app.theme.text_bright)
    } else if app.changed_on_disk {
        (
            "board changed on disk: R reloads, any edit overwrites".to_string(),
            app.theme.yellow,
        )
    } else if let Some(link) = app
        .pointer
        .and_then(|p| app.controller.collection().link(p.group, p.link))
    {
        (link.url.clone(), app.theme.dim)
    } else {
        (String::new(), app.theme.dim)
    };

    let hint = if app.show_key_hints { key_hints(app) } else { "" };
    let hint_width = display_width(hint);
    let room = width.saturating_sub(hint_width + 2);
    let left = truncate_to_width(&text, room);
    let padding = width.saturating_sub(1 + display_width(&left) + hint_width);

    let line = Line::from(vec![
        Span::styled(format!(" {}", left), Style::default().fg(color).bg(bg)),
        Span::styled(" ".repeat(padding), Style::default().bg(bg)),
        Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
