pub mod board_view;
pub mod dialog;
pub mod help_overlay;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};

/// Main render function: draws every part of the panel
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | board | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    app.board_area = chunks[1];
    app.scroll_to_active();
    board_view::render_board(frame, app, chunks[1]);

    match app.mode {
        Mode::AddLink => dialog::render_add_link(frame, app, area),
        Mode::AddGroup => dialog::render_add_group(frame, app, area),
        Mode::ConfirmDelete(group) => dialog::render_confirm_delete(frame, app, group, area),
        Mode::Navigate => {}
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let collection = app.controller.collection();
    let counts = format!(
        "{} groups \u{00B7} {} links ",
        collection.len(),
        collection.link_count()
    );
    let name = " linkboard";
    let pad = (area.width as usize).saturating_sub(name.len() + counts.chars().count());

    let line = Line::from(vec![
        Span::styled(
            name,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(pad), Style::default().bg(bg)),
        Span::styled(counts, Style::default().fg(app.theme.dim).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
