use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const BOARD_KEYS: &[(&str, &str)] = &[
    (" h/l \u{2190}\u{2192}", "Select group"),
    (" j/k \u{2191}\u{2193}", "Point at link"),
    (" H/L", "Move group left/right"),
    (" J/K", "Move link down/up"),
    (" e/Enter", "Edit group title"),
    (" x/Del", "Remove link"),
    (" D", "Delete group (asks first)"),
];

const ADD_KEYS: &[(&str, &str)] = &[
    (" a", "Add link to active group"),
    (" g", "Add group"),
    (" Tab", "Switch dialog field"),
    (" Enter / Esc", "Commit / cancel"),
];

const MOUSE_KEYS: &[(&str, &str)] = &[
    (" hover", "Reveal \u{2715} after a moment"),
    (" click \u{2715}", "Remove link"),
    (" click title", "Edit title"),
    (" drag link", "Reorder within group"),
];

const GLOBAL_KEYS: &[(&str, &str)] = &[
    (" R", "Reload from disk"),
    (" ?", "Toggle this help"),
    (" q / Ctrl+C", "Quit"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    for (header, keys) in [
        (" Board", BOARD_KEYS),
        (" Adding", ADD_KEYS),
        (" Mouse", MOUSE_KEYS),
        (" Global", GLOBAL_KEYS),
    ] {
        lines.push(Line::from(Span::styled(header, header_style)));
        for (key, desc) in keys {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
        lines.push(Line::from(""));
    }
    lines.pop();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Key Bindings ", header_style))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
