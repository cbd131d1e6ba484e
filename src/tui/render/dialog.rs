use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, LinkField};
use crate::util::unicode::{tail_to_width, truncate_to_width};

/// A rectangle of at most `width` x `height` centered in `area`
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn dialog_block<'a>(app: &App, title: String) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(app.theme.background))
        .style(Style::default().bg(app.theme.background))
}

/// One labelled single-line field; the focused one gets the cursor.
fn field_line<'a>(app: &App, label: &'a str, value: &str, focused: bool, width: u16) -> Line<'a> {
    let bg = app.theme.background;
    let room = (width as usize).saturating_sub(label.len() + 3);
    let label_style = if focused {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let mut spans = vec![
        Span::styled(format!(" {}", label), label_style),
        Span::styled(
            tail_to_width(value, room).to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ];
    if focused {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    Line::from(spans)
}

fn active_title(app: &App) -> String {
    app.controller
        .active_group()
        .and_then(|g| app.controller.collection().group(g))
        .map(|g| g.title.clone())
        .unwrap_or_default()
}

pub fn render_add_link(frame: &mut Frame, app: &App, area: Rect) {
    let rect = centered(60, 5, area);
    frame.render_widget(Clear, rect);

    let title = format!(" Add link to {} ", truncate_to_width(&active_title(app), 40));
    let block = dialog_block(app, title);
    let inner = block.inner(rect);
    let draft = app.controller.link_draft();
    let lines = vec![
        field_line(app, "Name: ", &draft.name, app.field == LinkField::Name, inner.width),
        field_line(app, "URL:  ", &draft.url, app.field == LinkField::Url, inner.width),
    ];
    frame.render_widget(block, rect);
    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_add_group(frame: &mut Frame, app: &App, area: Rect) {
    let rect = centered(50, 3, area);
    frame.render_widget(Clear, rect);

    let block = dialog_block(app, " New group ".to_string());
    let inner = block.inner(rect);
    let line = field_line(app, "Title: ", app.controller.group_draft(), true, inner.width);
    frame.render_widget(block, rect);
    frame.render_widget(Paragraph::new(line), inner);
}

pub fn render_confirm_delete(frame: &mut Frame, app: &App, group: usize, area: Rect) {
    let Some(target) = app.controller.collection().group(group) else {
        return;
    };
    let rect = centered(50, 4, area);
    frame.render_widget(Clear, rect);

    let block = dialog_block(app, " Delete group ".to_string());
    let inner = block.inner(rect);
    let bg = app.theme.background;
    let noun = if target.links.len() == 1 { "link" } else { "links" };
    let lines = vec![
        Line::from(Span::styled(
            format!(
                " Delete \"{}\" and its {} {}?",
                truncate_to_width(&target.title, 20),
                target.links.len(),
                noun
            ),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )),
        Line::from(vec![
            Span::styled(" y", Style::default().fg(app.theme.red).bg(bg)),
            Span::styled(" delete  ", Style::default().fg(app.theme.dim).bg(bg)),
            Span::styled("n", Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(" keep", Style::default().fg(app.theme.dim).bg(bg)),
        ]),
    ];
    frame.render_widget(block, rect);
    frame.render_widget(Paragraph::new(lines), inner);
}
