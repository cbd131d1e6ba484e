use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::model::link::Link;
use crate::ops::LinkPos;
use crate::tui::app::App;
use crate::util::unicode::{fit_to_width, tail_to_width, truncate_to_width};

/// Narrowest a group column is drawn; more groups than fit scroll sideways.
pub const MIN_COLUMN_WIDTH: u16 = 20;

/// The delete affordance shown on a revealed link
pub const REMOVE_MARK: &str = "\u{2715}";

/// What is under a screen cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    None,
    /// Inside a column but not on its title or a link
    Column(usize),
    Title(usize),
    Link(LinkPos),
    /// The revealed delete mark of a link
    Remove(LinkPos),
}

impl Hit {
    pub fn link(self) -> Option<LinkPos> {
        match self {
            Hit::Link(pos) | Hit::Remove(pos) => Some(pos),
            _ => None,
        }
    }
}

pub fn columns_that_fit(width: u16) -> usize {
    ((width / MIN_COLUMN_WIDTH) as usize).max(1)
}

/// Screen rectangles of the drawn columns, starting at group `offset`.
/// Shared by rendering and hit-testing so both agree on the geometry.
pub fn column_rects(area: Rect, count: usize, offset: usize) -> Vec<(usize, Rect)> {
    if count == 0 || area.width == 0 || area.height == 0 {
        return Vec::new();
    }
    let offset = offset.min(count - 1);
    let visible = columns_that_fit(area.width).min(count - offset);
    let width = area.width / visible as u16;
    (0..visible)
        .map(|i| {
            let x = area.x + i as u16 * width;
            let w = if i + 1 == visible {
                area.right() - x
            } else {
                width
            };
            (offset + i, Rect::new(x, area.y, w, area.height))
        })
        .collect()
}

fn column_block() -> Block<'static> {
    Block::bordered()
}

/// First link row drawn in a column of `rows` lines, so the pointed-at link
/// stays visible.
fn first_row(app: &App, group: usize, rows: usize) -> usize {
    match app.pointer {
        Some(p) if p.group == group && rows > 0 && p.link >= rows => p.link + 1 - rows,
        _ => 0,
    }
}

/// Find what is under the cell at (`x`, `y`), using the geometry of the last
/// render.
pub fn hit_test(app: &App, x: u16, y: u16) -> Hit {
    let collection = app.controller.collection();
    for (g, rect) in column_rects(app.board_area, collection.len(), app.column_offset) {
        if x < rect.x || x >= rect.right() || y < rect.y || y >= rect.bottom() {
            continue;
        }
        if y == rect.y {
            return Hit::Title(g);
        }
        let inner = column_block().inner(rect);
        let inside = x >= inner.x && x < inner.right() && y >= inner.y && y < inner.bottom();
        let links = collection.group(g).map_or(0, |grp| grp.links.len());
        if inside {
            let link = first_row(app, g, inner.height as usize) + (y - inner.y) as usize;
            if link < links {
                let pos = LinkPos::new(g, link);
                if x == inner.right() - 1 && app.controller.is_revealed(pos) {
                    return Hit::Remove(pos);
                }
                return Hit::Link(pos);
            }
        }
        return Hit::Column(g);
    }
    Hit::None
}

/// Render all visible group columns
pub fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let collection = app.controller.collection();
    if collection.is_empty() {
        let hint = Line::from(Span::styled(
            " no groups yet, press g to add one",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ));
        frame.render_widget(Paragraph::new(hint), area);
        return;
    }

    for (g, rect) in column_rects(area, collection.len(), app.column_offset) {
        render_column(frame, app, g, rect);
    }
}

fn render_column(frame: &mut Frame, app: &App, g: usize, rect: Rect) {
    let Some(group) = app.controller.collection().group(g) else {
        return;
    };
    let bg = app.theme.background;
    let active = app.controller.active_group() == Some(g);
    let border = if active {
        app.theme.active_border
    } else {
        app.theme.border
    };

    let title_room = (rect.width as usize).saturating_sub(4);
    let title = match app.controller.edit() {
        Some(edit) if edit.group == g => Line::from(vec![
            Span::styled(
                format!(" {}", tail_to_width(&edit.draft, title_room.saturating_sub(1))),
                Style::default().fg(app.theme.text_bright).bg(app.theme.edit_bg),
            ),
            Span::styled(
                "\u{258C} ",
                Style::default().fg(app.theme.highlight).bg(app.theme.edit_bg),
            ),
        ]),
        _ => {
            let mut style = Style::default().fg(app.theme.text_bright).bg(bg);
            if active {
                style = style.add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(
                format!(" {} ", truncate_to_width(&group.title, title_room)),
                style,
            ))
        }
    };

    let block = column_block()
        .title(title)
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    if group.links.is_empty() {
        let empty = Line::from(Span::styled(
            "(empty)",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(empty), inner);
        return;
    }

    let rows = inner.height as usize;
    let lines: Vec<Line> = group
        .links
        .iter()
        .enumerate()
        .skip(first_row(app, g, rows))
        .take(rows)
        .map(|(l, link)| link_line(app, LinkPos::new(g, l), link, inner.width as usize))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn link_line<'a>(app: &App, pos: LinkPos, link: &Link, width: usize) -> Line<'a> {
    let pointed = app.pointer == Some(pos);
    let bg = if pointed {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let fg = if pointed {
        app.theme.text_bright
    } else {
        app.theme.text
    };
    let mark = if app.controller.is_revealed(pos) {
        REMOVE_MARK
    } else {
        " "
    };

    Line::from(vec![
        Span::styled(
            fit_to_width(&link.name, width.saturating_sub(2)),
            Style::default().fg(fg).bg(bg),
        ),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(mark, Style::default().fg(app.theme.red).bg(bg)),
    ])
}
