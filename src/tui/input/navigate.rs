use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::{Change, Direction, LinkPos};
use crate::tui::app::{App, LinkField, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message = None,

        KeyCode::Char('h') | KeyCode::Left => step_group(app, Direction::Up, now),
        KeyCode::Char('l') | KeyCode::Right => step_group(app, Direction::Down, now),
        KeyCode::Char('k') | KeyCode::Up => step_link(app, Direction::Up, now),
        KeyCode::Char('j') | KeyCode::Down => step_link(app, Direction::Down, now),

        KeyCode::Char('H') => move_active_group(app, Direction::Up),
        KeyCode::Char('L') => move_active_group(app, Direction::Down),
        KeyCode::Char('K') => move_selected_link(app, Direction::Up),
        KeyCode::Char('J') => move_selected_link(app, Direction::Down),

        KeyCode::Char('a') => {
            if app.controller.active_group().is_some() {
                app.mode = Mode::AddLink;
                app.field = LinkField::Name;
            } else {
                app.status_message = Some("no group yet, press g to add one".to_string());
            }
        }
        KeyCode::Char('g') => app.mode = Mode::AddGroup,
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(group) = app.controller.active_group() {
                app.controller.begin_edit(group);
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => remove_selected_link(app, now),
        KeyCode::Char('D') => {
            if let Some(group) = app.controller.active_group() {
                app.mode = Mode::ConfirmDelete(group);
            }
        }
        KeyCode::Char('R') => app.reload_requested = true,
        _ => {}
    }
}

/// Point at `link` in `group`, clamped to the group's links (or nothing if
/// it has none).
fn point_into(app: &mut App, group: usize, link: usize, now: Instant) {
    let len = app
        .controller
        .collection()
        .group(group)
        .map_or(0, |g| g.links.len());
    let pos = (len > 0).then(|| LinkPos::new(group, link.min(len - 1)));
    app.set_pointer(pos, now);
}

fn step_group(app: &mut App, direction: Direction, now: Instant) {
    let Some(active) = app.controller.active_group() else {
        return;
    };
    let len = app.controller.collection().len();
    let Some(next) = direction.neighbor(active, len) else {
        return;
    };
    app.controller.select_group(next);
    if let Some(row) = app.pointer.map(|p| p.link) {
        point_into(app, next, row, now);
    }
}

fn step_link(app: &mut App, direction: Direction, now: Instant) {
    let Some(active) = app.controller.active_group() else {
        return;
    };
    let row = match app.selected_link() {
        None => 0,
        Some(pos) => {
            let len = app
                .controller
                .collection()
                .group(active)
                .map_or(0, |g| g.links.len());
            direction.neighbor(pos.link, len).unwrap_or(pos.link)
        }
    };
    point_into(app, active, row, now);
}

fn move_active_group(app: &mut App, direction: Direction) {
    if let Some(group) = app.controller.active_group() {
        let change = app.controller.move_group(group, direction);
        app.after_change(change);
    }
}

fn move_selected_link(app: &mut App, direction: Direction) {
    let Some(pos) = app.selected_link() else {
        return;
    };
    let len = app
        .controller
        .collection()
        .group(pos.group)
        .map_or(0, |g| g.links.len());
    let Some(to) = direction.neighbor(pos.link, len) else {
        return;
    };
    let change = app.controller.reorder_links(pos.group, pos.link, to);
    app.after_change(change);
}

fn remove_selected_link(app: &mut App, now: Instant) {
    let Some(pos) = app.selected_link() else {
        return;
    };
    let change = app.controller.remove_link(pos.group, pos.link);
    let group_removed = matches!(
        change,
        Some(Change::LinkRemoved {
            group_removed: true,
            ..
        })
    );
    if !app.after_change(change) || group_removed {
        return;
    }
    // Keep the keyboard on the same row so repeated x keeps removing
    point_into(app, pos.group, pos.link, now);
}
