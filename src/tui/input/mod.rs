mod dialog;
mod mouse;
mod navigate;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};
use crate::util::unicode::pop_grapheme;

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Help overlay intercepts everything
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc
        ) {
            app.show_help = false;
        }
        return;
    }

    match app.mode {
        Mode::AddLink => dialog::handle_add_link(app, key),
        Mode::AddGroup => dialog::handle_add_group(app, key),
        Mode::ConfirmDelete(group) => dialog::handle_confirm_delete(app, key, group),
        Mode::Navigate if app.controller.edit().is_some() => dialog::handle_title_edit(app, key),
        Mode::Navigate => navigate::handle_navigate(app, key, now),
    }
}

/// Apply a text-editing key to a single-line field. Returns false for keys
/// that are not text editing.
fn edit_text(buf: &mut String, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            buf.clear();
            true
        }
        (m, KeyCode::Char(c))
            if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            buf.push(c);
            true
        }
        (_, KeyCode::Backspace) => {
            pop_grapheme(buf);
            true
        }
        _ => false,
    }
}
