use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, LinkField, Mode};

use super::edit_text;

pub(super) fn handle_add_link(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.controller.cancel_link_draft();
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.field = app.field.toggle();
        }
        KeyCode::Enter => {
            let change = app.controller.commit_link_draft();
            if app.after_change(change) {
                app.mode = Mode::Navigate;
            } else {
                app.status_message = Some("name and url are both required".to_string());
            }
        }
        _ => {
            let draft = app.controller.link_draft_mut();
            let buf = match app.field {
                LinkField::Name => &mut draft.name,
                LinkField::Url => &mut draft.url,
            };
            edit_text(buf, key);
        }
    }
}

pub(super) fn handle_add_group(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.controller.cancel_group_draft();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            let change = app.controller.commit_group_draft();
            if app.after_change(change) {
                let last = app.controller.collection().len().saturating_sub(1);
                app.controller.select_group(last);
                app.mode = Mode::Navigate;
            } else {
                app.status_message = Some("group title is required".to_string());
            }
        }
        _ => {
            edit_text(app.controller.group_draft_mut(), key);
        }
    }
}

pub(super) fn handle_title_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.controller.cancel_edit();
        }
        KeyCode::Enter => commit_title_edit(app),
        _ => {
            if let Some(draft) = app.controller.edit_draft_mut() {
                edit_text(draft, key);
            }
        }
    }
}

/// Commit the title being edited. Also used when a click moves focus away.
pub(super) fn commit_title_edit(app: &mut App) {
    let change = app.controller.commit_edit();
    if !app.after_change(change) && app.controller.edit().is_some() {
        app.status_message = Some("group title is required".to_string());
    }
}

pub(super) fn handle_confirm_delete(app: &mut App, key: KeyEvent, group: usize) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let change = app.controller.remove_group(group);
            app.after_change(change);
            app.mode = Mode::Navigate;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
