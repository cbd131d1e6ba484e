use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::{App, Mode};
use crate::tui::render::board_view::{Hit, hit_test};

use super::dialog::commit_title_edit;

/// Handle a mouse event. Dialogs and the help overlay are modal, so the
/// board only sees the mouse in navigate mode.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    if app.show_help || app.mode != Mode::Navigate {
        return;
    }
    let hit = hit_test(app, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            app.set_pointer(hit.link(), now);
        }
        MouseEventKind::Down(MouseButton::Left) => click(app, hit, now),
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(from) = app.drag.take() else {
                return;
            };
            if let Some(to) = hit.link() {
                if to.group == from.group && to.link != from.link {
                    let change = app.controller.reorder_links(from.group, from.link, to.link);
                    app.after_change(change);
                }
            }
        }
        _ => {}
    }
}

fn click(app: &mut App, hit: Hit, now: Instant) {
    // Clicking anywhere but the title being edited is a focus loss
    if let Some(group) = app.controller.edit().map(|e| e.group) {
        if hit == Hit::Title(group) {
            return;
        }
        commit_title_edit(app);
        if app.controller.edit().is_some() {
            return;
        }
    }

    match hit {
        Hit::Remove(pos) => {
            let change = app.controller.remove_link(pos.group, pos.link);
            app.after_change(change);
        }
        Hit::Title(group) => {
            app.controller.select_group(group);
            app.controller.begin_edit(group);
        }
        Hit::Link(pos) => {
            app.controller.select_group(pos.group);
            app.set_pointer(Some(pos), now);
            app.drag = Some(pos);
        }
        Hit::Column(group) => {
            app.controller.select_group(group);
        }
        Hit::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::LinkPos;
    use crate::tui::render::test_helpers::{app_with, sample_board};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn board_app() -> App {
        let mut app = app_with(sample_board());
        // Two 40-cell columns; titles on row 1, links from row 2
        app.board_area = Rect::new(0, 1, 80, 22);
        app
    }

    fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16, now: Instant) {
        handle_mouse(
            app,
            MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
            now,
        );
    }

    #[test]
    fn hovering_reveals_after_delay_and_leaving_early_cancels() {
        let mut app = board_app();
        let t0 = Instant::now();
        mouse(&mut app, MouseEventKind::Moved, 5, 2, t0);
        assert_eq!(app.pointer, Some(LinkPos::new(0, 0)));

        mouse(&mut app, MouseEventKind::Moved, 5, 10, t0 + Duration::from_millis(500));
        assert_eq!(app.pointer, None);
        app.controller.tick(t0 + Duration::from_millis(1500));
        assert!(!app.controller.is_revealed(LinkPos::new(0, 0)));

        mouse(&mut app, MouseEventKind::Moved, 45, 2, t0);
        app.controller.tick(t0 + Duration::from_millis(1000));
        assert!(app.controller.is_revealed(LinkPos::new(1, 0)));
    }

    #[test]
    fn clicking_revealed_mark_removes_link() {
        let mut app = board_app();
        let t0 = Instant::now();
        mouse(&mut app, MouseEventKind::Moved, 38, 3, t0);
        app.controller.tick(t0 + Duration::from_millis(1000));
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 38, 3, t0);

        let names: Vec<_> = app.controller.collection().groups[0]
            .links
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["Docs"]);
    }

    #[test]
    fn clicking_hidden_mark_only_selects() {
        let mut app = board_app();
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 38, 3, Instant::now());
        assert_eq!(app.controller.collection().link_count(), 3);
        assert_eq!(app.selected_link(), Some(LinkPos::new(0, 1)));
    }

    #[test]
    fn clicking_title_edits_and_clicking_away_commits() {
        let mut app = board_app();
        let now = Instant::now();
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 45, 1, now);
        assert!(app.controller.is_editing(1));
        assert_eq!(app.controller.active_group(), Some(1));

        app.controller.edit_draft_mut().unwrap().push_str("!");
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, 10, now);
        assert!(app.controller.edit().is_none());
        assert_eq!(app.controller.collection().groups[1].title, "Fun!");
        assert_eq!(app.controller.active_group(), Some(0));
    }

    #[test]
    fn clicking_other_title_switches_edit() {
        let mut app = board_app();
        let now = Instant::now();
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, 1, now);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 45, 1, now);
        assert!(app.controller.is_editing(1));
        assert!(!app.controller.is_editing(0));
    }

    #[test]
    fn dragging_reorders_within_group() {
        let mut app = board_app();
        let now = Instant::now();
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, 3, now);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, 2, now);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, 2, now);

        let names: Vec<_> = app.controller.collection().groups[0]
            .links
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["CI", "Docs"]);
        assert_eq!(app.drag, None);
    }

    #[test]
    fn dragging_across_groups_does_nothing() {
        let mut app = board_app();
        let now = Instant::now();
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 5, 2, now);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 45, 2, now);
        assert_eq!(app.controller.collection(), &sample_board());
    }

    #[test]
    fn dialogs_block_the_mouse() {
        let mut app = board_app();
        app.mode = Mode::AddGroup;
        mouse(&mut app, MouseEventKind::Moved, 5, 2, Instant::now());
        assert_eq!(app.pointer, None);
    }
}
