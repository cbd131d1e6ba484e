use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::interaction::InteractionController;
use crate::interaction::hover::DEFAULT_HOVER_DELAY;
use crate::model::config::UiConfig;
use crate::model::{Collection, Group, Link};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over `collection` with default settings.
pub fn app_with(collection: Collection) -> App {
    let controller = InteractionController::new(collection, DEFAULT_HOVER_DELAY);
    App::new(controller, &UiConfig::default())
}

/// Two groups: "Work" with Docs and CI, "Fun" with Comics.
pub fn sample_board() -> Collection {
    Collection::new(vec![
        Group::with_links(
            "Work",
            vec![
                Link::new("Docs", "https://docs.example.com"),
                Link::new("CI", "https://ci.example.com"),
            ],
        ),
        Group::with_links("Fun", vec![Link::new("Comics", "https://xkcd.com")]),
    ])
}
