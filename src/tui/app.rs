use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::interaction::InteractionController;
use crate::io::config_io::{read_config, resolve_data_dir};
use crate::io::watcher::StoreWatcher;
use crate::io::{JsonFileStore, LoadSource, Loaded, Store, SyncCoordinator};
use crate::model::config::UiConfig;
use crate::ops::{Change, LinkPos};
use crate::util::logging;

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the event loop waits for input when no hover timer is due sooner
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode. Title editing is not a mode of its own: it is
/// on whenever the controller holds a title edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    AddLink,
    AddGroup,
    /// Waiting for y/n before removing the group at this index
    ConfirmDelete(usize),
}

/// Focused field of the add-link dialog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkField {
    #[default]
    Name,
    Url,
}

impl LinkField {
    pub fn toggle(self) -> Self {
        match self {
            LinkField::Name => LinkField::Url,
            LinkField::Url => LinkField::Name,
        }
    }
}

/// Main application state
pub struct App {
    pub controller: InteractionController,
    pub theme: Theme,
    pub mode: Mode,
    pub field: LinkField,
    /// The link under the pointer: the mouse, or the keyboard selection
    pub pointer: Option<LinkPos>,
    /// Link a mouse drag started on
    pub drag: Option<LinkPos>,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub status_message: Option<String>,
    /// The store holds a board other than the one shown
    pub changed_on_disk: bool,
    pub reload_requested: bool,
    pub should_quit: bool,
    /// First group drawn when not all columns fit
    pub column_offset: usize,
    /// Where the board was last drawn, for mouse hit-testing
    pub board_area: Rect,
}

impl App {
    pub fn new(controller: InteractionController, ui: &UiConfig) -> Self {
        App {
            controller,
            theme: Theme::from_config(ui),
            mode: Mode::Navigate,
            field: LinkField::Name,
            pointer: None,
            drag: None,
            show_help: false,
            show_key_hints: ui.show_key_hints,
            status_message: None,
            changed_on_disk: false,
            reload_requested: false,
            should_quit: false,
            column_offset: 0,
            board_area: Rect::default(),
        }
    }

    /// Move the pointer, sending leave/enter to the hover timers.
    pub fn set_pointer(&mut self, pos: Option<LinkPos>, now: Instant) {
        if self.pointer == pos {
            return;
        }
        if let Some(old) = self.pointer {
            self.controller.pointer_leave(old, now);
        }
        if let Some(new) = pos {
            self.controller.pointer_enter(new, now);
        }
        self.pointer = pos;
    }

    /// The pointed-at link, if it is in the active group.
    pub fn selected_link(&self) -> Option<LinkPos> {
        let active = self.controller.active_group()?;
        self.pointer.filter(|p| p.group == active)
    }

    /// Carry the panel's own positions across an accepted edit. Returns
    /// whether there was one.
    pub fn after_change(&mut self, change: Option<Change>) -> bool {
        let Some(change) = change else {
            return false;
        };
        self.pointer = self.pointer.and_then(|p| change.remap_link(p));
        self.drag = None;
        self.status_message = None;
        true
    }

    /// Swap in a freshly loaded board, dropping all transient state.
    pub fn apply_reload(&mut self, loaded: Loaded) {
        self.controller.reload(loaded.collection);
        self.mode = Mode::Navigate;
        self.pointer = None;
        self.drag = None;
        self.column_offset = 0;
        self.changed_on_disk = false;
        self.status_message = Some(
            match loaded.source {
                LoadSource::Stored => "reloaded",
                LoadSource::Missing => "nothing stored, board is empty",
                LoadSource::Malformed => "stored board unreadable, see `lb recovery`",
            }
            .to_string(),
        );
    }

    /// Keep the active group within the drawn columns.
    pub fn scroll_to_active(&mut self) {
        let len = self.controller.collection().len();
        let fit = render::board_view::columns_that_fit(self.board_area.width);
        let max_offset = len.saturating_sub(fit);
        if let Some(active) = self.controller.active_group() {
            if active < self.column_offset {
                self.column_offset = active;
            } else if active >= self.column_offset + fit {
                self.column_offset = active + 1 - fit;
            }
        }
        self.column_offset = self.column_offset.min(max_offset);
    }

    /// How long to wait for input: until the next hover timer, capped so
    /// file-change notices still arrive.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.controller.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    /// Write the board if it changed since the last write.
    pub fn commit<S: Store>(&mut self, sync: &mut SyncCoordinator<S>) {
        let revision = self.controller.revision();
        match sync.commit_if_changed(revision, self.controller.collection()) {
            Ok(true) => self.changed_on_disk = false,
            Ok(false) => {}
            Err(e) => {
                self.status_message = Some(format!("save failed: {} (kept in recovery log)", e));
            }
        }
    }
}

/// Run the interactive panel
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(data_dir);
    logging::init_file(&data_dir);
    let config = read_config(&data_dir)?;

    let store_path = data_dir.join(&config.store.file);
    let mut sync = SyncCoordinator::new(
        JsonFileStore::new(&store_path),
        config.store.key.clone(),
        config.defaults.clone(),
    )
    .with_recovery_dir(&data_dir);

    let loaded = sync.load();
    info!(path = %store_path.display(), groups = loaded.collection.len(), "panel starting");
    let malformed = loaded.source == LoadSource::Malformed;
    let controller = InteractionController::new(
        loaded.collection,
        Duration::from_millis(config.ui.hover_delay_ms),
    );
    sync.mark_synced(controller.revision());

    let mut app = App::new(controller, &config.ui);
    if malformed {
        app.status_message = Some("stored board unreadable, see `lb recovery`".to_string());
    }

    let watcher = match StoreWatcher::start(&store_path) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "not watching store file");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &mut sync, watcher.as_ref());

    app.controller.teardown();
    app.commit(&mut sync);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<S: Store>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    sync: &mut SyncCoordinator<S>,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key, Instant::now());
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                _ => {}
            }
        }

        app.controller.tick(Instant::now());

        if app.reload_requested {
            app.reload_requested = false;
            app.apply_reload(sync.load());
            sync.mark_synced(app.controller.revision());
        }

        app.commit(sync);

        if watcher.is_some_and(|w| w.poll()) {
            app.changed_on_disk = sync.diverged(app.controller.collection());
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
