use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches the store file for writes made by other processes.
///
/// The board writes the same file itself, so a notification only means
/// "look again"; the caller compares what is on disk with what it holds.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

impl StoreWatcher {
    /// Start watching `store_path`. The parent directory is watched so the
    /// atomic rename of a write is seen as well as in-place edits.
    pub fn start(store_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target: PathBuf = store_path.to_path_buf();
        let dir = match store_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                if event.paths.iter().any(|p| p.file_name() == target.file_name()) {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking. True when at least one change arrived since the last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Poll until a change arrives or `wait` runs out.
    fn changed_within(watcher: &StoreWatcher, wait: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < wait {
            if watcher.poll() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn only_store_file_writes_are_reported() {
        let tmp = TempDir::new().unwrap();
        let store_path = tmp.path().join("links.json");
        let watcher = StoreWatcher::start(&store_path).unwrap();

        fs::write(tmp.path().join("config.toml"), "[ui]\n").unwrap();
        assert!(!changed_within(&watcher, Duration::from_millis(300)));

        fs::write(&store_path, "{}\n").unwrap();
        assert!(changed_within(&watcher, Duration::from_secs(5)));
    }
}
