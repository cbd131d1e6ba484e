use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::atomic_write;
use crate::model::config::BoardConfig;

pub const CONFIG_FILE: &str = "config.toml";

/// Error type for config reads and edits
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Syntax(#[from] toml_edit::TomlError),
    #[error("bad key '{0}': expected section.name (e.g. ui.hover_delay_ms)")]
    BadKey(String),
}

/// Resolve the data directory: explicit flag, then `LINKBOARD_DIR`, then
/// `$XDG_DATA_HOME/linkboard`, then `~/.local/share/linkboard`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var("LINKBOARD_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    let data_home = std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local").join("share"));
    data_home.join("linkboard")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

fn read_config_text(data_dir: &Path) -> Result<String, ConfigError> {
    let path = config_path(data_dir);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ConfigError::Read { path, source: e }),
    }
}

/// Read the config. A missing file gives the defaults.
pub fn read_config(data_dir: &Path) -> Result<BoardConfig, ConfigError> {
    let text = read_config_text(data_dir)?;
    Ok(toml::from_str(&text)?)
}

/// Read the raw document for round-trip-safe editing.
pub fn read_config_doc(data_dir: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let text = read_config_text(data_dir)?;
    Ok(text.parse()?)
}

/// Write the config document back, preserving formatting and comments.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = config_path(data_dir);
    fs::create_dir_all(data_dir).map_err(|e| ConfigError::Write {
        path: path.clone(),
        source: e,
    })?;
    atomic_write(&path, doc.to_string().as_bytes())
        .map_err(|e| ConfigError::Write { path, source: e })
}

/// Set `section.name` (or `section.table.name`) to a value. `true`/`false`
/// and integers keep their type; anything else is stored as a string. The
/// edited document must still parse as a config.
pub fn set_config_value(
    doc: &mut toml_edit::DocumentMut,
    dotted_key: &str,
    raw: &str,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = dotted_key.split('.').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::BadKey(dotted_key.to_string()));
    }
    let (last, sections) = match parts.split_last() {
        Some(split) => split,
        None => return Err(ConfigError::BadKey(dotted_key.to_string())),
    };

    let mut table = doc.as_table_mut();
    for section in sections {
        if !table.contains_key(section) {
            table.insert(section, toml_edit::Item::Table(toml_edit::Table::new()));
        }
        table = match table.get_mut(section).and_then(|i| i.as_table_mut()) {
            Some(t) => t,
            None => return Err(ConfigError::BadKey(dotted_key.to_string())),
        };
    }
    table.insert(last, toml_edit::value(parse_value(raw)));

    toml::from_str::<BoardConfig>(&doc.to_string())?;
    Ok(())
}

fn parse_value(raw: &str) -> toml_edit::Value {
    match raw {
        "true" => return true.into(),
        "false" => return false.into(),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return n.into();
    }
    raw.into()
}
