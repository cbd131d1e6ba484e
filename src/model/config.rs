use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file name, relative to the data directory
    #[serde(default = "default_store_file")]
    pub file: String,
    /// Key the collection is stored under
    #[serde(default = "default_store_key")]
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
            key: default_store_key(),
        }
    }
}

fn default_store_file() -> String {
    "links.json".to_string()
}

fn default_store_key() -> String {
    "navigationColumns".to_string()
}

/// What a fresh board looks like when nothing usable is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultCollection {
    /// No groups at all
    #[default]
    Empty,
    /// One empty group titled `seed_title`
    Seeded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub collection: DefaultCollection,
    #[serde(default = "default_seed_title")]
    pub seed_title: String,
    /// Group created by a quick add when the board has no groups yet
    #[serde(default = "default_quick_add_group")]
    pub quick_add_group: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            collection: DefaultCollection::Empty,
            seed_title: default_seed_title(),
            quick_add_group: default_quick_add_group(),
        }
    }
}

fn default_seed_title() -> String {
    "Links".to_string()
}

fn default_quick_add_group() -> String {
    "Default".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay before a hovered link reveals its delete affordance (and before
    /// it hides again after the pointer leaves).
    #[serde(default = "default_hover_delay_ms")]
    pub hover_delay_ms: u64,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            hover_delay_ms: default_hover_delay_ms(),
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_hover_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}
