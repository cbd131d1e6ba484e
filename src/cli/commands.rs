use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ops::Direction;

#[derive(Parser)]
#[command(name = "lb", about = concat!("linkboard v", env!("CARGO_PKG_VERSION"), " - bookmarks in named groups"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List groups and their links
    List(ListArgs),
    /// List groups with link counts
    Groups,
    /// Add a link (to the first group unless a target is given)
    Add(AddArgs),
    /// Group management
    Group(GroupCmd),
    /// Remove a link
    Rm(RmArgs),
    /// Move a link within its group
    Mv(MvArgs),
    /// Search link names and URLs by regex
    Find(FindArgs),
    /// Validate the stored board
    Check(CheckArgs),
    /// View or clear the recovery log
    Recovery(RecoveryArgs),
    /// Show or edit config.toml
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only this group (index)
    pub group: Option<usize>,
}

#[derive(Args)]
pub struct FindArgs {
    /// Regex pattern (case-insensitive; invalid regex matches literally)
    pub pattern: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Repair the board: trim fields, drop invalid links and empty groups
    #[arg(long)]
    pub fix: bool,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Delete the recovery log
    #[arg(long)]
    pub clear: bool,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Link name
    pub name: String,
    /// Link URL
    pub url: String,
    /// Add to the group at this index (out of range falls back to the first)
    #[arg(long, conflicts_with_all = ["group_title", "new_group"])]
    pub group: Option<usize>,
    /// Add to the first group with exactly this title
    #[arg(long = "group-title", conflicts_with = "new_group")]
    pub group_title: Option<String>,
    /// Create a new group with this title for the link
    #[arg(long = "new-group")]
    pub new_group: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Group index
    pub group: usize,
    /// Link index within the group
    pub link: usize,
}

#[derive(Args)]
pub struct MvArgs {
    /// Group index
    pub group: usize,
    /// Current link index
    pub from: usize,
    /// New link index
    pub to: usize,
}

// ---------------------------------------------------------------------------
// Group management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct GroupCmd {
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// Add an empty group at the end
    Add {
        /// Group title
        title: String,
    },
    /// Rename a group
    Rename {
        /// Group index
        index: usize,
        /// New title
        title: String,
    },
    /// Remove a group and all of its links
    Rm {
        /// Group index
        index: usize,
    },
    /// Swap a group with its neighbor
    Mv {
        /// Group index
        index: usize,
        /// up or down
        #[arg(allow_negative_numbers = true)]
        direction: Direction,
    },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config
    Show,
    /// Set a value, e.g. `lb config set ui.hover_delay_ms 500`
    Set {
        /// Dotted key (section.name)
        key: String,
        /// New value
        value: String,
    },
    /// Print the path to config.toml
    Path,
}
