use std::fmt;
use std::str::FromStr;

/// Error type for board operations.
///
/// Every operation validates before it mutates, so an `Err` always means the
/// collection was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpError {
    #[error("group title is empty")]
    EmptyTitle,
    #[error("link name is empty")]
    EmptyName,
    #[error("link url is empty")]
    EmptyUrl,
    #[error("no group at index {0}")]
    NoSuchGroup(usize),
    #[error("group {group} has no link at index {link}")]
    NoSuchLink { group: usize, link: usize },
    #[error("group {group} cannot move {direction}")]
    AtEdge { group: usize, direction: Direction },
    #[error("nothing to change")]
    Unchanged,
}

/// Direction for moving a group one step through the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0
    Up,
    /// Toward the end
    Down,
}

impl Direction {
    /// The neighbouring index in this direction, if it exists in a sequence
    /// of `len` elements.
    pub fn neighbor(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&n| n < len),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "left" | "-1" => Ok(Direction::Up),
            "down" | "right" | "+1" | "1" => Ok(Direction::Down),
            other => Err(format!("invalid direction '{}' (expected up or down)", other)),
        }
    }
}

/// Position of one link on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkPos {
    pub group: usize,
    pub link: usize,
}

impl LinkPos {
    pub fn new(group: usize, link: usize) -> Self {
        LinkPos { group, link }
    }
}

/// A committed mutation, described by the positions it touched.
///
/// Anything that holds positions across a mutation (selection, edit target,
/// hover timers) uses `remap_group` / `remap_link` to follow the element it
/// referred to instead of keeping a stale index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    GroupAdded { group: usize },
    GroupRenamed { group: usize },
    GroupRemoved { group: usize },
    /// Two neighbouring groups swapped places
    GroupMoved { from: usize, to: usize },
    LinkAdded { group: usize, link: usize },
    /// `group_removed` is set when the removed link was the group's last
    /// one and the emptied group went with it.
    LinkRemoved {
        group: usize,
        link: usize,
        group_removed: bool,
    },
    LinksReordered { group: usize, from: usize, to: usize },
}

impl Change {
    /// Whether existing elements may sit at different positions afterwards.
    /// Appends and renames leave every position where it was.
    pub fn shifts_positions(&self) -> bool {
        !matches!(
            self,
            Change::GroupAdded { .. } | Change::GroupRenamed { .. } | Change::LinkAdded { .. }
        )
    }

    /// Where the group that was at `index` before this change is now.
    /// `None` if the change removed it.
    pub fn remap_group(&self, index: usize) -> Option<usize> {
        match *self {
            Change::GroupRemoved { group }
            | Change::LinkRemoved {
                group,
                group_removed: true,
                ..
            } => match index.cmp(&group) {
                std::cmp::Ordering::Less => Some(index),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(index - 1),
            },
            Change::GroupMoved { from, to } => {
                if index == from {
                    Some(to)
                } else if index == to {
                    Some(from)
                } else {
                    Some(index)
                }
            }
            _ => Some(index),
        }
    }

    /// Where the link that was at `pos` before this change is now.
    /// `None` if the change removed it.
    pub fn remap_link(&self, pos: LinkPos) -> Option<LinkPos> {
        match *self {
            Change::LinkRemoved {
                group,
                link,
                group_removed: false,
            } if pos.group == group => match pos.link.cmp(&link) {
                std::cmp::Ordering::Less => Some(pos),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(LinkPos::new(group, pos.link - 1)),
            },
            Change::LinksReordered { group, from, to } if pos.group == group => {
                let link = if pos.link == from {
                    to
                } else if from < to && pos.link > from && pos.link <= to {
                    pos.link - 1
                } else if to < from && pos.link >= to && pos.link < from {
                    pos.link + 1
                } else {
                    pos.link
                };
                Some(LinkPos::new(group, link))
            }
            _ => self
                .remap_group(pos.group)
                .map(|group| LinkPos::new(group, pos.link)),
        }
    }
}
