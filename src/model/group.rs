use serde::{Deserialize, Serialize};

use super::link::Link;

/// A named, ordered bucket of links (shown as one column of the board).
///
/// A group has no stable identifier: within a session it is referred to by
/// its current position in the [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Group {
    pub fn new(title: impl Into<String>) -> Self {
        Group {
            title: title.into(),
            links: Vec::new(),
        }
    }

    pub fn with_links(title: impl Into<String>, links: Vec<Link>) -> Self {
        Group {
            title: title.into(),
            links,
        }
    }
}

/// The whole board: every group, in display order.
///
/// This is the unit of persistence. It serializes as a bare JSON array of
/// groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub groups: Vec<Group>,
}

impl Collection {
    pub fn new(groups: Vec<Group>) -> Self {
        Collection { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn link(&self, group: usize, link: usize) -> Option<&Link> {
        self.groups.get(group)?.links.get(link)
    }

    /// Index of the first group whose title equals `title` exactly.
    pub fn find_group(&self, title: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.title == title)
    }

    /// Total number of links across all groups
    pub fn link_count(&self) -> usize {
        self.groups.iter().map(|g| g.links.len()).sum()
    }
}
