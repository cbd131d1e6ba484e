//! The quick-add path: append one link (usually the page being looked at)
//! to the board without opening the panel.
//!
//! It uses the same read-modify-write contract as the panel: load the whole
//! collection, apply one `add_group` + `add_link` or one `add_link`, write
//! the whole collection back.

use crate::model::group::Collection;
use crate::model::link::Link;
use crate::ops::change::OpError;
use crate::ops::{group_ops, link_ops};

/// URL prefixes of browser-internal pages that make no sense as bookmarks.
const INTERNAL_PREFIXES: &[&str] = &[
    "chrome://",
    "about:",
    "edge://",
    "chrome-extension://",
    "moz-extension://",
];

/// Error type for quick adds
#[derive(Debug, thiserror::Error)]
pub enum QuickAddError {
    #[error("title and url must not be empty")]
    EmptyField,
    #[error("cannot bookmark browser-internal page: {0}")]
    InternalPage(String),
    #[error("no group titled \"{0}\"")]
    NoSuchGroup(String),
    #[error("{0}")]
    Op(#[from] OpError),
}

/// Where the new link should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupTarget {
    /// An existing group by position. Out of range falls back to the first
    /// group.
    Index(usize),
    /// The first group with exactly this title
    Title(String),
    /// A new group with this title, seeded with the link
    New(String),
}

/// What a quick add did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAddOutcome {
    /// Index of the group the link landed in
    pub group: usize,
    /// Whether that group was created for it
    pub created_group: bool,
}

pub fn is_internal_page(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    INTERNAL_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Add one link to `collection`.
///
/// With no target (or a blank new-group title) the link goes to the first
/// group; when the board is empty a group titled `fallback_group` is created
/// for it.
pub fn quick_add(
    collection: &mut Collection,
    name: &str,
    url: &str,
    target: Option<&GroupTarget>,
    fallback_group: &str,
) -> Result<QuickAddOutcome, QuickAddError> {
    let link = Link::new(name, url)
        .trimmed()
        .ok_or(QuickAddError::EmptyField)?;
    if is_internal_page(&link.url) {
        return Err(QuickAddError::InternalPage(link.url));
    }

    let new_group = match target {
        Some(GroupTarget::New(title)) if !title.trim().is_empty() => Some(title.as_str()),
        _ if collection.is_empty() => Some(fallback_group),
        _ => None,
    };

    if let Some(title) = new_group {
        // Validate everything before the first mutation so a bad title
        // cannot leave an empty group behind.
        group_ops::clean_title(title)?;
        group_ops::add_group(collection, title)?;
        let group = collection.len() - 1;
        link_ops::add_link(collection, group, &link)?;
        return Ok(QuickAddOutcome {
            group,
            created_group: true,
        });
    }

    let group = match target {
        Some(GroupTarget::Title(title)) => collection
            .find_group(title.trim())
            .ok_or_else(|| QuickAddError::NoSuchGroup(title.trim().to_string()))?,
        Some(GroupTarget::Index(i)) if *i < collection.len() => *i,
        _ => 0,
    };
    link_ops::add_link(collection, group, &link)?;
    Ok(QuickAddOutcome {
        group,
        created_group: false,
    })
}
