use std::collections::HashSet;

use serde::Serialize;

use crate::model::group::{Collection, Group};

/// Structured result from `lb check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// Stored data that breaks a board invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckError {
    BlankTitle { group: usize },
    BlankName { group: usize, link: usize },
    BlankUrl { group: usize, link: usize },
}

/// Something odd but allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckWarning {
    /// A group with no links (the board only removes these when their last
    /// link is removed, so stored data can still contain them)
    EmptyGroup { group: usize, title: String },
    /// The same URL appears twice in one group
    DuplicateUrl { group: usize, link: usize, url: String },
    /// Leading or trailing whitespace on a title, name or url
    Untrimmed { group: usize, link: Option<usize> },
}

/// Validate a collection. Read-only.
pub fn check_collection(collection: &Collection) -> CheckResult {
    let mut result = CheckResult::default();

    for (g, group) in collection.groups.iter().enumerate() {
        check_group(g, group, &mut result);
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_group(g: usize, group: &Group, result: &mut CheckResult) {
    if group.title.trim().is_empty() {
        result.errors.push(CheckError::BlankTitle { group: g });
    } else if group.title.trim() != group.title {
        result.warnings.push(CheckWarning::Untrimmed { group: g, link: None });
    }

    if group.links.is_empty() {
        result.warnings.push(CheckWarning::EmptyGroup {
            group: g,
            title: group.title.clone(),
        });
    }

    let mut seen = HashSet::new();
    for (l, link) in group.links.iter().enumerate() {
        let name_blank = link.name.trim().is_empty();
        let url_blank = link.url.trim().is_empty();
        if name_blank {
            result.errors.push(CheckError::BlankName { group: g, link: l });
        }
        if url_blank {
            result.errors.push(CheckError::BlankUrl { group: g, link: l });
        }
        if name_blank || url_blank {
            continue;
        }
        if link.name.trim() != link.name || link.url.trim() != link.url {
            result.warnings.push(CheckWarning::Untrimmed {
                group: g,
                link: Some(l),
            });
        }
        if !seen.insert(link.url.trim()) {
            result.warnings.push(CheckWarning::DuplicateUrl {
                group: g,
                link: l,
                url: link.url.trim().to_string(),
            });
        }
    }
}

/// Rewrite a collection so it satisfies the board invariants: trim every
/// field, drop links with a blank name or url, then drop groups that are
/// untitled or have no links left. Duplicate URLs are kept.
///
/// Returns the number of groups and links removed.
pub fn fix_collection(collection: &mut Collection) -> FixSummary {
    let mut summary = FixSummary::default();

    for group in &mut collection.groups {
        group.title = group.title.trim().to_string();
        let before = group.links.len();
        group.links = group.links.iter().filter_map(|l| l.trimmed()).collect();
        summary.links_removed += before - group.links.len();
    }

    let before = collection.groups.len();
    collection
        .groups
        .retain(|g| !g.title.is_empty() && !g.links.is_empty());
    summary.groups_removed = before - collection.groups.len();
    summary
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixSummary {
    pub groups_removed: usize,
    pub links_removed: usize,
}
