use std::ops::Range;

use regex::Regex;
use serde::Serialize;

use crate::model::group::Collection;

/// Which field of a link matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Name,
    Url,
}

/// A search hit on one field of one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub group: usize,
    pub link: usize,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Build a case-insensitive regex from user input. Input that is not a valid
/// pattern is matched literally.
pub fn build_search_regex(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search link names and URLs across every group, in board order.
pub fn search_links(collection: &Collection, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    for (g, group) in collection.groups.iter().enumerate() {
        for (l, link) in group.links.iter().enumerate() {
            for (field, text) in [(MatchField::Name, &link.name), (MatchField::Url, &link.url)] {
                let spans = find_matches(re, text);
                if !spans.is_empty() {
                    hits.push(SearchHit {
                        group: g,
                        link: l,
                        field,
                        spans,
                    });
                }
            }
        }
    }

    hits
}
