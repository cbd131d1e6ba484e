use serde::Serialize;

use crate::model::group::{Collection, Group};
use crate::ops::search::{MatchField, SearchHit};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LinkJson {
    pub index: usize,
    pub name: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub index: usize,
    pub title: String,
    pub links: Vec<LinkJson>,
}

#[derive(Serialize)]
pub struct GroupSummaryJson {
    pub index: usize,
    pub title: String,
    pub links: usize,
}

#[derive(Serialize)]
pub struct FindHitJson {
    pub group: usize,
    pub group_title: String,
    pub link: usize,
    pub name: String,
    pub url: String,
    pub fields: Vec<MatchField>,
}

pub fn group_to_json(index: usize, group: &Group) -> GroupJson {
    GroupJson {
        index,
        title: group.title.clone(),
        links: group
            .links
            .iter()
            .enumerate()
            .map(|(i, l)| LinkJson {
                index: i,
                name: l.name.clone(),
                url: l.url.clone(),
            })
            .collect(),
    }
}

pub fn group_summary_json(index: usize, group: &Group) -> GroupSummaryJson {
    GroupSummaryJson {
        index,
        title: group.title.clone(),
        links: group.links.len(),
    }
}

/// Fold per-field hits into one entry per link, in board order.
pub fn find_hits_to_json(collection: &Collection, hits: &[SearchHit]) -> Vec<FindHitJson> {
    let mut out: Vec<FindHitJson> = Vec::new();
    for hit in hits {
        if let Some(last) = out.last_mut() {
            if last.group == hit.group && last.link == hit.link {
                last.fields.push(hit.field);
                continue;
            }
        }
        let (Some(group), Some(link)) = (
            collection.group(hit.group),
            collection.link(hit.group, hit.link),
        ) else {
            continue;
        };
        out.push(FindHitJson {
            group: hit.group,
            group_title: group.title.clone(),
            link: hit.link,
            name: link.name.clone(),
            url: link.url.clone(),
            fields: vec![hit.field],
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `[0] Work (2)` followed by one indented line per link.
pub fn format_group_listing(index: usize, group: &Group) -> Vec<String> {
    let mut lines = vec![format_group_line(index, group)];
    for (i, link) in group.links.iter().enumerate() {
        lines.push(format!("  {:>2}. {}  {}", i, link.name, link.url));
    }
    lines
}

pub fn format_group_line(index: usize, group: &Group) -> String {
    format!("[{}] {} ({})", index, group.title, group.links.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::link::Link;
    use crate::ops::search::{build_search_regex, search_links};
    use insta::assert_snapshot;

    fn work() -> Group {
        Group::with_links(
            "Work",
            vec![
                Link::new("Docs", "https://docs.example.com"),
                Link::new("CI", "https://ci.example.com"),
            ],
        )
    }

    #[test]
    fn text_listing() {
        assert_snapshot!(format_group_listing(0, &work()).join("\n"), @r"
        [0] Work (2)
           0. Docs  https://docs.example.com
           1. CI  https://ci.example.com
        ");
    }

    #[test]
    fn group_json_shape() {
        let json = serde_json::to_string(&group_to_json(3, &work())).unwrap();
        assert_snapshot!(json, @r#"{"index":3,"title":"Work","links":[{"index":0,"name":"Docs","url":"https://docs.example.com"},{"index":1,"name":"CI","url":"https://ci.example.com"}]}"#);
    }

    #[test]
    fn find_hits_fold_fields() {
        let c = Collection::new(vec![work()]);
        let re = build_search_regex("docs").unwrap();
        let hits = find_hits_to_json(&c, &search_links(&c, &re));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields, vec![MatchField::Name, MatchField::Url]);
        assert_eq!(hits[0].group_title, "Work");
    }
}
