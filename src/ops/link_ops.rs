use crate::model::group::Collection;
use crate::model::link::Link;
use crate::ops::change::{Change, OpError};

/// Trim both fields of a link, rejecting blank ones.
pub fn clean_link(link: &Link) -> Result<Link, OpError> {
    link.trimmed().ok_or(if link.name.trim().is_empty() {
        OpError::EmptyName
    } else {
        OpError::EmptyUrl
    })
}

fn group_len(collection: &Collection, group: usize) -> Result<usize, OpError> {
    collection
        .group(group)
        .map(|g| g.links.len())
        .ok_or(OpError::NoSuchGroup(group))
}

/// Append a link to the end of a group.
pub fn add_link(collection: &mut Collection, group: usize, link: &Link) -> Result<Change, OpError> {
    let link = clean_link(link)?;
    let len = group_len(collection, group)?;
    collection.groups[group].links.push(link);
    Ok(Change::LinkAdded { group, link: len })
}

/// Remove a link. A group left with no links is removed as well.
pub fn remove_link(collection: &mut Collection, group: usize, link: usize) -> Result<Change, OpError> {
    let len = group_len(collection, group)?;
    if link >= len {
        return Err(OpError::NoSuchLink { group, link });
    }
    collection.groups[group].links.remove(link);
    let group_removed = collection.groups[group].links.is_empty();
    if group_removed {
        collection.groups.remove(group);
    }
    Ok(Change::LinkRemoved {
        group,
        link,
        group_removed,
    })
}

/// Move one link to another position inside the same group. The links in
/// between shift by one to close the gap.
pub fn reorder_links(
    collection: &mut Collection,
    group: usize,
    from: usize,
    to: usize,
) -> Result<Change, OpError> {
    let len = group_len(collection, group)?;
    for link in [from, to] {
        if link >= len {
            return Err(OpError::NoSuchLink { group, link });
        }
    }
    if from == to {
        return Err(OpError::Unchanged);
    }
    let links = &mut collection.groups[group].links;
    let moved = links.remove(from);
    links.insert(to, moved);
    Ok(Change::LinksReordered { group, from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::group::Group;
    use pretty_assertions::assert_eq;

    fn link(n: &str) -> Link {
        Link::new(n, format!("https://{}.example", n))
    }

    fn names(c: &Collection, group: usize) -> Vec<&str> {
        c.groups[group].links.iter().map(|l| l.name.as_str()).collect()
    }

    fn board() -> Collection {
        Collection::new(vec![
            Group::with_links("Work", vec![link("a"), link("b"), link("c"), link("d")]),
            Group::with_links("Solo", vec![link("s")]),
        ])
    }

    #[test]
    fn add_link_appends_trimmed() {
        let mut c = board();
        let change = add_link(&mut c, 1, &Link::new(" t ", " https://t.example ")).unwrap();
        assert_eq!(change, Change::LinkAdded { group: 1, link: 1 });
        assert_eq!(c.groups[1].links[1], Link::new("t", "https://t.example"));
    }

    #[test]
    fn add_link_rejections_leave_board_untouched() {
        let mut c = board();
        let before = c.clone();
        assert_eq!(add_link(&mut c, 5, &link("x")), Err(OpError::NoSuchGroup(5)));
        assert_eq!(
            add_link(&mut c, 0, &Link::new("  ", "https://x.example")),
            Err(OpError::EmptyName)
        );
        assert_eq!(add_link(&mut c, 0, &Link::new("x", "")), Err(OpError::EmptyUrl));
        assert_eq!(c, before);
    }

    #[test]
    fn clean_link_trims_or_names_the_blank_field() {
        assert_eq!(
            clean_link(&Link::new(" Docs ", " https://docs.example.com\n")),
            Ok(Link::new("Docs", "https://docs.example.com"))
        );
        assert_eq!(clean_link(&Link::new("", "")), Err(OpError::EmptyName));
        assert_eq!(clean_link(&Link::new("Docs", " \t")), Err(OpError::EmptyUrl));
    }

    #[test]
    fn remove_link_keeps_nonempty_group() {
        let mut c = board();
        let change = remove_link(&mut c, 0, 1).unwrap();
        assert_eq!(
            change,
            Change::LinkRemoved {
                group: 0,
                link: 1,
                group_removed: false
            }
        );
        assert_eq!(names(&c, 0), vec!["a", "c", "d"]);
    }

    #[test]
    fn removing_last_link_removes_group() {
        let mut c = board();
        let change = remove_link(&mut c, 1, 0).unwrap();
        assert_eq!(
            change,
            Change::LinkRemoved {
                group: 1,
                link: 0,
                group_removed: true
            }
        );
        assert_eq!(c.len(), 1);
        assert_eq!(c.groups[0].title, "Work");
    }

    #[test]
    fn remove_link_out_of_range() {
        let mut c = board();
        assert_eq!(
            remove_link(&mut c, 0, 4),
            Err(OpError::NoSuchLink { group: 0, link: 4 })
        );
        assert_eq!(remove_link(&mut c, 2, 0), Err(OpError::NoSuchGroup(2)));
    }

    #[test]
    fn remove_then_readd_moves_link_to_end() {
        let mut c = board();
        let removed = c.groups[0].links[1].clone();
        remove_link(&mut c, 0, 1).unwrap();
        add_link(&mut c, 0, &removed).unwrap();
        assert_eq!(names(&c, 0), vec!["a", "c", "d", "b"]);

        // Only the last link comes back where it was
        let mut c = board();
        let last = c.groups[0].links[3].clone();
        remove_link(&mut c, 0, 3).unwrap();
        add_link(&mut c, 0, &last).unwrap();
        assert_eq!(c, board());
    }

    #[test]
    fn reorder_forward_and_backward() {
        let mut c = board();
        reorder_links(&mut c, 0, 0, 2).unwrap();
        assert_eq!(names(&c, 0), vec!["b", "c", "a", "d"]);
        reorder_links(&mut c, 0, 3, 0).unwrap();
        assert_eq!(names(&c, 0), vec!["d", "b", "c", "a"]);
        assert_eq!(names(&c, 1), vec!["s"]);
    }

    #[test]
    fn reorder_preserves_links() {
        let mut c = board();
        reorder_links(&mut c, 0, 1, 3).unwrap();
        let mut after = c.groups[0].links.clone();
        let mut before = board().groups[0].links.clone();
        after.sort_by(|a, b| a.name.cmp(&b.name));
        before.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(after, before);
    }

    #[test]
    fn reorder_rejections() {
        let mut c = board();
        assert_eq!(reorder_links(&mut c, 0, 1, 1), Err(OpError::Unchanged));
        assert_eq!(
            reorder_links(&mut c, 0, 0, 4),
            Err(OpError::NoSuchLink { group: 0, link: 4 })
        );
        assert_eq!(reorder_links(&mut c, 3, 0, 1), Err(OpError::NoSuchGroup(3)));
        assert_eq!(c, board());
    }
}
