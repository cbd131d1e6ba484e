use crate::model::group::{Collection, Group};
use crate::ops::change::{Change, Direction, OpError};

/// Trim a title, rejecting blank ones.
pub fn clean_title(title: &str) -> Result<&str, OpError> {
    let title = title.trim();
    if title.is_empty() {
        Err(OpError::EmptyTitle)
    } else {
        Ok(title)
    }
}

fn check_group(collection: &Collection, index: usize) -> Result<(), OpError> {
    if index >= collection.len() {
        return Err(OpError::NoSuchGroup(index));
    }
    Ok(())
}

/// Append a new, empty group.
pub fn add_group(collection: &mut Collection, title: &str) -> Result<Change, OpError> {
    let title = clean_title(title)?;
    collection.groups.push(Group::new(title));
    Ok(Change::GroupAdded {
        group: collection.len() - 1,
    })
}

/// Replace the title of the group at `index`.
pub fn rename_group(
    collection: &mut Collection,
    index: usize,
    title: &str,
) -> Result<Change, OpError> {
    let title = clean_title(title)?;
    check_group(collection, index)?;
    collection.groups[index].title = title.to_string();
    Ok(Change::GroupRenamed { group: index })
}

/// Remove the group at `index` together with all of its links.
pub fn remove_group(collection: &mut Collection, index: usize) -> Result<Change, OpError> {
    check_group(collection, index)?;
    collection.groups.remove(index);
    Ok(Change::GroupRemoved { group: index })
}

/// Swap the group at `index` with its neighbour in `direction`.
pub fn move_group(
    collection: &mut Collection,
    index: usize,
    direction: Direction,
) -> Result<Change, OpError> {
    check_group(collection, index)?;
    let to = direction
        .neighbor(index, collection.len())
        .ok_or(OpError::AtEdge {
            group: index,
            direction,
        })?;
    collection.groups.swap(index, to);
    Ok(Change::GroupMoved { from: index, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::link::Link;
    use pretty_assertions::assert_eq;

    fn titles(c: &Collection) -> Vec<&str> {
        c.groups.iter().map(|g| g.title.as_str()).collect()
    }

    fn three_groups() -> Collection {
        Collection::new(vec![
            Group::with_links("A", vec![Link::new("a", "https://a.example")]),
            Group::new("B"),
            Group::new("C"),
        ])
    }

    #[test]
    fn add_group_appends_empty_group() {
        let mut c = Collection::default();
        let change = add_group(&mut c, "  Work ").unwrap();
        assert_eq!(change, Change::GroupAdded { group: 0 });
        assert_eq!(c.groups, vec![Group::new("Work")]);
    }

    #[test]
    fn add_group_rejects_blank_title() {
        let mut c = three_groups();
        let before = c.clone();
        assert_eq!(add_group(&mut c, " \t "), Err(OpError::EmptyTitle));
        assert_eq!(c, before);
    }

    #[test]
    fn rename_group_replaces_title() {
        let mut c = three_groups();
        rename_group(&mut c, 1, " Bee ").unwrap();
        assert_eq!(titles(&c), vec!["A", "Bee", "C"]);
    }

    #[test]
    fn rename_group_rejections() {
        let mut c = three_groups();
        assert_eq!(rename_group(&mut c, 1, ""), Err(OpError::EmptyTitle));
        assert_eq!(rename_group(&mut c, 3, "D"), Err(OpError::NoSuchGroup(3)));
        assert_eq!(titles(&c), vec!["A", "B", "C"]);
    }

    #[test]
    fn remove_group_drops_its_links() {
        let mut c = three_groups();
        remove_group(&mut c, 0).unwrap();
        assert_eq!(titles(&c), vec!["B", "C"]);
        assert_eq!(c.link_count(), 0);
        assert_eq!(remove_group(&mut c, 2), Err(OpError::NoSuchGroup(2)));
    }

    #[test]
    fn move_group_swaps_neighbors() {
        let mut c = three_groups();
        assert_eq!(
            move_group(&mut c, 0, Direction::Down).unwrap(),
            Change::GroupMoved { from: 0, to: 1 }
        );
        assert_eq!(titles(&c), vec!["B", "A", "C"]);
        move_group(&mut c, 2, Direction::Up).unwrap();
        assert_eq!(titles(&c), vec!["B", "C", "A"]);
    }

    #[test]
    fn move_group_at_edges_is_rejected() {
        let mut c = three_groups();
        assert!(matches!(
            move_group(&mut c, 0, Direction::Up),
            Err(OpError::AtEdge { group: 0, .. })
        ));
        assert!(matches!(
            move_group(&mut c, 2, Direction::Down),
            Err(OpError::AtEdge { group: 2, .. })
        ));
        assert_eq!(titles(&c), vec!["A", "B", "C"]);
    }
}
