use tracing::debug;

use crate::model::group::Collection;
use crate::model::link::Link;
use crate::ops::change::{Change, Direction, OpError};
use crate::ops::{group_ops, link_ops};

/// Owner of the canonical collection.
///
/// All edits go through the methods below. Each one validates first and
/// either applies completely or leaves the collection as it was, so callers
/// never observe a half-applied edit. A rejected edit is a no-op: callers
/// that only care whether something changed can use `.is_ok()`.
///
/// The revision counter increases by one per committed edit and lets the
/// persistence side tell whether there is anything new to write.
#[derive(Debug, Clone, Default)]
pub struct LinkOrganizer {
    collection: Collection,
    revision: u64,
}

impl LinkOrganizer {
    pub fn new(collection: Collection) -> Self {
        LinkOrganizer {
            collection,
            revision: 0,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swap in a freshly loaded collection. This is not an edit: the
    /// revision stays put so the reloaded state is not written straight
    /// back. Callers must drop any positions they hold.
    pub fn replace(&mut self, collection: Collection) {
        self.collection = collection;
    }

    pub fn add_group(&mut self, title: &str) -> Result<Change, OpError> {
        self.apply("add_group", |c| group_ops::add_group(c, title))
    }

    pub fn rename_group(&mut self, index: usize, title: &str) -> Result<Change, OpError> {
        self.apply("rename_group", |c| group_ops::rename_group(c, index, title))
    }

    pub fn remove_group(&mut self, index: usize) -> Result<Change, OpError> {
        self.apply("remove_group", |c| group_ops::remove_group(c, index))
    }

    pub fn move_group(&mut self, index: usize, direction: Direction) -> Result<Change, OpError> {
        self.apply("move_group", |c| group_ops::move_group(c, index, direction))
    }

    pub fn add_link(&mut self, group: usize, link: &Link) -> Result<Change, OpError> {
        self.apply("add_link", |c| link_ops::add_link(c, group, link))
    }

    pub fn remove_link(&mut self, group: usize, link: usize) -> Result<Change, OpError> {
        self.apply("remove_link", |c| link_ops::remove_link(c, group, link))
    }

    pub fn reorder_links(&mut self, group: usize, from: usize, to: usize) -> Result<Change, OpError> {
        self.apply("reorder_links", |c| link_ops::reorder_links(c, group, from, to))
    }

    fn apply<F>(&mut self, op: &'static str, f: F) -> Result<Change, OpError>
    where
        F: FnOnce(&mut Collection) -> Result<Change, OpError>,
    {
        match f(&mut self.collection) {
            Ok(change) => {
                self.revision += 1;
                debug!(op, ?change, revision = self.revision, "edit applied");
                Ok(change)
            }
            Err(e) => {
                debug!(op, reason = %e, "edit rejected");
                Err(e)
            }
        }
    }
}
