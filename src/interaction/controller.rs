use std::time::{Duration, Instant};

use tracing::debug;

use crate::interaction::hover::HoverTimers;
use crate::model::group::Collection;
use crate::model::link::Link;
use crate::ops::change::{Change, Direction, LinkPos, OpError};
use crate::ops::organizer::LinkOrganizer;

/// A group title being edited in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEdit {
    pub group: usize,
    pub draft: String,
}

/// Field values of the add-link form before they are committed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub name: String,
    pub url: String,
}

impl LinkDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.url.is_empty()
    }
}

/// Transient interaction state layered over the organizer: which group is
/// active, which title is being edited, which links have their delete
/// affordance revealed, and the uncommitted form drafts. None of it is
/// persisted.
///
/// Every edit is routed through here so positions held by the controller
/// (active group, edit target, hover timers) follow the change instead of
/// pointing at whatever slid into their old index.
#[derive(Debug, Clone)]
pub struct InteractionController {
    organizer: LinkOrganizer,
    hover: HoverTimers,
    edit: Option<TitleEdit>,
    active: Option<usize>,
    link_draft: LinkDraft,
    group_draft: String,
}

impl InteractionController {
    pub fn new(collection: Collection, hover_delay: Duration) -> Self {
        let active = (!collection.is_empty()).then_some(0);
        InteractionController {
            organizer: LinkOrganizer::new(collection),
            hover: HoverTimers::new(hover_delay),
            edit: None,
            active,
            link_draft: LinkDraft::default(),
            group_draft: String::new(),
        }
    }

    pub fn collection(&self) -> &Collection {
        self.organizer.collection()
    }

    pub fn revision(&self) -> u64 {
        self.organizer.revision()
    }

    // -----------------------------------------------------------------------
    // Board edits
    // -----------------------------------------------------------------------

    pub fn add_group(&mut self, title: &str) -> Option<Change> {
        let result = self.organizer.add_group(title);
        self.settle(result)
    }

    pub fn rename_group(&mut self, index: usize, title: &str) -> Option<Change> {
        let result = self.organizer.rename_group(index, title);
        self.settle(result)
    }

    pub fn remove_group(&mut self, index: usize) -> Option<Change> {
        let result = self.organizer.remove_group(index);
        self.settle(result)
    }

    pub fn move_group(&mut self, index: usize, direction: Direction) -> Option<Change> {
        let result = self.organizer.move_group(index, direction);
        self.settle(result)
    }

    pub fn add_link(&mut self, group: usize, link: &Link) -> Option<Change> {
        let result = self.organizer.add_link(group, link);
        self.settle(result)
    }

    pub fn remove_link(&mut self, group: usize, link: usize) -> Option<Change> {
        let result = self.organizer.remove_link(group, link);
        self.settle(result)
    }

    pub fn reorder_links(&mut self, group: usize, from: usize, to: usize) -> Option<Change> {
        let result = self.organizer.reorder_links(group, from, to);
        self.settle(result)
    }

    /// Replace the whole board with a freshly loaded one. All positional
    /// state is reset: timers cancelled, edit mode left, first group active.
    pub fn reload(&mut self, collection: Collection) {
        self.organizer.replace(collection);
        self.hover.clear();
        self.edit = None;
        self.active = (!self.collection().is_empty()).then_some(0);
    }

    fn settle(&mut self, result: Result<Change, OpError>) -> Option<Change> {
        let change = result.ok()?;
        self.follow(&change);
        Some(change)
    }

    fn follow(&mut self, change: &Change) {
        self.hover.follow(change);

        self.edit = self.edit.take().and_then(|mut edit| {
            edit.group = change.remap_group(edit.group)?;
            Some(edit)
        });

        let len = self.collection().len();
        self.active = match self.active.map(|a| change.remap_group(a)) {
            Some(Some(group)) => Some(group),
            // The active group is gone (or there was none yet)
            _ => (len > 0).then_some(0),
        };
    }

    // -----------------------------------------------------------------------
    // Active group
    // -----------------------------------------------------------------------

    /// The group that add-link actions go to. `None` only when the board is
    /// empty.
    pub fn active_group(&self) -> Option<usize> {
        self.active
    }

    pub fn select_group(&mut self, index: usize) -> bool {
        if index >= self.collection().len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    // -----------------------------------------------------------------------
    // Hover reveal
    // -----------------------------------------------------------------------

    pub fn pointer_enter(&mut self, pos: LinkPos, now: Instant) {
        if self.collection().link(pos.group, pos.link).is_some() {
            self.hover.pointer_enter(pos, now);
        }
    }

    pub fn pointer_leave(&mut self, pos: LinkPos, now: Instant) {
        self.hover.pointer_leave(pos, now);
    }

    /// Fire due hover timers. Returns true if anything needs redrawing.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.hover.advance(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.hover.next_deadline()
    }

    pub fn is_revealed(&self, pos: LinkPos) -> bool {
        self.hover.is_revealed(pos)
    }

    pub fn revealed_in_group(&self, group: usize) -> Option<usize> {
        self.hover.revealed_in_group(group)
    }

    /// Cancel all pending timers. Call when the view goes away.
    pub fn teardown(&mut self) {
        self.hover.clear();
    }

    // -----------------------------------------------------------------------
    // Title edit mode
    // -----------------------------------------------------------------------

    pub fn edit(&self) -> Option<&TitleEdit> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self, group: usize) -> bool {
        self.edit.as_ref().is_some_and(|e| e.group == group)
    }

    /// Start editing a group title, seeding the draft from the current
    /// title. Any other edit in progress is abandoned without saving.
    pub fn begin_edit(&mut self, group: usize) -> bool {
        let Some(title) = self.collection().group(group).map(|g| g.title.clone()) else {
            return false;
        };
        if let Some(prev) = self.edit.take() {
            debug!(group = prev.group, "title edit abandoned");
        }
        self.edit = Some(TitleEdit {
            group,
            draft: title,
        });
        true
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut String> {
        self.edit.as_mut().map(|e| &mut e.draft)
    }

    /// Commit the draft through `rename_group` and leave edit mode. A blank
    /// draft is refused and edit mode stays open so it can be fixed.
    pub fn commit_edit(&mut self) -> Option<Change> {
        let edit = self.edit.take()?;
        match self.organizer.rename_group(edit.group, &edit.draft) {
            Ok(change) => {
                self.follow(&change);
                Some(change)
            }
            Err(OpError::EmptyTitle) => {
                self.edit = Some(edit);
                None
            }
            Err(_) => None,
        }
    }

    /// Leave edit mode without touching the board.
    pub fn cancel_edit(&mut self) -> bool {
        self.edit.take().is_some()
    }

    // -----------------------------------------------------------------------
    // New-link / new-group drafts
    // -----------------------------------------------------------------------

    pub fn link_draft(&self) -> &LinkDraft {
        &self.link_draft
    }

    pub fn link_draft_mut(&mut self) -> &mut LinkDraft {
        &mut self.link_draft
    }

    /// Add the drafted link to the active group. The draft is cleared only
    /// if the link was accepted.
    pub fn commit_link_draft(&mut self) -> Option<Change> {
        let group = self.active?;
        let link = Link::new(self.link_draft.name.clone(), self.link_draft.url.clone());
        let change = self.add_link(group, &link)?;
        self.link_draft = LinkDraft::default();
        Some(change)
    }

    pub fn cancel_link_draft(&mut self) {
        self.link_draft = LinkDraft::default();
    }

    pub fn group_draft(&self) -> &str {
        &self.group_draft
    }

    pub fn group_draft_mut(&mut self) -> &mut String {
        &mut self.group_draft
    }

    pub fn commit_group_draft(&mut self) -> Option<Change> {
        let title = self.group_draft.clone();
        let change = self.add_group(&title)?;
        self.group_draft.clear();
        Some(change)
    }

    pub fn cancel_group_draft(&mut self) {
        self.group_draft.clear();
    }
}
