use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::ops::change::{Change, LinkPos};

/// Delay used when the config does not say otherwise
pub const DEFAULT_HOVER_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Reveal(Instant),
    Conceal(Instant),
}

impl Pending {
    fn deadline(self) -> Instant {
        match self {
            Pending::Reveal(at) | Pending::Conceal(at) => at,
        }
    }
}

/// Delayed hover reveal, one independent timer per link.
///
/// Time is passed in by the caller (`now` arguments and [`advance`]) rather
/// than read from the clock, so the event loop decides when timers fire and
/// tests can step time explicitly.
///
/// [`advance`]: HoverTimers::advance
#[derive(Debug, Clone)]
pub struct HoverTimers {
    delay: Duration,
    pending: HashMap<LinkPos, Pending>,
    revealed: HashSet<LinkPos>,
}

impl Default for HoverTimers {
    fn default() -> Self {
        HoverTimers::new(DEFAULT_HOVER_DELAY)
    }
}

impl HoverTimers {
    pub fn new(delay: Duration) -> Self {
        HoverTimers {
            delay,
            pending: HashMap::new(),
            revealed: HashSet::new(),
        }
    }

    /// Pointer entered a link row.
    pub fn pointer_enter(&mut self, pos: LinkPos, now: Instant) {
        if self.revealed.contains(&pos) {
            // Back before the un-reveal fired: stay revealed.
            self.pending.remove(&pos);
        } else {
            self.pending.insert(pos, Pending::Reveal(now + self.delay));
        }
    }

    /// Pointer left a link row.
    pub fn pointer_leave(&mut self, pos: LinkPos, now: Instant) {
        if self.revealed.contains(&pos) {
            self.pending.insert(pos, Pending::Conceal(now + self.delay));
        } else {
            self.pending.remove(&pos);
        }
    }

    /// Fire every timer due at or before `now`. Returns true if any reveal
    /// state changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let due: Vec<(LinkPos, Pending)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline() <= now)
            .map(|(pos, p)| (*pos, *p))
            .collect();

        let mut changed = false;
        for (pos, timer) in due {
            self.pending.remove(&pos);
            changed |= match timer {
                Pending::Reveal(_) => self.revealed.insert(pos),
                Pending::Conceal(_) => self.revealed.remove(&pos),
            };
        }
        changed
    }

    /// Earliest pending deadline, for sizing the event loop's poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline()).min()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_revealed(&self, pos: LinkPos) -> bool {
        self.revealed.contains(&pos)
    }

    /// The revealed link in a group, if any (lowest index when several are).
    pub fn revealed_in_group(&self, group: usize) -> Option<usize> {
        self.revealed
            .iter()
            .filter(|p| p.group == group)
            .map(|p| p.link)
            .min()
    }

    /// Move every timer and reveal flag to where its link went after
    /// `change`; entries for links that no longer exist are dropped.
    pub fn follow(&mut self, change: &Change) {
        if !change.shifts_positions() {
            return;
        }
        self.pending = self
            .pending
            .drain()
            .filter_map(|(pos, p)| change.remap_link(pos).map(|pos| (pos, p)))
            .collect();
        self.revealed = self
            .revealed
            .drain()
            .filter_map(|pos| change.remap_link(pos))
            .collect();
    }

    /// Cancel every timer and hide everything.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.revealed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(t0: Instant, n: u64) -> Instant {
        t0 + Duration::from_millis(n)
    }

    const A: LinkPos = LinkPos { group: 0, link: 0 };
    const B: LinkPos = LinkPos { group: 0, link: 1 };

    #[test]
    fn leave_before_delay_cancels_reveal() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(A, t0);
        hover.pointer_leave(A, ms(t0, 500));
        assert!(!hover.advance(ms(t0, 2000)));
        assert!(!hover.is_revealed(A));
        assert!(!hover.has_pending());
    }

    #[test]
    fn reveal_fires_after_delay() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(A, t0);
        assert!(!hover.advance(ms(t0, 999)));
        assert!(!hover.is_revealed(A));
        assert!(hover.advance(ms(t0, 1000)));
        assert!(hover.is_revealed(A));
    }

    #[test]
    fn leave_after_reveal_conceals_after_delay() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(A, t0);
        hover.advance(ms(t0, 1000));
        hover.pointer_leave(A, ms(t0, 1200));
        hover.advance(ms(t0, 2100));
        assert!(hover.is_revealed(A));
        assert!(hover.advance(ms(t0, 2200)));
        assert!(!hover.is_revealed(A));
    }

    #[test]
    fn reenter_cancels_pending_conceal() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(A, t0);
        hover.advance(ms(t0, 1000));
        hover.pointer_leave(A, ms(t0, 1100));
        hover.pointer_enter(A, ms(t0, 1500));
        hover.advance(ms(t0, 5000));
        assert!(hover.is_revealed(A));
    }

    #[test]
    fn timers_are_independent() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(A, t0);
        hover.pointer_leave(A, ms(t0, 300));
        hover.pointer_enter(B, ms(t0, 300));
        assert_eq!(hover.next_deadline(), Some(ms(t0, 1300)));
        hover.advance(ms(t0, 1300));
        assert!(!hover.is_revealed(A));
        assert!(hover.is_revealed(B));
        assert_eq!(hover.revealed_in_group(0), Some(1));
        assert_eq!(hover.revealed_in_group(1), None);
    }

    #[test]
    fn custom_delay() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::new(Duration::from_millis(200));
        hover.pointer_enter(A, t0);
        hover.advance(ms(t0, 200));
        assert!(hover.is_revealed(A));
    }

    #[test]
    fn timers_follow_link_removal() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(B, t0);
        hover.follow(&Change::LinkRemoved {
            group: 0,
            link: 0,
            group_removed: false,
        });
        hover.advance(ms(t0, 1000));
        // The link that was at 1 is now at 0
        assert!(hover.is_revealed(A));
        assert!(!hover.is_revealed(B));
    }

    #[test]
    fn timers_for_removed_links_are_dropped() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(A, t0);
        hover.advance(ms(t0, 1000));
        hover.pointer_enter(B, ms(t0, 1000));
        hover.follow(&Change::GroupRemoved { group: 0 });
        assert!(!hover.has_pending());
        assert_eq!(hover.revealed_in_group(0), None);
    }

    #[test]
    fn clear_cancels_everything() {
        let t0 = Instant::now();
        let mut hover = HoverTimers::default();
        hover.pointer_enter(A, t0);
        hover.advance(ms(t0, 1000));
        hover.pointer_enter(B, ms(t0, 1000));
        hover.clear();
        assert!(!hover.has_pending());
        assert!(!hover.is_revealed(A));
        assert_eq!(hover.next_deadline(), None);
    }
}
