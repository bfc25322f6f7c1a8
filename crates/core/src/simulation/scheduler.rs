//! Deadline scheduler
//!
//! Every delayed action in the simulation (ignition completion, spread
//! attempts) is a deadline in one min-heap. Cancelling an owner bumps its
//! epoch; entries carrying an older epoch are dropped when they surface, so no
//! callback ever fires for a stopped or removed entity.

use crate::core_types::entity::EntityHandle;
use crate::core_types::units::Seconds;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Delayed work the simulation performs on behalf of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScheduledAction {
    /// Igniting entity reaches its deadline and starts burning
    CompleteIgnition,
    /// Spread coordinator runs one attempt
    SpreadAttempt,
}

/// An action whose deadline has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    /// Deadline the action was scheduled for
    pub deadline: Seconds,
    /// Entity the action belongs to
    pub owner: EntityHandle,
    /// What to do
    pub action: ScheduledAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    deadline: Seconds,
    sequence: u64,
    owner: EntityHandle,
    epoch: u32,
    action: ScheduledAction,
}

/// Min-heap of deadlines ordered by (deadline, insertion sequence).
///
/// The heap top is always live: stale entries are popped as soon as they
/// surface, so [`Scheduler::next_deadline`] is a peek and [`Scheduler::len`]
/// reads a counter.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    epochs: FxHashMap<EntityHandle, u32>,
    live: FxHashMap<EntityHandle, usize>,
    live_total: usize,
    next_sequence: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` for `owner` at `deadline`
    pub fn schedule(&mut self, deadline: Seconds, owner: EntityHandle, action: ScheduledAction) {
        let epoch = self.epoch_of(owner);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.heap.push(Reverse(Entry {
            deadline,
            sequence,
            owner,
            epoch,
            action,
        }));
        *self.live.entry(owner).or_insert(0) += 1;
        self.live_total += 1;
    }

    /// Invalidate every pending action of `owner`
    pub fn cancel_owner(&mut self, owner: EntityHandle) {
        let epoch = self.epochs.entry(owner).or_insert(0);
        *epoch = epoch.wrapping_add(1);
        if let Some(count) = self.live.remove(&owner) {
            self.live_total -= count;
        }
        self.prune_top();
    }

    /// Cancel `owner` and drop all bookkeeping for it.
    ///
    /// Only for owners that never schedule again, such as removed entities.
    pub fn forget_owner(&mut self, owner: EntityHandle) {
        if let Some(count) = self.live.remove(&owner) {
            self.live_total -= count;
        }
        self.heap.retain(|Reverse(e)| e.owner != owner);
        self.epochs.remove(&owner);
        self.prune_top();
    }

    /// Pop the earliest live action with `deadline <= now`.
    ///
    /// Called in a loop so actions scheduled while draining, with deadlines
    /// that have already passed, still run in the same tick.
    pub fn pop_due(&mut self, now: Seconds) -> Option<Due> {
        let Reverse(top) = self.heap.peek()?;
        if top.deadline > now {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        self.release(entry.owner);
        self.prune_top();
        Some(Due {
            deadline: entry.deadline,
            owner: entry.owner,
            action: entry.action,
        })
    }

    /// Earliest live deadline
    pub fn next_deadline(&self) -> Option<Seconds> {
        self.heap.peek().map(|Reverse(e)| e.deadline)
    }

    /// Number of live pending actions
    pub fn len(&self) -> usize {
        self.live_total
    }

    /// Whether no live action is pending
    pub fn is_empty(&self) -> bool {
        self.live_total == 0
    }

    /// Owners with epoch bookkeeping
    pub fn tracked_owners(&self) -> usize {
        self.epochs.len()
    }

    /// Live actions pending for one owner, earliest first
    pub fn pending_for(&self, owner: EntityHandle) -> Vec<(Seconds, ScheduledAction)> {
        let epoch = self.epoch_of(owner);
        let mut pending: Vec<_> = self
            .heap
            .iter()
            .filter(|Reverse(e)| e.owner == owner && e.epoch == epoch)
            .map(|Reverse(e)| (e.deadline, e.sequence, e.action))
            .collect();
        pending.sort_unstable();
        pending.into_iter().map(|(d, _, a)| (d, a)).collect()
    }

    /// Drop everything, including epochs
    pub fn clear(&mut self) {
        self.heap.clear();
        self.epochs.clear();
        self.live.clear();
        self.live_total = 0;
        self.next_sequence = 0;
    }

    fn epoch_of(&self, owner: EntityHandle) -> u32 {
        self.epochs.get(&owner).copied().unwrap_or(0)
    }

    fn is_live(&self, entry: &Entry) -> bool {
        entry.epoch == self.epoch_of(entry.owner)
    }

    fn release(&mut self, owner: EntityHandle) {
        if let Some(count) = self.live.get_mut(&owner) {
            *count -= 1;
            if *count == 0 {
                self.live.remove(&owner);
            }
        }
        self.live_total -= 1;
    }

    // Stale entries were already subtracted from the counts when cancelled.
    fn prune_top(&mut self) {
        while let Some(Reverse(top)) = self.heap.peek() {
            if self.is_live(top) {
                break;
            }
            self.heap.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(n: u32) -> EntityHandle {
        EntityHandle::new(n)
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut s = Scheduler::new();
        s.schedule(Seconds::new(1.0), h(1), ScheduledAction::CompleteIgnition);

        assert_eq!(s.pop_due(Seconds::new(0.999)), None);
        let due = s.pop_due(Seconds::new(1.0)).unwrap();
        assert_eq!(due.owner, h(1));
        assert_eq!(due.deadline, Seconds::new(1.0));
        assert!(s.is_empty());
    }

    #[test]
    fn test_equal_deadlines_pop_in_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(Seconds::new(2.0), h(3), ScheduledAction::SpreadAttempt);
        s.schedule(Seconds::new(1.0), h(2), ScheduledAction::CompleteIgnition);
        s.schedule(Seconds::new(2.0), h(1), ScheduledAction::CompleteIgnition);

        let order: Vec<_> = std::iter::from_fn(|| s.pop_due(Seconds::new(5.0)))
            .map(|d| d.owner)
            .collect();
        assert_eq!(order, vec![h(2), h(3), h(1)]);
    }

    #[test]
    fn test_cancel_discards_pending_actions() {
        let mut s = Scheduler::new();
        s.schedule(Seconds::new(1.0), h(1), ScheduledAction::CompleteIgnition);
        s.schedule(Seconds::new(1.0), h(2), ScheduledAction::CompleteIgnition);
        s.cancel_owner(h(1));

        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_due(Seconds::new(2.0)).map(|d| d.owner), Some(h(2)));
        assert_eq!(s.pop_due(Seconds::new(2.0)), None);
    }

    #[test]
    fn test_schedule_after_cancel_is_live() {
        let mut s = Scheduler::new();
        s.schedule(Seconds::new(1.0), h(1), ScheduledAction::CompleteIgnition);
        s.cancel_owner(h(1));
        s.schedule(Seconds::new(3.0), h(1), ScheduledAction::SpreadAttempt);

        assert_eq!(
            s.pending_for(h(1)),
            vec![(Seconds::new(3.0), ScheduledAction::SpreadAttempt)]
        );
        assert_eq!(s.next_deadline(), Some(Seconds::new(3.0)));
    }

    #[test]
    fn test_actions_scheduled_while_draining_run_if_due() {
        let mut s = Scheduler::new();
        s.schedule(Seconds::new(1.0), h(1), ScheduledAction::CompleteIgnition);

        let now = Seconds::new(10.0);
        let first = s.pop_due(now).unwrap();
        s.schedule(first.deadline + Seconds::new(3.0), h(1), ScheduledAction::SpreadAttempt);

        let second = s.pop_due(now).unwrap();
        assert_eq!(second.action, ScheduledAction::SpreadAttempt);
        assert_eq!(second.deadline, Seconds::new(4.0));
    }

    #[test]
    fn test_cancelled_top_does_not_hide_next_deadline() {
        let mut s = Scheduler::new();
        s.schedule(Seconds::new(1.0), h(1), ScheduledAction::CompleteIgnition);
        s.schedule(Seconds::new(2.0), h(1), ScheduledAction::SpreadAttempt);
        s.schedule(Seconds::new(5.0), h(2), ScheduledAction::SpreadAttempt);
        assert_eq!(s.len(), 3);

        s.cancel_owner(h(1));
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_deadline(), Some(Seconds::new(5.0)));
        assert!(s.pending_for(h(1)).is_empty());
    }

    #[test]
    fn test_forgotten_owners_leave_no_bookkeeping() {
        let mut s = Scheduler::new();
        for n in 0..100 {
            s.schedule(Seconds::new(f64::from(n)), h(n), ScheduledAction::CompleteIgnition);
            s.cancel_owner(h(n));
            s.schedule(Seconds::new(f64::from(n) + 0.5), h(n), ScheduledAction::SpreadAttempt);
        }
        s.schedule(Seconds::new(1_000.0), h(500), ScheduledAction::SpreadAttempt);
        assert_eq!(s.len(), 101);
        assert_eq!(s.tracked_owners(), 100);

        for n in 0..100 {
            s.forget_owner(h(n));
        }
        assert_eq!(s.tracked_owners(), 0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_deadline(), Some(Seconds::new(1_000.0)));
        assert_eq!(s.pop_due(Seconds::new(999.0)), None);
        assert_eq!(s.pop_due(Seconds::new(1_000.0)).map(|d| d.owner), Some(h(500)));
        assert!(s.is_empty());
    }

    #[test]
    fn test_live_count_tracks_pops() {
        let mut s = Scheduler::new();
        s.schedule(Seconds::new(1.0), h(1), ScheduledAction::CompleteIgnition);
        s.schedule(Seconds::new(2.0), h(1), ScheduledAction::SpreadAttempt);
        s.schedule(Seconds::new(3.0), h(2), ScheduledAction::SpreadAttempt);

        assert!(s.pop_due(Seconds::new(1.5)).is_some());
        assert_eq!(s.len(), 2);
        s.cancel_owner(h(1));
        assert_eq!(s.len(), 1);
        s.cancel_owner(h(1));
        assert_eq!(s.len(), 1);
        assert!(s.pop_due(Seconds::new(3.0)).is_some());
        assert!(s.is_empty());
        assert_eq!(s.next_deadline(), None);
    }
}
