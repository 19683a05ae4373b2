//! Deterministic timer queue
//!
//! Pending timers are ordered by `(deadline, sequence)`, so timers due at the
//! same instant fire in the order they were armed.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Shortest period a repeating timer may have
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Scheduling interface handed to controllers
///
/// Controllers arm and cancel their own timers through this trait; the
/// fired timer is routed back to them by the page.
pub trait Scheduler {
    /// Current virtual time
    fn now(&self) -> Duration;

    /// Arm a timer that fires once after `delay`
    fn schedule_once(&mut self, delay: Duration) -> TimerId;

    /// Arm a timer that fires every `period` until cancelled
    fn schedule_repeating(&mut self, period: Duration) -> TimerId;

    /// Cancel a timer. Returns `false` if it was not pending.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer<K> {
    /// Timer handle
    pub id: TimerId,
    /// Owner the timer was armed for
    pub owner: K,
    /// Deadline the timer fired at
    pub at: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Entry<K> {
    id: TimerId,
    owner: K,
    period: Option<Duration>,
}

type Slot = (Duration, u64);

/// Pending timers keyed by owner
#[derive(Debug)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    pending: BTreeMap<Slot, Entry<K>>,
    slots: HashMap<TimerId, Slot>,
}

impl<K: Copy + Eq> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> TimerQueue<K> {
    /// Create an empty queue at time zero
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            pending: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Scheduler that tags every timer it arms with `owner`
    pub fn scoped(&mut self, owner: K) -> ScopedScheduler<'_, K> {
        ScopedScheduler { queue: self, owner }
    }

    fn insert(&mut self, owner: K, deadline: Duration, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.place(Entry { id, owner, period }, deadline);
        id
    }

    fn place(&mut self, entry: Entry<K>, deadline: Duration) {
        let slot = (deadline, self.next_seq);
        self.next_seq += 1;
        self.slots.insert(entry.id, slot);
        self.pending.insert(slot, entry);
    }

    /// Cancel a pending timer. Returns `false` if it was not pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.slots.remove(&id) {
            Some(slot) => self.pending.remove(&slot).is_some(),
            None => false,
        }
    }

    /// Cancel every timer armed for `owner`, returning how many were pending
    pub fn cancel_owner(&mut self, owner: K) -> usize {
        let ids: Vec<TimerId> = self
            .pending
            .values()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.id)
            .collect();
        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }

    /// Whether `id` is still pending
    pub fn is_live(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of pending timers armed for `owner`
    pub fn live_count(&self, owner: K) -> usize {
        self.pending.values().filter(|e| e.owner == owner).count()
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timer is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// The clock moves to the timer's deadline. Repeating timers are re-armed
    /// for their next period before being returned, so the owner can cancel
    /// them from its handler.
    pub fn pop_due(&mut self, until: Duration) -> Option<FiredTimer<K>> {
        let (&slot, _) = self.pending.iter().next()?;
        if slot.0 > until {
            return None;
        }

        let entry = self.pending.remove(&slot)?;
        self.slots.remove(&entry.id);
        let at = slot.0;
        self.now = self.now.max(at);

        if let Some(period) = entry.period {
            self.place(entry, at + period);
        }

        Some(FiredTimer {
            id: entry.id,
            owner: entry.owner,
            at,
        })
    }

    /// Move the clock to `until` once every due timer has been popped
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

/// [`Scheduler`] bound to one owner
#[derive(Debug)]
pub struct ScopedScheduler<'a, K> {
    queue: &'a mut TimerQueue<K>,
    owner: K,
}

impl<K: Copy + Eq> Scheduler for ScopedScheduler<'_, K> {
    fn now(&self) -> Duration {
        self.queue.now
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        let deadline = self.queue.now + delay;
        self.queue.insert(self.owner, deadline, None)
    }

    fn schedule_repeating(&mut self, period: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        let deadline = self.queue.now + period;
        self.queue.insert(self.owner, deadline, Some(period))
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.cancel(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn drain(queue: &mut TimerQueue<u8>, until: Duration) -> Vec<(u8, u64)> {
        let mut fired = Vec::new();
        while let Some(timer) = queue.pop_due(until) {
            fired.push((timer.owner, u64::try_from(timer.at.as_millis()).unwrap()));
        }
        queue.settle(until);
        fired
    }

    #[test]
    fn test_once_fires_at_deadline() {
        let mut queue = TimerQueue::new();
        queue.scoped(1).schedule_once(ms(200));

        assert!(drain(&mut queue, ms(199)).is_empty());
        assert_eq!(drain(&mut queue, ms(200)), vec![(1, 200)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_same_deadline_fires_in_arming_order() {
        let mut queue = TimerQueue::new();
        queue.scoped(3).schedule_once(ms(100));
        queue.scoped(1).schedule_once(ms(100));
        queue.scoped(2).schedule_once(ms(50));

        assert_eq!(
            drain(&mut queue, ms(100)),
            vec![(2, 50), (3, 100), (1, 100)]
        );
    }

    #[test]
    fn test_repeating_rearms_until_cancelled() {
        let mut queue = TimerQueue::new();
        let id = queue.scoped(7).schedule_repeating(ms(100));

        assert_eq!(
            drain(&mut queue, ms(350)),
            vec![(7, 100), (7, 200), (7, 300)]
        );
        assert!(queue.is_live(id));
        assert_eq!(queue.next_deadline(), Some(ms(400)));

        assert!(queue.cancel(id));
        assert!(drain(&mut queue, ms(1000)).is_empty());
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut queue = TimerQueue::new();
        queue.scoped(0).schedule_repeating(Duration::ZERO);

        assert_eq!(drain(&mut queue, ms(3)).len(), 3);
    }

    #[test]
    fn test_cancel_between_pops_suppresses_delivery() {
        let mut queue = TimerQueue::new();
        queue.scoped(1).schedule_once(ms(10));
        let second = queue.scoped(2).schedule_once(ms(20));

        let first = queue.pop_due(ms(50)).unwrap();
        assert_eq!(first.owner, 1);
        assert!(queue.cancel(second));
        assert!(queue.pop_due(ms(50)).is_none());
    }

    #[test]
    fn test_scheduling_is_relative_to_clock() {
        let mut queue = TimerQueue::new();
        queue.settle(ms(1000));
        queue.scoped(4).schedule_once(ms(5));

        assert_eq!(queue.next_deadline(), Some(ms(1005)));
        assert_eq!(queue.scoped(4).now(), ms(1000));
    }

    #[test]
    fn test_cancel_owner() {
        let mut queue = TimerQueue::new();
        queue.scoped(1).schedule_once(ms(10));
        queue.scoped(1).schedule_repeating(ms(10));
        queue.scoped(2).schedule_once(ms(10));

        assert_eq!(queue.live_count(1), 2);
        assert_eq!(queue.cancel_owner(1), 2);
        assert_eq!(queue.live_count(1), 0);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_cancel_unknown_timer() {
        let mut queue = TimerQueue::<u8>::new();
        let id = queue.scoped(1).schedule_once(ms(1));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
    }

    #[test]
    fn test_settle_never_moves_backwards() {
        let mut queue = TimerQueue::<u8>::new();
        queue.settle(ms(500));
        queue.settle(ms(100));
        assert_eq!(queue.now(), ms(500));
    }
}
