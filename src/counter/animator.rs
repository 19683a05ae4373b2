//! Timed integer counter

use crate::config::{StatConfig, TimingPreferences};
use crate::error::FolioError;
use crate::timer::{Scheduler, TimerId};
use std::time::Duration;
use tracing::{debug, warn};

/// Lifecycle of a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    /// Waiting for the reveal signal
    Idle,
    /// Revealed; waiting out the start delay
    Delaying,
    /// Incrementing on the tick interval
    Ticking,
    /// Reached the target
    Done,
    /// Torn down; ignores everything
    Unmounted,
}

/// Counts from 0 to a target value, one step per tick
#[derive(Debug)]
pub struct CounterAnimator {
    id: String,
    target: u32,
    current: u32,
    duration: Duration,
    start_delay: Duration,
    prefix: String,
    suffix: String,
    phase: CounterPhase,
    timer: Option<TimerId>,
}

impl CounterAnimator {
    /// Create the counter for the stat at position `index`
    ///
    /// The start delay is `index × counter_stagger_ms`. A negative target is
    /// clamped to 0 with a warning.
    pub fn new(stat: &StatConfig, index: usize, timing: &TimingPreferences) -> Self {
        let target = clamp_target(stat);
        let index = u32::try_from(index).unwrap_or(u32::MAX);

        Self {
            id: stat.id.clone(),
            target,
            current: 0,
            duration: Duration::from_millis(timing.counter_duration_ms),
            start_delay: Duration::from_millis(timing.counter_stagger_ms).saturating_mul(index),
            prefix: stat.display_prefix.clone().unwrap_or_default(),
            suffix: stat.suffix.clone(),
            phase: CounterPhase::Idle,
            timer: None,
        }
    }

    /// Stat entity id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current counted value
    pub fn value(&self) -> u32 {
        self.current
    }

    /// Target value
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Current phase
    pub fn phase(&self) -> CounterPhase {
        self.phase
    }

    /// Delay between the reveal signal and the first tick
    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    /// Whether a timer is held
    pub fn has_live_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Interval between ticks: `duration / target`, at least 1ms
    pub fn tick_interval(&self) -> Duration {
        let duration_ms = u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX);
        let per_step = duration_ms / u64::from(self.target.max(1));
        Duration::from_millis(per_step.max(1))
    }

    /// Rendered value with prefix and suffix
    pub fn display(&self) -> String {
        format!("{}{}{}", self.prefix, self.current, self.suffix)
    }

    /// Handle the reveal signal. Only the first signal starts the count.
    pub fn on_reveal(&mut self, scheduler: &mut impl Scheduler) {
        if self.phase != CounterPhase::Idle {
            return;
        }

        if self.target == 0 {
            debug!("Counter '{}' settles at 0", self.id);
            self.phase = CounterPhase::Done;
            return;
        }

        self.timer = Some(scheduler.schedule_once(self.start_delay));
        self.phase = CounterPhase::Delaying;
        debug!(
            "Counter '{}' starts in {:?} (target {})",
            self.id, self.start_delay, self.target
        );
    }

    /// Handle a fired timer. Returns the new value if it changed.
    pub fn on_timer(&mut self, id: TimerId, scheduler: &mut impl Scheduler) -> Option<u32> {
        if self.timer != Some(id) {
            debug!("Counter '{}' ignoring stale timer {:?}", self.id, id);
            return None;
        }

        match self.phase {
            CounterPhase::Delaying => {
                // The start delay is one-shot and already consumed.
                self.timer = Some(scheduler.schedule_repeating(self.tick_interval()));
                self.phase = CounterPhase::Ticking;
                None
            }
            CounterPhase::Ticking => {
                self.current += 1;
                if self.current >= self.target {
                    self.current = self.target;
                    self.release(scheduler);
                    self.phase = CounterPhase::Done;
                    debug!("Counter '{}' reached {}", self.id, self.target);
                }
                Some(self.current)
            }
            CounterPhase::Idle | CounterPhase::Done | CounterPhase::Unmounted => None,
        }
    }

    /// Cancel any pending timer and ignore all further signals
    pub fn unmount(&mut self, scheduler: &mut impl Scheduler) {
        self.release(scheduler);
        self.phase = CounterPhase::Unmounted;
    }

    fn release(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
    }
}

fn clamp_target(stat: &StatConfig) -> u32 {
    match u32::try_from(stat.target_value) {
        Ok(value) => value,
        Err(_) if stat.target_value < 0 => {
            let error = FolioError::MalformedStatConfig {
                id: stat.id.clone(),
                value: stat.target_value,
            };
            warn!("{}; clamping to 0", error);
            0
        }
        Err(_) => u32::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerQueue;

    fn stat(target: i64) -> StatConfig {
        StatConfig {
            id: "clients".to_string(),
            target_value: target,
            suffix: "+".to_string(),
            display_prefix: None,
            label: String::new(),
        }
    }

    /// Advance the clock, collecting every value the counter emits
    fn run(counter: &mut CounterAnimator, queue: &mut TimerQueue<()>, until_ms: u64) -> Vec<u32> {
        let until = Duration::from_millis(until_ms);
        let mut emitted = Vec::new();
        while let Some(fired) = queue.pop_due(until) {
            assert!(queue.live_count(()) <= 1);
            if let Some(value) = counter.on_timer(fired.id, &mut queue.scoped(())) {
                emitted.push(value);
            }
        }
        queue.settle(until);
        emitted
    }

    #[test]
    fn test_counts_to_five() {
        let timing = TimingPreferences::default();
        let mut counter = CounterAnimator::new(&stat(5), 0, &timing);
        let mut queue = TimerQueue::new();

        let mut seen = vec![counter.value()];
        counter.on_reveal(&mut queue.scoped(()));
        seen.extend(run(&mut counter, &mut queue, 10_000));

        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(counter.phase(), CounterPhase::Done);
        assert!(!counter.has_live_timer());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tick_timing() {
        let timing = TimingPreferences::default();
        let mut counter = CounterAnimator::new(&stat(5), 2, &timing);
        let mut queue = TimerQueue::new();
        assert_eq!(counter.start_delay(), Duration::from_millis(400));
        assert_eq!(counter.tick_interval(), Duration::from_millis(400));

        counter.on_reveal(&mut queue.scoped(()));
        assert!(run(&mut counter, &mut queue, 799).is_empty());
        assert_eq!(run(&mut counter, &mut queue, 800), vec![1]);
        assert_eq!(run(&mut counter, &mut queue, 2400), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_zero_target_never_ticks() {
        let timing = TimingPreferences::default();
        let mut counter = CounterAnimator::new(&stat(0), 1, &timing);
        let mut queue = TimerQueue::new();

        counter.on_reveal(&mut queue.scoped(()));
        assert_eq!(counter.phase(), CounterPhase::Done);
        assert_eq!(counter.value(), 0);
        assert!(queue.is_empty());
        assert!(run(&mut counter, &mut queue, 10_000).is_empty());
    }

    #[test]
    fn test_negative_target_is_clamped() {
        let counter = CounterAnimator::new(&stat(-12), 0, &TimingPreferences::default());
        assert_eq!(counter.target(), 0);
    }

    #[test]
    fn test_large_target_ticks_every_millisecond() {
        let counter = CounterAnimator::new(&stat(5000), 0, &TimingPreferences::default());
        assert_eq!(counter.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_second_reveal_is_ignored() {
        let timing = TimingPreferences::default();
        let mut counter = CounterAnimator::new(&stat(3), 0, &timing);
        let mut queue = TimerQueue::new();

        counter.on_reveal(&mut queue.scoped(()));
        counter.on_reveal(&mut queue.scoped(()));
        assert_eq!(queue.live_count(()), 1);

        run(&mut counter, &mut queue, 10_000);
        counter.on_reveal(&mut queue.scoped(()));
        assert!(queue.is_empty());
        assert_eq!(counter.value(), 3);
    }

    #[test]
    fn test_unmount_mid_count() {
        let timing = TimingPreferences::default();
        let mut counter = CounterAnimator::new(&stat(20), 0, &timing);
        let mut queue = TimerQueue::new();

        counter.on_reveal(&mut queue.scoped(()));
        run(&mut counter, &mut queue, 500);
        let frozen = counter.value();
        assert!(frozen > 0 && frozen < 20);

        counter.unmount(&mut queue.scoped(()));
        assert!(queue.is_empty());
        assert!(run(&mut counter, &mut queue, 10_000).is_empty());
        assert_eq!(counter.value(), frozen);
        assert_eq!(counter.phase(), CounterPhase::Unmounted);
    }

    #[test]
    fn test_display_decorations() {
        let mut config = stat(12);
        config.suffix = "Cr".to_string();
        config.display_prefix = Some("₹".to_string());
        let counter = CounterAnimator::new(&config, 0, &TimingPreferences::default());
        assert_eq!(counter.display(), "₹0Cr");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: values climb by exactly one and end on the target
            #[test]
            fn counter_is_monotonic_and_exact(target in 0i64..200, index in 0usize..6) {
                let timing = TimingPreferences::default();
                let mut counter = CounterAnimator::new(&stat(target), index, &timing);
                let mut queue = TimerQueue::new();

                counter.on_reveal(&mut queue.scoped(()));
                let emitted = run(&mut counter, &mut queue, 60_000);

                let expected: Vec<u32> = (1..=u32::try_from(target).unwrap()).collect();
                prop_assert_eq!(emitted, expected);
                prop_assert_eq!(counter.phase(), CounterPhase::Done);
                prop_assert!(queue.is_empty());
            }
        }
    }
}
