//! Auto-advancing carousel with manual override

use crate::config::Testimonial;
use crate::error::{FolioError, Result};
use crate::timer::{Scheduler, TimerId};
use std::time::Duration;
use tracing::debug;

/// Rotation state over an ordered list of testimonials
#[derive(Debug)]
pub struct CarouselController {
    items: Vec<Testimonial>,
    current: usize,
    interval: Duration,
    timer: Option<TimerId>,
    mounted: bool,
}

impl CarouselController {
    /// Create the carousel at index 0. No timer runs until `mount`.
    pub fn new(items: Vec<Testimonial>, interval: Duration) -> Self {
        Self {
            items,
            current: 0,
            interval,
            timer: None,
            mounted: false,
        }
    }

    /// Arm the auto-advance timer. An empty carousel never arms one.
    pub fn mount(&mut self, scheduler: &mut impl Scheduler) {
        self.mounted = true;
        if self.items.is_empty() {
            debug!("Carousel has no items; auto-advance disabled");
            return;
        }
        self.rearm(scheduler);
    }

    /// Current index, `None` when there are no items
    pub fn current_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.current)
    }

    /// Testimonial on display
    pub fn current_item(&self) -> Option<&Testimonial> {
        self.items.get(self.current)
    }

    /// All items
    pub fn items(&self) -> &[Testimonial] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the auto-advance timer is armed
    pub fn has_live_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Handle a fired timer. Returns the new index on advance.
    pub fn on_timer(&mut self, id: TimerId) -> Option<usize> {
        if self.timer != Some(id) || self.items.is_empty() {
            debug!("Carousel ignoring stale timer {:?}", id);
            return None;
        }

        self.current = (self.current + 1) % self.items.len();
        debug!("Carousel advanced to {}", self.current);
        Some(self.current)
    }

    /// Show item `index` and restart the auto-advance interval.
    ///
    /// Out-of-range selections are rejected and leave both the index and the
    /// running timer untouched.
    pub fn select(&mut self, index: usize, scheduler: &mut impl Scheduler) -> Result<usize> {
        if index >= self.items.len() {
            return Err(FolioError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        if !self.mounted {
            return Err(FolioError::MissingElement("carousel".to_string()));
        }

        self.current = index;
        self.rearm(scheduler);
        debug!("Carousel manually set to {}", index);
        Ok(index)
    }

    /// Cancel the auto-advance timer and ignore further selections
    pub fn unmount(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        self.mounted = false;
    }

    fn rearm(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        self.timer = Some(scheduler.schedule_repeating(self.interval));
    }
}
