//! Timer facility of the page event loop
//!
//! # Overview
//!
//! Every animation in the page is driven by timers: counter start delays and
//! ticks, carousel auto-advance, staggered child reveals. This module gives
//! them one deterministic home:
//!
//! - **Virtual clock**: time is a `Duration` since mount, advanced explicitly
//!   by the host. Tests drive it directly; the real-time loop maps wall-clock
//!   time onto it.
//! - **Owned timers**: every timer is tagged with an owner key. Controllers
//!   schedule through a [`ScopedScheduler`] and never see other owners' timers.
//! - **Explicit cancellation**: a cancelled timer is never delivered, even if
//!   its deadline has already passed within the current advance.
//!
//! # Delivery
//!
//! ```text
//! host clock → TimerQueue::pop_due → FiredTimer { id, owner } → controller.on_timer(id)
//! ```
//!
//! Timers are popped one at a time so that whatever a controller cancels or
//! re-arms while handling one timer is already in effect for the next.

pub mod queue;

pub use queue::{FiredTimer, ScopedScheduler, Scheduler, TimerId, TimerQueue};
