//! Counter animation module
//!
//! Counts a stat from 0 up to its target once the stats section has been
//! revealed.
//!
//! # Timeline
//!
//! ```text
//! reveal ──(index × stagger)──▶ tick ─(duration/target)─▶ tick ... ▶ target, timer released
//! ```
//!
//! Each counter owns at most one timer at a time: the start-delay timeout,
//! then the tick interval. A target of 0 settles immediately with no timer.

pub mod animator;

pub use animator::{CounterAnimator, CounterPhase};
