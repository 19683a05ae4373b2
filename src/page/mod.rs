//! Page controller module
//!
//! This module coordinates the scroll tracker, navigation, reveal groups,
//! stat counters and carousel, implementing the page's event handling.
//!
//! # Overview
//!
//! The page controller is the single owner of every controller instance and
//! of the host facilities they share:
//! - **Receives page events** (layout, scroll, intersection, clicks) from the page shell
//! - **Fires due timers** from the timer queue in deadline order
//! - **Wires reveal signals** to the stat counters
//! - **Sends state snapshots** to the renderer after observable changes
//!
//! # Event Flow
//!
//! ```text
//! page shell → PageEvent → PageController → ScrollTracker / RevealGroup / CarouselController
//!                               ↑   ↓
//!                        TimerQueue  PageState → renderer
//! ```
//!
//! # Scheduling
//!
//! Every event and every timer is handled to completion, one at a time,
//! under a single lock. Timers due before an event are fired before the
//! event is handled. After `UnmountAll` (or `Shutdown`) every timer and
//! observer has been released and no further event changes the state.

pub mod page_controller;

pub use page_controller::{
    CAROUSEL_ENTITY, CounterView, PageController, PageEvent, PageState, RevealView, TimerOwner,
};
