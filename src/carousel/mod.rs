//! Testimonial carousel module
//!
//! # State Machine
//!
//! The carousel is always auto-advancing; manual selection is a transient
//! action, not a paused state:
//!
//! 1. **Timer fire**: `index = (index + 1) mod len`
//! 2. **Select k**: cancel the running timer, set `index = k`, arm a fresh
//!    timer of the full interval. Auto-advance resumes from k.
//!
//! Cancel and re-arm happen inside one `&mut self` call, so two timers are
//! never live at the same time.

pub mod controller;

pub use controller::CarouselController;
