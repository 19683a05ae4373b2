//! Floating navigation module
//!
//! Consumes the scroll tracker's output (active section, visibility) and
//! exposes the `scroll_to_section` intent back to the page shell.

pub mod navigation;

pub use navigation::{Navigation, ScrollRequest};
