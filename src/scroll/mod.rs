//! Scroll tracking module
//!
//! Derives the floating navigation's visibility and the active section from
//! the scroll position.
//!
//! # Active Section Rule
//!
//! Sections are scanned in reverse declared order; the first one whose
//! viewport-relative top is at or above the activation offset (200px by
//! default) becomes active. Scanning backwards makes the section scrolled
//! past most recently win. When nothing qualifies the previous active section
//! is kept; it is never reset to "none".
//!
//! The rule itself is the pure function [`resolve_active_section`]; the
//! tracker only gathers boundaries from a [`SectionGeometry`] and applies the
//! retention rule.

pub mod tracker;

pub use tracker::{
    ScrollTracker, ScrollUpdate, Section, SectionBoundary, SectionGeometry,
    resolve_active_section,
};
