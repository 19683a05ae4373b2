//! Configuration management module
//!
//! This module handles loading page configuration: sections, navigation
//! items, stat counters, testimonials, reveal entities and timing. The
//! configuration is read-only; it is loaded once at mount from
//! `$FOLIOSYNC_CONFIG` (or `./foliosync.json`) and falls back to the
//! built-in portfolio content.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{
    NavItem, PageConfig, RevealEntityConfig, SectionConfig, StatConfig, StyleVariant,
    Testimonial, TimingPreferences,
};
