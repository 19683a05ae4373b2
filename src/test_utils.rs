#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared test utilities for `foliosync` unit tests.
//!
//! This module provides common test infrastructure used across multiple test modules.
//! It is only compiled during testing (`#[cfg(test)]`).

use crate::config::PageConfig;
use crate::layout::{DocumentLayout, Rect};
use crate::page::{PageController, PageEvent, PageState};
use std::sync::mpsc;
use tempfile::TempDir;

/// Capacity of the renderer channel in tests
const STATE_CHANNEL_CAPACITY: usize = 256;

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Geometry of the default page in an 800px viewport.
///
/// Sections start every 900px; each reveal entity sits inside its section.
pub fn portfolio_layout() -> DocumentLayout {
    DocumentLayout::new(800.0)
        .with_section("hero", 0.0)
        .with_section("about", 900.0)
        .with_section("stats", 1800.0)
        .with_section("projects", 2700.0)
        .with_section("blog", 3600.0)
        .with_section("contact", 4500.0)
        .with_entity("about-content", Rect::new(1000.0, 600.0))
        .with_entity("stats-header", Rect::new(1850.0, 200.0))
        .with_entity("stats-grid", Rect::new(2100.0, 400.0))
        .with_entity("projects-grid", Rect::new(2800.0, 700.0))
        .with_entity("testimonials-thumbnails", Rect::new(3400.0, 150.0))
        .with_entity("blog-grid", Rect::new(3700.0, 600.0))
        .with_entity("contact-content", Rect::new(4600.0, 600.0))
}

/// Mount a page with fresh channels
pub fn mount_page(
    config: PageConfig,
) -> (
    PageController,
    mpsc::Sender<PageEvent>,
    mpsc::Receiver<PageState>,
) {
    let (event_tx, event_rx) = mpsc::channel();
    let (state_tx, state_rx) = mpsc::sync_channel(STATE_CHANNEL_CAPACITY);
    (PageController::new(config, event_rx, state_tx), event_tx, state_rx)
}

/// Collect every state update sent so far
pub fn drain_states(receiver: &mpsc::Receiver<PageState>) -> Vec<PageState> {
    receiver.try_iter().collect()
}
