//! Navigation items, mobile menu and anchor scrolling

use crate::config::{NavItem, TimingPreferences};
use crate::error::{FolioError, Result};
use crate::layout::DocumentLayout;
use std::time::Duration;
use tracing::debug;

/// Request for the page shell to scroll
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    /// Target section id
    pub section: String,
    /// Scroll offset that puts the section's top at the viewport origin
    pub target_y: f64,
    /// Animate the scroll
    pub smooth: bool,
}

/// Navigation surface state
#[derive(Debug)]
pub struct Navigation {
    items: Vec<NavItem>,
    mobile_menu_open: bool,
    item_stagger: Duration,
}

impl Navigation {
    /// Create the navigation with the mobile menu closed
    pub fn new(items: Vec<NavItem>, timing: &TimingPreferences) -> Self {
        Self {
            items,
            mobile_menu_open: false,
            item_stagger: Duration::from_millis(timing.mobile_menu_stagger_ms),
        }
    }

    /// Navigation items
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Whether the mobile menu is open
    pub fn is_mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    /// Open or close the mobile menu. Returns the new state.
    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }

    /// Close the mobile menu. Returns `true` if it was open.
    pub fn close_mobile_menu(&mut self) -> bool {
        std::mem::replace(&mut self.mobile_menu_open, false)
    }

    /// Entrance delay of mobile menu item `index`
    pub fn item_entrance_delay(&self, index: usize) -> Duration {
        self.item_stagger
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Smooth-scroll so section `id` lines up with the viewport origin.
    ///
    /// Always closes the mobile menu, even when the section is missing.
    pub fn scroll_to_section(&mut self, id: &str, layout: &DocumentLayout) -> Result<ScrollRequest> {
        self.close_mobile_menu();

        let target_y = layout
            .section_offset(id)
            .ok_or_else(|| FolioError::MissingElement(id.to_string()))?;

        debug!("Scrolling to '{}' at {}", id, target_y);
        Ok(ScrollRequest {
            section: id.to_string(),
            target_y,
            smooth: true,
        })
    }
}
