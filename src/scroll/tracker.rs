//! Scroll-spy implementation

use crate::config::{SectionConfig, TimingPreferences};
use crate::error::FolioError;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::debug;

/// A registered page section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Stable id
    pub id: String,
    /// Position in the page, from 0
    pub declared_order: usize,
    /// Anchor rendered by the page shell
    pub anchor: String,
}

/// A section id paired with its viewport-relative top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBoundary<'a> {
    /// Section id
    pub id: &'a str,
    /// Top edge relative to the viewport origin, in pixels
    pub top: f64,
}

/// Read access to section positions
pub trait SectionGeometry {
    /// Viewport-relative top of section `id`, or `None` if it is not mounted
    fn section_top(&self, id: &str) -> Option<f64>;
}

impl<S: BuildHasher> SectionGeometry for HashMap<String, f64, S> {
    fn section_top(&self, id: &str) -> Option<f64> {
        self.get(id).copied()
    }
}

/// Pick the active section from boundaries given in declared order.
///
/// Returns the last section whose top is at or above `offset`, or `None`
/// when no section qualifies.
pub fn resolve_active_section<'a>(boundaries: &[SectionBoundary<'a>], offset: f64) -> Option<&'a str> {
    boundaries
        .iter()
        .rev()
        .find(|boundary| boundary.top <= offset)
        .map(|boundary| boundary.id)
}

/// What a scroll event changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollUpdate {
    /// Navigation visibility flipped
    pub nav_visibility_changed: bool,
    /// A different section became active
    pub active_section_changed: bool,
}

impl ScrollUpdate {
    /// Whether anything observable changed
    pub fn is_changed(&self) -> bool {
        self.nav_visibility_changed || self.active_section_changed
    }
}

/// Scroll-spy state: nav visibility and active section
#[derive(Debug)]
pub struct ScrollTracker {
    sections: Vec<Section>,
    nav_visible: bool,
    active: Option<String>,
    nav_visible_after: f64,
    activation_offset: f64,
}

impl ScrollTracker {
    /// Create a tracker over `sections` in declared order.
    ///
    /// The first declared section starts active.
    pub fn new(sections: &[SectionConfig], timing: &TimingPreferences) -> Self {
        let sections: Vec<Section> = sections
            .iter()
            .enumerate()
            .map(|(declared_order, config)| Section {
                id: config.id.clone(),
                declared_order,
                anchor: config.anchor(),
            })
            .collect();
        let active = sections.first().map(|s| s.id.clone());

        Self {
            sections,
            nav_visible: false,
            active,
            nav_visible_after: timing.nav_visible_after_px,
            activation_offset: timing.active_section_offset_px,
        }
    }

    /// Registered sections in declared order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Whether `id` is a registered section
    pub fn contains(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s.id == id)
    }

    /// Whether the floating navigation is shown
    pub fn nav_visible(&self) -> bool {
        self.nav_visible
    }

    /// Active section id
    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Handle a scroll position change.
    ///
    /// Sections missing from `geometry` are skipped.
    pub fn on_scroll(&mut self, scroll_y: f64, geometry: &impl SectionGeometry) -> ScrollUpdate {
        let mut update = ScrollUpdate::default();

        let nav_visible = scroll_y > self.nav_visible_after;
        if nav_visible != self.nav_visible {
            self.nav_visible = nav_visible;
            update.nav_visibility_changed = true;
        }

        let boundaries: SmallVec<[SectionBoundary<'_>; 8]> = self
            .sections
            .iter()
            .filter_map(|section| match geometry.section_top(&section.id) {
                Some(top) => Some(SectionBoundary {
                    id: &section.id,
                    top,
                }),
                None => {
                    debug!("{}", FolioError::MissingElement(section.id.clone()));
                    None
                }
            })
            .collect();

        if let Some(id) = resolve_active_section(&boundaries, self.activation_offset)
            && self.active.as_deref() != Some(id)
        {
            debug!("Active section: {:?} -> {}", self.active, id);
            self.active = Some(id.to_string());
            update.active_section_changed = true;
        }

        update
    }
}
