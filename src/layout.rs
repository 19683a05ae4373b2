//! Page geometry reported by the page shell
//!
//! The shell reports absolute (document) positions once per layout; scroll
//! events then only carry the scroll offset. Viewport-relative section tops
//! and intersection ratios are derived here.

use crate::scroll::SectionGeometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vertical extent of an element in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top edge
    pub top: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rectangle
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Fraction of the element inside the viewport, 0.0 to 1.0
    pub fn intersection_ratio(&self, scroll_y: f64, viewport_height: f64) -> f64 {
        let view_top = scroll_y;
        let view_bottom = scroll_y + viewport_height.max(0.0);

        if self.height <= 0.0 {
            let inside = self.top >= view_top && self.top <= view_bottom;
            return if inside { 1.0 } else { 0.0 };
        }

        let overlap = self.bottom().min(view_bottom) - self.top.max(view_top);
        (overlap.max(0.0) / self.height).clamp(0.0, 1.0)
    }
}

/// Absolute geometry of the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Height of the visible window
    pub viewport_height: f64,
    /// Absolute top of each mounted section
    #[serde(default)]
    pub sections: HashMap<String, f64>,
    /// Absolute extent of each observed entity
    #[serde(default)]
    pub entities: HashMap<String, Rect>,
}

impl DocumentLayout {
    /// Empty layout with the given viewport height
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Add a section at an absolute top
    #[must_use]
    pub fn with_section(mut self, id: impl Into<String>, top: f64) -> Self {
        self.sections.insert(id.into(), top);
        self
    }

    /// Add an observed entity
    #[must_use]
    pub fn with_entity(mut self, id: impl Into<String>, rect: Rect) -> Self {
        self.entities.insert(id.into(), rect);
        self
    }

    /// Absolute top of section `id`
    pub fn section_offset(&self, id: &str) -> Option<f64> {
        self.sections.get(id).copied()
    }

    /// Intersection ratio of entity `id` at `scroll_y`
    pub fn entity_ratio(&self, id: &str, scroll_y: f64) -> Option<f64> {
        self.entities
            .get(id)
            .map(|rect| rect.intersection_ratio(scroll_y, self.viewport_height))
    }

    /// Geometry as seen from `scroll_y`
    pub fn at_scroll(&self, scroll_y: f64) -> ViewportSnapshot<'_> {
        ViewportSnapshot {
            layout: self,
            scroll_y,
        }
    }
}

/// A layout seen from one scroll offset
#[derive(Debug, Clone, Copy)]
pub struct ViewportSnapshot<'a> {
    layout: &'a DocumentLayout,
    scroll_y: f64,
}

impl SectionGeometry for ViewportSnapshot<'_> {
    fn section_top(&self, id: &str) -> Option<f64> {
        self.layout
            .section_offset(id)
            .map(|top| top - self.scroll_y)
    }
}
