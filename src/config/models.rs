//! Configuration data models
//!
//! This module defines the data structures used for page configuration.
//! `PageConfig::default()` carries the content of the portfolio site itself.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// A navigable page section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Stable section id, shared by the scroll tracker and navigation
    pub id: String,
    /// Anchor the page shell renders for this section (defaults to `#id`)
    #[serde(default)]
    pub anchor: Option<String>,
}

impl SectionConfig {
    /// Create a section whose anchor is derived from its id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            anchor: None,
        }
    }

    /// Anchor used to locate the section in the page
    pub fn anchor(&self) -> String {
        self.anchor
            .clone()
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

/// Navigation entry mirroring a section id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Section id this item scrolls to
    pub id: String,
    /// Visible label
    pub label: String,
    /// Icon reference resolved by the page shell
    pub icon: String,
}

/// Numeric counter shown in the stats section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatConfig {
    /// Stat entity id
    pub id: String,
    /// Value the counter climbs to. Negative values are clamped to 0 at mount.
    pub target_value: i64,
    /// Text rendered after the number
    #[serde(default)]
    pub suffix: String,
    /// Text rendered before the number
    #[serde(default)]
    pub display_prefix: Option<String>,
    /// Caption shown under the number
    #[serde(default)]
    pub label: String,
}

/// Carousel entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    /// Quoted feedback
    pub quote: String,
    /// Person quoted
    pub name: String,
    /// Their role
    pub role: String,
    /// Their company
    pub company: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    /// Avatar image location
    pub avatar_url: String,
}

/// One side of a hidden/visible style pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleVariant {
    /// Opacity, 0.0 to 1.0
    pub opacity: f64,
    /// Horizontal offset in pixels
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical offset in pixels
    #[serde(default)]
    pub offset_y: f64,
    /// Scale factor
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl StyleVariant {
    /// Default entrance start: transparent, pushed 50px down
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        offset_x: 0.0,
        offset_y: 50.0,
        scale: 1.0,
    };

    /// Default entrance end: fully shown in place
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };
}

/// An element that animates in when it enters the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealEntityConfig {
    /// Entity id
    pub id: String,
    /// Fraction of the element that must be visible, 0.0 to 1.0.
    /// A threshold of 0 means any overlap.
    #[serde(default)]
    pub threshold: f64,
    /// Reveal once and stop observing
    #[serde(default = "default_once")]
    pub once: bool,
    /// Number of staggered children revealed after the parent
    #[serde(default)]
    pub children: usize,
    /// Delay between consecutive children in milliseconds
    #[serde(default)]
    pub stagger_ms: u64,
    /// Delay before the first child in milliseconds
    #[serde(default)]
    pub delay_children_ms: u64,
    /// Style while hidden
    #[serde(default = "default_hidden")]
    pub hidden: StyleVariant,
    /// Style once visible
    #[serde(default = "default_visible")]
    pub visible: StyleVariant,
}

fn default_once() -> bool {
    true
}

fn default_hidden() -> StyleVariant {
    StyleVariant::HIDDEN
}

fn default_visible() -> StyleVariant {
    StyleVariant::VISIBLE
}

impl RevealEntityConfig {
    /// One-shot reveal with no children
    pub fn new(id: impl Into<String>, threshold: f64) -> Self {
        Self {
            id: id.into(),
            threshold,
            once: true,
            children: 0,
            stagger_ms: 0,
            delay_children_ms: 0,
            hidden: StyleVariant::HIDDEN,
            visible: StyleVariant::VISIBLE,
        }
    }

    /// Add staggered children
    #[must_use]
    pub fn with_children(mut self, children: usize, stagger_ms: u64, delay_children_ms: u64) -> Self {
        self.children = children;
        self.stagger_ms = stagger_ms;
        self.delay_children_ms = delay_children_ms;
        self
    }
}

/// Timing and offset constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingPreferences {
    /// Scroll offset after which the floating navigation is shown
    pub nav_visible_after_px: f64,
    /// Viewport-relative top at or above which a section becomes active
    pub active_section_offset_px: f64,
    /// Total counter animation time in milliseconds
    pub counter_duration_ms: u64,
    /// Start delay added per stat index in milliseconds
    pub counter_stagger_ms: u64,
    /// Carousel auto-advance interval in milliseconds
    pub carousel_interval_ms: u64,
    /// Entrance delay per mobile menu item in milliseconds
    pub mobile_menu_stagger_ms: u64,
}

impl Default for TimingPreferences {
    fn default() -> Self {
        Self {
            nav_visible_after_px: 100.0,
            active_section_offset_px: 200.0,
            counter_duration_ms: 2000,
            counter_stagger_ms: 200,
            carousel_interval_ms: 5000,
            mobile_menu_stagger_ms: 50,
        }
    }
}

/// Top-level page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Sections in declared order
    pub sections: Vec<SectionConfig>,
    /// Navigation entries
    pub nav_items: Vec<NavItem>,
    /// Stat counters in display order
    pub stats: Vec<StatConfig>,
    /// Carousel items in display order
    pub testimonials: Vec<Testimonial>,
    /// Reveal entities
    pub reveals: Vec<RevealEntityConfig>,
    /// Reveal entity whose first reveal starts the stat counters
    pub counter_trigger: String,
    /// Timing constants
    pub timing: TimingPreferences,
}

impl PageConfig {
    /// Fix values that cannot be used as given.
    ///
    /// Duplicate section, reveal and stat ids are dropped (first declaration
    /// wins) and testimonial ratings are clamped to 1..=5. Negative stat
    /// targets are left for the counters to clamp so the warning names the
    /// stat.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        dedup_by_id(&mut self.sections, "section", |s| &s.id);
        dedup_by_id(&mut self.reveals, "reveal entity", |r| &r.id);
        dedup_by_id(&mut self.stats, "stat", |s| &s.id);

        for testimonial in &mut self.testimonials {
            let clamped = testimonial.rating.clamp(1, 5);
            if clamped != testimonial.rating {
                warn!(
                    "Testimonial rating {} for '{}' clamped to {}",
                    testimonial.rating, testimonial.name, clamped
                );
                testimonial.rating = clamped;
            }
        }

        for item in &self.nav_items {
            if !self.sections.iter().any(|s| s.id == item.id) {
                warn!("Navigation item '{}' has no matching section", item.id);
            }
        }

        self
    }
}

/// Keep the first entry for each id
fn dedup_by_id<T>(entries: &mut Vec<T>, kind: &str, id: impl Fn(&T) -> &String) {
    let mut seen = HashSet::new();
    entries.retain(|entry| {
        let fresh = seen.insert(id(entry).clone());
        if !fresh {
            warn!("Dropping duplicate {} id '{}'", kind, id(entry));
        }
        fresh
    });
}

impl Default for PageConfig {
    fn default() -> Self {
        let section_ids = ["hero", "about", "stats", "projects", "blog", "contact"];
        let nav = [
            ("hero", "Home", "home"),
            ("about", "About", "user"),
            ("stats", "Stats", "bar-chart-3"),
            ("projects", "Projects", "briefcase"),
            ("blog", "Blog", "file-text"),
            ("contact", "Contact", "mail"),
        ];

        Self {
            sections: section_ids.into_iter().map(SectionConfig::new).collect(),
            nav_items: nav
                .into_iter()
                .map(|(id, label, icon)| NavItem {
                    id: id.to_string(),
                    label: label.to_string(),
                    icon: icon.to_string(),
                })
                .collect(),
            stats: vec![
                stat("startups", 5, "+", None, "SaaS Startups Scaled"),
                stat("clients", 20, "+", None, "Founder Clients Served"),
                stat("savings", 12, "Cr", Some("₹"), "Infra + Ops Spend Saved"),
                stat("ventures", 3, "", None, "Fractional CTO Ventures"),
            ],
            testimonials: vec![
                Testimonial {
                    quote: "Ryan transformed our infrastructure from a nightmare into a dream. \
                            Our deployment time went from 2 hours to 5 minutes."
                        .to_string(),
                    name: "Sarah Chen".to_string(),
                    role: "CTO".to_string(),
                    company: "TechFlow Solutions".to_string(),
                    rating: 5,
                    avatar_url: "https://images.unsplash.com/photo-1494790108755-2616b612b47c"
                        .to_string(),
                },
                Testimonial {
                    quote: "Working with Ryan was a game-changer for our startup. We scaled \
                            from 1K to 100K users without breaking the bank."
                        .to_string(),
                    name: "Marcus Rodriguez".to_string(),
                    role: "Founder & CEO".to_string(),
                    company: "GrowthLabs".to_string(),
                    rating: 5,
                    avatar_url: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e"
                        .to_string(),
                },
                Testimonial {
                    quote: "Ryan doesn't just solve technical problems, he understands \
                            business. His optimization saved us ₹8Cr annually."
                        .to_string(),
                    name: "Priya Sharma".to_string(),
                    role: "VP Engineering".to_string(),
                    company: "FinScale Inc".to_string(),
                    rating: 5,
                    avatar_url: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80"
                        .to_string(),
                },
            ],
            reveals: vec![
                RevealEntityConfig::new("about-content", 0.3).with_children(4, 200, 100),
                RevealEntityConfig::new("stats-header", 0.3),
                RevealEntityConfig::new("stats-grid", 0.0).with_children(4, 100, 0),
                RevealEntityConfig::new("projects-grid", 0.2).with_children(3, 300, 200),
                RevealEntityConfig::new("testimonials-thumbnails", 0.0).with_children(3, 200, 100),
                RevealEntityConfig::new("blog-grid", 0.2).with_children(3, 200, 100),
                RevealEntityConfig::new("contact-content", 0.0).with_children(2, 200, 100),
            ],
            counter_trigger: "stats-header".to_string(),
            timing: TimingPreferences::default(),
        }
    }
}

fn stat(id: &str, target: i64, suffix: &str, prefix: Option<&str>, label: &str) -> StatConfig {
    StatConfig {
        id: id.to_string(),
        target_value: target,
        suffix: suffix.to_string(),
        display_prefix: prefix.map(str::to_string),
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PageConfig::default();
        assert_eq!(config.sections.len(), 6);
        assert_eq!(config.sections[0].id, "hero");
        assert_eq!(config.nav_items.len(), config.sections.len());
        assert_eq!(config.stats.len(), 4);
        assert_eq!(config.testimonials.len(), 3);
        assert_eq!(config.timing.carousel_interval_ms, 5000);
        assert!(config.reveals.iter().any(|r| r.id == config.counter_trigger));
    }

    #[test]
    fn test_serialization() {
        let config = PageConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "sections": [{ "id": "intro" }],
            "reveals": [{ "id": "intro-card" }]
        }"#;
        let config: PageConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.sections[0].anchor(), "#intro");
        assert_eq!(config.timing.nav_visible_after_px, 100.0);

        let reveal = &config.reveals[0];
        assert!(reveal.once);
        assert_eq!(reveal.threshold, 0.0);
        assert_eq!(reveal.hidden, StyleVariant::HIDDEN);
    }

    #[test]
    fn test_sanitize_drops_duplicate_sections() {
        let config = PageConfig {
            sections: vec![
                SectionConfig::new("hero"),
                SectionConfig::new("about"),
                SectionConfig::new("hero"),
            ],
            ..PageConfig::default()
        }
        .sanitized();

        let ids: Vec<_> = config.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "about"]);
    }

    #[test]
    fn test_sanitize_drops_duplicate_reveals_and_stats() {
        let mut config = PageConfig::default();
        config
            .reveals
            .push(RevealEntityConfig::new("blog-grid", 0.9).with_children(1, 0, 0));
        let mut extra = config.stats[0].clone();
        extra.target_value = 99;
        config.stats.push(extra);

        let config = config.sanitized();

        let blog: Vec<_> = config.reveals.iter().filter(|r| r.id == "blog-grid").collect();
        assert_eq!(blog.len(), 1);
        assert!((blog[0].threshold - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.reveals.len(), 7);

        let startups: Vec<_> = config.stats.iter().filter(|s| s.id == "startups").collect();
        assert_eq!(startups.len(), 1);
        assert_eq!(startups[0].target_value, 5);
        assert_eq!(config.stats.len(), 4);
    }

    #[test]
    fn test_sanitize_clamps_ratings() {
        let mut config = PageConfig::default();
        config.testimonials[0].rating = 0;
        config.testimonials[1].rating = 9;

        let config = config.sanitized();
        assert_eq!(config.testimonials[0].rating, 1);
        assert_eq!(config.testimonials[1].rating, 5);
        assert_eq!(config.testimonials[2].rating, 5);
    }

    #[test]
    fn test_custom_anchor() {
        let section = SectionConfig {
            id: "contact".to_string(),
            anchor: Some("#get-in-touch".to_string()),
        };
        assert_eq!(section.anchor(), "#get-in-touch");
    }
}
