//! Reveal state of a single entity

use crate::config::StyleVariant;
use crate::reveal::registry::{IntersectionRegistry, ObserverSubscription};
use tracing::debug;

/// Visibility of an animatable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Entrance style not yet applied
    #[default]
    Hidden,
    /// Entrance style applied
    Visible,
}

/// Change produced by an intersection event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTransition {
    /// Hidden → visible
    Revealed,
    /// Visible → hidden (only without `once`)
    Hidden,
}

/// Threshold and repeat behaviour of a reveal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    threshold: f64,
    once: bool,
}

impl RevealOptions {
    /// Create options; the threshold is clamped to `0.0..=1.0` (NaN becomes 0)
    pub fn new(threshold: f64, once: bool) -> Self {
        Self {
            threshold: clamp_fraction(threshold),
            once,
        }
    }

    /// Visible fraction required to reveal
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether the reveal is one-shot
    pub fn once(&self) -> bool {
        self.once
    }

    /// Whether an intersection ratio reaches the threshold.
    ///
    /// A ratio of zero means no overlap and never qualifies.
    pub fn qualifies(&self, ratio: f64) -> bool {
        let ratio = clamp_fraction(ratio);
        ratio > 0.0 && ratio >= self.threshold
    }
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Hidden/visible state of one entity driven by its viewport intersection
#[derive(Debug)]
pub struct ViewportRevealController {
    entity: String,
    options: RevealOptions,
    visibility: Visibility,
    subscription: Option<ObserverSubscription>,
    hidden_style: StyleVariant,
    visible_style: StyleVariant,
}

impl ViewportRevealController {
    /// Mount the controller and start observing `entity`
    pub fn mount(
        entity: impl Into<String>,
        options: RevealOptions,
        registry: &mut IntersectionRegistry,
    ) -> Self {
        let entity = entity.into();
        let subscription = registry.observe(&entity, options.threshold());
        Self {
            entity,
            options,
            visibility: Visibility::Hidden,
            subscription: Some(subscription),
            hidden_style: StyleVariant::HIDDEN,
            visible_style: StyleVariant::VISIBLE,
        }
    }

    /// Replace the hidden/visible style pair
    #[must_use]
    pub fn with_styles(mut self, hidden: StyleVariant, visible: StyleVariant) -> Self {
        self.hidden_style = hidden;
        self.visible_style = visible;
        self
    }

    /// Entity id
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Reveal options
    pub fn options(&self) -> RevealOptions {
        self.options
    }

    /// Current visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the entrance has been triggered
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Whether the entity is still observed
    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    /// Style for the current visibility
    pub fn style(&self) -> StyleVariant {
        match self.visibility {
            Visibility::Hidden => self.hidden_style,
            Visibility::Visible => self.visible_style,
        }
    }

    /// Handle an intersection ratio for this entity
    pub fn on_intersection(
        &mut self,
        ratio: f64,
        registry: &mut IntersectionRegistry,
    ) -> Option<RevealTransition> {
        if self.subscription.is_none() {
            debug!("Ignoring intersection for unobserved '{}'", self.entity);
            return None;
        }

        let qualifies = self.options.qualifies(ratio);
        match (self.visibility, qualifies) {
            (Visibility::Hidden, true) => {
                self.visibility = Visibility::Visible;
                debug!("'{}' revealed at ratio {:.2}", self.entity, ratio);
                if self.options.once() {
                    self.detach(registry);
                }
                Some(RevealTransition::Revealed)
            }
            (Visibility::Visible, false) if !self.options.once() => {
                self.visibility = Visibility::Hidden;
                debug!("'{}' hidden at ratio {:.2}", self.entity, ratio);
                Some(RevealTransition::Hidden)
            }
            _ => None,
        }
    }

    /// Stop observing. Visibility is kept as-is.
    pub fn unmount(&mut self, registry: &mut IntersectionRegistry) {
        self.detach(registry);
    }

    fn detach(&mut self, registry: &mut IntersectionRegistry) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe(registry);
        }
    }
}
