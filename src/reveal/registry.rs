//! Intersection observer registry
//!
//! Observation is an explicit subscription: `observe` returns an
//! `ObserverSubscription` that the owning controller stores and hands back
//! through `unsubscribe` at teardown. Deliveries for entities without a live
//! subscription are dropped.

use std::collections::HashMap;
use tracing::debug;

/// Identifier of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Unsubscribe handle for an observed entity
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an entity stays observed until its subscription is unsubscribed"]
pub struct ObserverSubscription {
    id: SubscriptionId,
    entity: String,
}

impl ObserverSubscription {
    /// Subscription identifier
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Observed entity
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Stop observing the entity
    pub fn unsubscribe(self, registry: &mut IntersectionRegistry) {
        registry.release(&self);
    }
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    id: SubscriptionId,
    threshold: f64,
}

/// Entities currently observed for viewport intersection
#[derive(Debug, Default)]
pub struct IntersectionRegistry {
    next_id: u64,
    observed: HashMap<String, Observation>,
}

impl IntersectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `entity`.
    ///
    /// Observing an entity again replaces the earlier observation; the older
    /// subscription becomes inert.
    pub fn observe(&mut self, entity: &str, threshold: f64) -> ObserverSubscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        if self
            .observed
            .insert(entity.to_string(), Observation { id, threshold })
            .is_some()
        {
            debug!("Replacing observation of '{}'", entity);
        }

        ObserverSubscription {
            id,
            entity: entity.to_string(),
        }
    }

    fn release(&mut self, subscription: &ObserverSubscription) {
        let current = self
            .observed
            .get(&subscription.entity)
            .is_some_and(|obs| obs.id == subscription.id);

        if current {
            self.observed.remove(&subscription.entity);
            debug!("Stopped observing '{}'", subscription.entity);
        }
    }

    /// Whether `entity` has a live subscription
    pub fn is_observed(&self, entity: &str) -> bool {
        self.observed.contains_key(entity)
    }

    /// Threshold registered for `entity`
    pub fn threshold(&self, entity: &str) -> Option<f64> {
        self.observed.get(entity).map(|obs| obs.threshold)
    }

    /// Number of observed entities
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Whether nothing is observed
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_and_unsubscribe() {
        let mut registry = IntersectionRegistry::new();
        let sub = registry.observe("stats-header", 0.3);

        assert!(registry.is_observed("stats-header"));
        assert_eq!(registry.threshold("stats-header"), Some(0.3));
        assert_eq!(sub.entity(), "stats-header");

        sub.unsubscribe(&mut registry);
        assert!(!registry.is_observed("stats-header"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_subscription_does_not_release_newer_one() {
        let mut registry = IntersectionRegistry::new();
        let old = registry.observe("blog-grid", 0.2);
        let new = registry.observe("blog-grid", 0.5);
        assert_ne!(old.id(), new.id());

        old.unsubscribe(&mut registry);
        assert!(registry.is_observed("blog-grid"));
        assert_eq!(registry.threshold("blog-grid"), Some(0.5));

        new.unsubscribe(&mut registry);
        assert!(!registry.is_observed("blog-grid"));
    }
}
