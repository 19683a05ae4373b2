//! Reveal with staggered children
//!
//! The parent's reveal arms one one-shot timer per child. Children only ever
//! become visible through those timers, so no child can enter before its
//! parent.

use crate::config::RevealEntityConfig;
use crate::reveal::controller::{RevealOptions, RevealTransition, ViewportRevealController};
use crate::reveal::registry::IntersectionRegistry;
use crate::timer::{Scheduler, TimerId};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
struct ChildReveal {
    visible: bool,
    timer: Option<TimerId>,
}

/// Parent reveal controller plus staggered children
#[derive(Debug)]
pub struct RevealGroup {
    parent: ViewportRevealController,
    children: Vec<ChildReveal>,
    stagger: Duration,
    delay_children: Duration,
}

impl RevealGroup {
    /// Mount the group and start observing its parent entity
    pub fn mount(config: &RevealEntityConfig, registry: &mut IntersectionRegistry) -> Self {
        let options = RevealOptions::new(config.threshold, config.once);
        let parent = ViewportRevealController::mount(config.id.clone(), options, registry)
            .with_styles(config.hidden, config.visible);

        Self {
            parent,
            children: vec![ChildReveal::default(); config.children],
            stagger: Duration::from_millis(config.stagger_ms),
            delay_children: Duration::from_millis(config.delay_children_ms),
        }
    }

    /// Entity id of the parent
    pub fn id(&self) -> &str {
        self.parent.entity()
    }

    /// Parent controller
    pub fn parent(&self) -> &ViewportRevealController {
        &self.parent
    }

    /// Whether the parent is visible
    pub fn is_visible(&self) -> bool {
        self.parent.is_visible()
    }

    /// Number of children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of children that have entered
    pub fn visible_children(&self) -> usize {
        self.children.iter().filter(|c| c.visible).count()
    }

    /// Whether child `index` has entered
    pub fn is_child_visible(&self, index: usize) -> bool {
        self.children.get(index).is_some_and(|c| c.visible)
    }

    /// Children still waiting on their stagger timer
    pub fn pending_children(&self) -> usize {
        self.children.iter().filter(|c| c.timer.is_some()).count()
    }

    /// Delay between the parent's reveal and child `index` entering
    pub fn child_delay(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.delay_children + self.stagger.saturating_mul(index)
    }

    /// Handle an intersection ratio for the parent entity
    pub fn on_intersection(
        &mut self,
        ratio: f64,
        registry: &mut IntersectionRegistry,
        scheduler: &mut impl Scheduler,
    ) -> Option<RevealTransition> {
        let transition = self.parent.on_intersection(ratio, registry)?;

        match transition {
            RevealTransition::Revealed => {
                for index in 0..self.children.len() {
                    let delay = self.child_delay(index);
                    self.children[index].timer = Some(scheduler.schedule_once(delay));
                }
                if !self.children.is_empty() {
                    debug!(
                        "'{}' staggering {} children",
                        self.id(),
                        self.children.len()
                    );
                }
            }
            RevealTransition::Hidden => self.reset_children(scheduler),
        }

        Some(transition)
    }

    /// Handle a fired stagger timer. Returns `true` if a child entered.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        let Some(child) = self.children.iter_mut().find(|c| c.timer == Some(id)) else {
            debug!("'{}' ignoring stale timer {:?}", self.parent.entity(), id);
            return false;
        };

        child.timer = None;
        child.visible = true;
        true
    }

    /// Stop observing and cancel every pending child timer
    pub fn unmount(&mut self, registry: &mut IntersectionRegistry, scheduler: &mut impl Scheduler) {
        self.parent.unmount(registry);
        for child in &mut self.children {
            if let Some(timer) = child.timer.take() {
                scheduler.cancel(timer);
            }
        }
    }

    fn reset_children(&mut self, scheduler: &mut impl Scheduler) {
        for child in &mut self.children {
            if let Some(timer) = child.timer.take() {
                scheduler.cancel(timer);
            }
            child.visible = false;
        }
    }
}
