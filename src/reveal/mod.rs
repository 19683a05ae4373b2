//! Viewport reveal module
//!
//! Entrance animations triggered by an element's intersection with the
//! viewport.
//!
//! # Architecture
//!
//! - `IntersectionRegistry`: the host's observer facility. Hands out
//!   `ObserverSubscription`s and filters deliveries to observed entities.
//! - `ViewportRevealController`: hidden/visible state of one entity, driven by
//!   intersection ratios against a threshold.
//! - `RevealGroup`: a controller plus staggered children that enter one after
//!   another once the parent has been revealed.
//!
//! # Reveal Rules
//!
//! 1. A ratio qualifies when it is above zero and at least the threshold.
//! 2. `once = true`: the first qualifying ratio reveals the entity and the
//!    subscription is released. Later ratios are never seen.
//! 3. `once = false`: the entity hides again when the ratio drops below the
//!    threshold, and may be revealed again.
//! 4. Child *i* becomes visible `delay_children + i × stagger` after the
//!    parent's reveal. Hiding the parent cancels children that have not
//!    entered yet.

pub mod controller;
pub mod group;
pub mod registry;

pub use controller::{RevealOptions, RevealTransition, ViewportRevealController, Visibility};
pub use group::RevealGroup;
pub use registry::{IntersectionRegistry, ObserverSubscription, SubscriptionId};
