//! `foliosync` - View-state synchronization for a single-page portfolio site
//!
//! Keeps navigation, scroll-triggered reveals, stat counters and the
//! testimonial carousel in step with the reader's scroll position and the
//! passage of time. A `PageController` owns every view controller and drives
//! them from page events and a deterministic timer queue.
//!
//! # Guarantees
//!
//! - At most one animation timer per controller instance
//! - No state changes after a controller is unmounted
//! - Stale timer callbacks are ignored

// Module declarations
pub mod carousel;
pub mod config;
pub mod counter;
pub mod error;
pub mod layout;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod timer;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use error::{FolioError, Result};
