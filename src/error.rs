//! Error types for `foliosync`
//!
//! Controller failures (`MissingElement`, `InvalidIndex`, `MalformedStatConfig`)
//! are absorbed where they occur: the caller logs them and keeps the previous
//! valid state. The remaining variants belong to the configuration and
//! logging layers and are only seen at startup.
//!
//! Error variants use `#[source]` to preserve error chains.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for `foliosync`
#[derive(Debug, Error)]
pub enum FolioError {
    /// A referenced section or entity is not present in the page
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// Manual carousel selection outside the item range
    #[error("Carousel index {index} out of bounds (length {len})")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Number of carousel items
        len: usize,
    },

    /// Stat configuration that cannot be counted as given
    #[error("Malformed stat configuration for '{id}': target value {value}")]
    MalformedStatConfig {
        /// Stat entity id
        id: String,
        /// Configured target value
        value: i64,
    },

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Logging could not be initialised
    #[error("Logging error: {0}")]
    LoggingError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `foliosync` operations
pub type Result<T> = std::result::Result<T, FolioError>;

impl FolioError {
    /// Whether the error belongs to the absorbed controller taxonomy.
    ///
    /// Absorbed errors never reach the renderer; the page keeps its previous
    /// state and the error is logged.
    pub fn is_absorbed(&self) -> bool {
        matches!(
            self,
            Self::MissingElement(_) | Self::InvalidIndex { .. } | Self::MalformedStatConfig { .. }
        )
    }
}
