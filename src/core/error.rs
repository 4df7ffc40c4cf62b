// ============================================================================
// spark-cocomp - Errors
// ============================================================================

use thiserror::Error;

/// Errors raised by the comparison engine.
///
/// All variants signal programmer misuse or a broken internal invariant.
/// Nothing here is transient, so there is nothing to retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoCompError {
    /// A collection was registered under a positional marker (`"0"` or `"1"`).
    #[error("collection name {name:?} is reserved for positional comparison slots")]
    ReservedName {
        /// The rejected name
        name: String,
    },

    /// The engine configuration cannot produce a usable comparator.
    #[error("invalid engine configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration
        reason: String,
    },

    /// A comparison was requested for a collection that is not (or no longer)
    /// registered under the expected name.
    #[error("no registered collection resolves to {name:?}")]
    UnresolvedCollection {
        /// The name that failed to resolve
        name: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoCompError>;
