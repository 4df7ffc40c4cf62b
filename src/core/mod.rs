// ============================================================================
// spark-cocomp - Core Module
// Fundamental types, errors, and constants shared by every layer
// ============================================================================

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{event_name, is_reserved, peer_event_name};
pub use error::{CoCompError, Result};
pub use types::{CollectionName, Direction, Member, MembershipEvent, Slot};
