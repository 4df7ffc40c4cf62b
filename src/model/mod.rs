// ============================================================================
// spark-cocomp - Model Module
// Per-item event delivery plus a ready-made record type
// ============================================================================

pub mod events;
pub mod record;

pub use events::{EventHub, SubscriptionId};
pub use record::{Model, ModelId};
