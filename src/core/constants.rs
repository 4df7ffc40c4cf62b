// ============================================================================
// spark-cocomp - Constants
// Event namespace, reserved names, and event-name builders
// ============================================================================

use super::types::Direction;

// =============================================================================
// EVENT NAMES
// =============================================================================

/// Default namespace prefixed to every membership event.
pub const DEFAULT_NAMESPACE: &str = "membership";

/// Separator between event-name segments.
pub const EVENT_SEPARATOR: char = ':';

// =============================================================================
// RESERVED NAMES
// =============================================================================

/// Positional marker for the first item of a compared pair.
pub const FIRST_SLOT_NAME: &str = "0";

/// Positional marker for the second item of a compared pair.
pub const SECOND_SLOT_NAME: &str = "1";

/// Names that may never be used to register a collection.
pub const RESERVED_NAMES: [&str; 2] = [FIRST_SLOT_NAME, SECOND_SLOT_NAME];

// =============================================================================
// COMPARATOR DEFAULTS
// =============================================================================

/// Comparator key selecting identity equality.
pub const IDENTITY_MARKER: &str = "===";

/// Attribute compared when no comparator is configured.
pub const DEFAULT_ATTRIBUTE: &str = "id";

// =============================================================================
// BUILDERS
// =============================================================================

/// Generic transition event name, e.g. `membership:in`.
pub fn event_name(namespace: &str, direction: Direction) -> String {
    format!("{namespace}{EVENT_SEPARATOR}{}", direction.as_str())
}

/// Peer-specific transition event name, e.g. `membership:out:veg`.
pub fn peer_event_name(namespace: &str, direction: Direction, peer: &str) -> String {
    format!(
        "{namespace}{EVENT_SEPARATOR}{}{EVENT_SEPARATOR}{peer}",
        direction.as_str()
    )
}

/// Returns true if `name` is one of the positional markers.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

// =============================================================================
// TESTS
// =============================================================================
