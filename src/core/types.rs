// ============================================================================
// spark-cocomp - Type Definitions
// Names, slots, directions, and the item contract
// ============================================================================

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use serde_json::Value;

use super::constants::is_reserved;
use super::error::{CoCompError, Result};

// =============================================================================
// COLLECTION NAME
// =============================================================================

/// A validated collection name.
///
/// The positional markers `"0"` and `"1"` are rejected so a registered name
/// can never be mistaken for a comparison slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    /// Validate and wrap a name.
    ///
    /// # Example
    ///
    /// ```
    /// use spark_cocomp::CollectionName;
    ///
    /// assert!(CollectionName::new("fruit").is_ok());
    /// assert!(CollectionName::new("0").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(CoCompError::ReservedName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CollectionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for CollectionName {
    type Error = CoCompError;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = CoCompError;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

// =============================================================================
// SLOT
// =============================================================================

/// Positional side of a compared pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Position `0`: the item under test
    First,
    /// Position `1`: the item it is compared against
    Second,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Whether an item just entered or left a peer collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Event-name fragment for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    pub fn flip(self) -> Direction {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// MEMBERSHIP EVENT
// =============================================================================

/// Payload delivered to an item on every membership transition.
#[derive(Debug, Clone)]
pub struct MembershipEvent<M> {
    /// Entered or left
    pub direction: Direction,
    /// The peer collection the transition refers to
    pub peer: CollectionName,
    /// For `In`, the equivalent item found in `peer`
    pub counterpart: Option<M>,
}

impl<M> MembershipEvent<M> {
    pub fn entered(peer: CollectionName, counterpart: M) -> Self {
        Self {
            direction: Direction::In,
            peer,
            counterpart: Some(counterpart),
        }
    }

    pub fn left(peer: CollectionName) -> Self {
        Self {
            direction: Direction::Out,
            peer,
            counterpart: None,
        }
    }

    pub fn is_in(&self) -> bool {
        self.direction == Direction::In
    }
}

// =============================================================================
// MEMBER TRAIT
// =============================================================================

/// Contract an item must satisfy to take part in comparisons.
///
/// Items are handles: cloning one must yield the same logical item, so the
/// engine can deliver notifications to whichever copy it holds.
pub trait Member: Clone + 'static {
    /// Identity key; two handles with equal ids are the same item.
    type Id: Eq + Hash + Clone + fmt::Debug;

    fn identity(&self) -> Self::Id;

    /// Value of a named attribute, used by attribute comparators.
    fn attribute(&self, key: &str) -> Option<Value>;

    /// Deliver a named event to this item.
    fn trigger(&self, event: &str, payload: &MembershipEvent<Self>);
}

// =============================================================================
// TESTS
// =============================================================================
