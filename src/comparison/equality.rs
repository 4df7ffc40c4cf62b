// ============================================================================
// spark-cocomp - Equivalence Predicates
// Pairings handed to predicates, and the comparator configurations
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::constants::{DEFAULT_ATTRIBUTE, IDENTITY_MARKER};
use crate::core::error::{CoCompError, Result};
use crate::core::types::{CollectionName, Member, Slot};

// =============================================================================
// PAIRING
// =============================================================================

/// Key used to look up one side of a [`Pairing`].
///
/// Slots and names are separate variants, so a collection can never shadow a
/// positional slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKey<'a> {
    Slot(Slot),
    Name(&'a str),
}

impl From<Slot> for PairKey<'_> {
    fn from(slot: Slot) -> Self {
        PairKey::Slot(slot)
    }
}

impl<'a> From<&'a str> for PairKey<'a> {
    fn from(name: &'a str) -> Self {
        PairKey::Name(name)
    }
}

impl<'a> From<&'a CollectionName> for PairKey<'a> {
    fn from(name: &'a CollectionName) -> Self {
        PairKey::Name(name.as_str())
    }
}

/// Two items from two different collections, tagged by collection name.
///
/// Slot `First` is always the item under test; slot `Second` is the item it
/// is being compared against.
pub struct Pairing<'a, M> {
    names: [&'a CollectionName; 2],
    members: [&'a M; 2],
}

impl<'a, M> Pairing<'a, M> {
    pub fn new(
        first_name: &'a CollectionName,
        first: &'a M,
        second_name: &'a CollectionName,
        second: &'a M,
    ) -> Self {
        Self {
            names: [first_name, second_name],
            members: [first, second],
        }
    }

    /// Item in the given slot.
    pub fn slot(&self, slot: Slot) -> &'a M {
        self.members[slot.index()]
    }

    pub fn first(&self) -> &'a M {
        self.slot(Slot::First)
    }

    pub fn second(&self) -> &'a M {
        self.slot(Slot::Second)
    }

    /// Collection the item in `slot` came from.
    pub fn name(&self, slot: Slot) -> &'a CollectionName {
        self.names[slot.index()]
    }

    /// Item that came from the collection called `name`.
    pub fn by_name(&self, name: &str) -> Option<&'a M> {
        self.names
            .iter()
            .position(|n| n.as_str() == name)
            .map(|index| self.members[index])
    }

    /// Look up an item by slot or by collection name.
    ///
    /// # Example
    ///
    /// ```
    /// use spark_cocomp::{CollectionName, Pairing, Slot};
    ///
    /// let fruit = CollectionName::new("fruit").unwrap();
    /// let veg = CollectionName::new("veg").unwrap();
    /// let pairing = Pairing::new(&fruit, &"apple", &veg, &"leek");
    ///
    /// assert_eq!(pairing.get("veg"), Some(&"leek"));
    /// assert_eq!(pairing.get(Slot::First), Some(&"apple"));
    /// assert_eq!(pairing.get("grain"), None);
    /// ```
    pub fn get<'k>(&self, key: impl Into<PairKey<'k>>) -> Option<&'a M> {
        match key.into() {
            PairKey::Slot(slot) => Some(self.slot(slot)),
            PairKey::Name(name) => self.by_name(name),
        }
    }

    /// The same pairing with the slots exchanged.
    pub fn swapped(&self) -> Pairing<'a, M> {
        Pairing {
            names: [self.names[1], self.names[0]],
            members: [self.members[1], self.members[0]],
        }
    }
}

// =============================================================================
// COMPARATOR
// =============================================================================

/// A direct predicate over a pairing.
pub type PredicateFn<M> = Rc<dyn Fn(&Pairing<'_, M>) -> bool>;

/// How two items are judged equivalent.
///
/// Defaults to comparing the `"id"` attribute.
pub enum Comparator<M> {
    /// Caller-supplied predicate
    Predicate(PredicateFn<M>),
    /// Same underlying item (`Member::identity`)
    Identity,
    /// Equal value of one named attribute; items lacking it match nothing
    Attribute(String),
}

impl<M: Member> Comparator<M> {
    /// Wrap a predicate closure.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Pairing<'_, M>) -> bool + 'static,
    {
        Comparator::Predicate(Rc::new(f))
    }

    /// Compare items by a key extracted from each side.
    ///
    /// # Example
    ///
    /// ```
    /// use spark_cocomp::{model, Comparator, CollectionName, Model, Pairing};
    ///
    /// let by_name = Comparator::by_key(|m: &Model| m.get("name"));
    ///
    /// let a = model! { "name" => "apple" };
    /// let b = model! { "name" => "apple", "colour" => "red" };
    /// let fruit = CollectionName::new("fruit").unwrap();
    /// let basket = CollectionName::new("basket").unwrap();
    ///
    /// assert!(by_name.equivalent(&Pairing::new(&fruit, &a, &basket, &b)));
    /// ```
    pub fn by_key<F, R>(key_fn: F) -> Self
    where
        F: Fn(&M) -> R + 'static,
        R: PartialEq,
    {
        Self::predicate(move |pairing| key_fn(pairing.first()) == key_fn(pairing.second()))
    }

    pub fn attribute(key: impl Into<String>) -> Self {
        Comparator::Attribute(key.into())
    }

    /// Interpret a comparator key: the identity marker `"==="` selects
    /// identity, anything else names an attribute.
    pub fn parse(key: &str) -> Result<Self> {
        let comparator = if key == IDENTITY_MARKER {
            Comparator::Identity
        } else {
            Comparator::Attribute(key.to_string())
        };
        comparator.validate()?;
        Ok(comparator)
    }

    /// Reject configurations that could never match anything sensibly.
    pub fn validate(&self) -> Result<()> {
        match self {
            Comparator::Attribute(key) if key.trim().is_empty() => {
                Err(CoCompError::InvalidConfig {
                    reason: "attribute comparator needs a non-empty attribute key".into(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Judge whether the two items of `pairing` are equivalent.
    pub fn equivalent(&self, pairing: &Pairing<'_, M>) -> bool {
        match self {
            Comparator::Predicate(f) => f(pairing),
            Comparator::Identity => pairing.first().identity() == pairing.second().identity(),
            Comparator::Attribute(key) => match (
                pairing.first().attribute(key),
                pairing.second().attribute(key),
            ) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl<M: Member> Default for Comparator<M> {
    fn default() -> Self {
        Comparator::Attribute(DEFAULT_ATTRIBUTE.to_string())
    }
}

impl<M> Clone for Comparator<M> {
    fn clone(&self) -> Self {
        match self {
            Comparator::Predicate(f) => Comparator::Predicate(f.clone()),
            Comparator::Identity => Comparator::Identity,
            Comparator::Attribute(key) => Comparator::Attribute(key.clone()),
        }
    }
}

impl<M> fmt::Debug for Comparator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Predicate(_) => f.write_str("Comparator::Predicate(..)"),
            Comparator::Identity => f.write_str("Comparator::Identity"),
            Comparator::Attribute(key) => write!(f, "Comparator::Attribute({key:?})"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
