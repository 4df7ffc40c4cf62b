// ============================================================================
// spark-cocomp - Model
// A shared attribute record that receives membership notifications
// ============================================================================

use std::fmt;
use std::rc::Rc;
use std::cell::RefCell;

use serde_json::{Map, Value};

use super::events::{EventHub, SubscriptionId};
use crate::core::constants::DEFAULT_ATTRIBUTE;
use crate::core::types::{Member, MembershipEvent};

/// Identity of a [`Model`]: the address of its shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(usize);

struct ModelInner {
    attributes: RefCell<Map<String, Value>>,
    events: EventHub<MembershipEvent<Model>>,
}

/// A record of JSON attributes with its own event hub.
///
/// `Model` is a handle: clones share attributes, subscriptions, and
/// identity. Two separately created models are never identical, even when
/// their attributes are equal.
///
/// # Example
///
/// ```
/// use spark_cocomp::{model, Model};
///
/// let apple = model! { "id" => 1, "name" => "apple" };
/// assert_eq!(apple.id(), Some(serde_json::json!(1)));
///
/// let same = apple.clone();
/// same.set("name", "pomme");
/// assert_eq!(apple.get("name"), Some(serde_json::json!("pomme")));
/// ```
#[derive(Clone)]
pub struct Model {
    inner: Rc<ModelInner>,
}

impl Model {
    pub fn new() -> Self {
        Self::from_attributes(Map::new())
    }

    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            inner: Rc::new(ModelInner {
                attributes: RefCell::new(attributes),
                events: EventHub::new(),
            }),
        }
    }

    /// Build from a JSON object. Any other JSON value yields an empty model.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(attributes) => Self::from_attributes(attributes),
            _ => Self::new(),
        }
    }

    // =========================================================================
    // ATTRIBUTES
    // =========================================================================

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.attributes.borrow().get(key).cloned()
    }

    /// Set an attribute, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner
            .attributes
            .borrow_mut()
            .insert(key.into(), value.into())
    }

    pub fn unset(&self, key: &str) -> Option<Value> {
        self.inner.attributes.borrow_mut().remove(key)
    }

    /// The record identifier (`"id"` attribute).
    pub fn id(&self) -> Option<Value> {
        self.get(DEFAULT_ATTRIBUTE)
    }

    /// Snapshot of all attributes as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.inner.attributes.borrow().clone())
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Subscribe to one membership event, e.g. `membership:in:veg`.
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&MembershipEvent<Model>) + 'static,
    {
        self.inner.events.on(event, handler)
    }

    /// Subscribe to every event delivered to this model.
    pub fn on_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &MembershipEvent<Model>) + 'static,
    {
        self.inner.events.on_all(handler)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.inner.events.off(id)
    }

    pub fn events(&self) -> &EventHub<MembershipEvent<Model>> {
        &self.inner.events
    }

    /// Returns true if both handles refer to the same model.
    pub fn ptr_eq(&self, other: &Model) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Member for Model {
    type Id = ModelId;

    fn identity(&self) -> ModelId {
        ModelId(Rc::as_ptr(&self.inner) as *const () as usize)
    }

    fn attribute(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    fn trigger(&self, event: &str, payload: &MembershipEvent<Self>) {
        self.inner.events.emit(event, payload);
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("attributes", &self.inner.attributes.borrow())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CollectionName;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn attributes_round_trip_through_clones() {
        let m = Model::new();
        assert_eq!(m.set("id", 3), None);
        assert_eq!(m.clone().id(), Some(json!(3)));
        assert_eq!(m.unset("id"), Some(json!(3)));
        assert_eq!(m.id(), None);
    }

    #[test]
    fn from_json_requires_object() {
        let m = Model::from_json(json!({ "id": 1, "tags": ["a"] }));
        assert_eq!(m.get("tags"), Some(json!(["a"])));
        assert_eq!(m.to_json(), json!({ "id": 1, "tags": ["a"] }));

        let empty = Model::from_json(json!(42));
        assert_eq!(empty.to_json(), json!({}));
    }

    #[test]
    fn identity_follows_the_handle() {
        let a = Model::from_json(json!({ "id": 1 }));
        let b = Model::from_json(json!({ "id": 1 }));

        assert_eq!(a.identity(), a.clone().identity());
        assert_ne!(a.identity(), b.identity());
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn trigger_reaches_subscribers() {
        let m = Model::new();
        let hits = Rc::new(Cell::new(0));

        let hits_clone = hits.clone();
        let id = m.on("membership:out:veg", move |event| {
            assert!(!event.is_in());
            hits_clone.set(hits_clone.get() + 1);
        });

        let veg = CollectionName::new("veg").unwrap();
        m.trigger("membership:out:veg", &MembershipEvent::left(veg.clone()));
        m.trigger("membership:out", &MembershipEvent::left(veg.clone()));
        assert_eq!(hits.get(), 1);

        assert!(m.off(id));
        m.trigger("membership:out:veg", &MembershipEvent::left(veg));
        assert_eq!(hits.get(), 1);
    }
}
