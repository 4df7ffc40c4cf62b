// ============================================================================
// spark-cocomp - ObservableVec
// An ordered, identity-unique collection that reports add/remove/reset
// ============================================================================

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;

use super::observable::{Collection, CollectionEvent, Listener, ListenerId};
use crate::core::types::Member;

// =============================================================================
// OBSERVABLE VEC
// =============================================================================

/// An ordered collection of items with change notifications.
///
/// Items are unique by [`Member::identity`]; adding an item that is already
/// present does nothing. Mutators take `&self` so the collection can be
/// shared behind an `Rc` and mutated from inside notification handlers.
///
/// # Example
///
/// ```
/// use spark_cocomp::{model, ObservableVec};
///
/// let fruit = ObservableVec::new();
/// let apple = model! { "id" => 1 };
///
/// assert!(fruit.add(apple.clone()));
/// assert!(!fruit.add(apple.clone()));
/// assert_eq!(fruit.len(), 1);
///
/// assert!(fruit.remove(&apple));
/// assert!(fruit.is_empty());
/// ```
pub struct ObservableVec<M: Member> {
    /// The underlying data
    data: RefCell<Vec<M>>,

    /// Subscribed listeners, in subscription order
    listeners: RefCell<IndexMap<ListenerId, Listener<M>>>,

    next_listener: Cell<u64>,
}

impl<M: Member> ObservableVec<M> {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::from_members(Vec::new())
    }

    /// Create a collection holding `members`, skipping identity duplicates.
    ///
    /// No events are emitted; nothing can be listening yet.
    pub fn from_members<I: IntoIterator<Item = M>>(members: I) -> Self {
        Self {
            data: RefCell::new(Self::dedup(members)),
            listeners: RefCell::new(IndexMap::new()),
            next_listener: Cell::new(0),
        }
    }

    fn dedup<I: IntoIterator<Item = M>>(members: I) -> Vec<M> {
        let mut data: Vec<M> = Vec::new();
        for member in members {
            if !data.iter().any(|m| m.identity() == member.identity()) {
                data.push(member);
            }
        }
        data
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if an item with the same identity is present.
    pub fn contains(&self, member: &M) -> bool {
        self.position(member).is_some()
    }

    fn position(&self, member: &M) -> Option<usize> {
        let id = member.identity();
        self.data.borrow().iter().position(|m| m.identity() == id)
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Append an item. Returns false if it was already present.
    pub fn add(&self, member: M) -> bool {
        if self.contains(&member) {
            return false;
        }
        self.data.borrow_mut().push(member.clone());
        self.dispatch(&CollectionEvent::Add(member));
        true
    }

    /// Remove an item by identity. Returns false if it was absent.
    pub fn remove(&self, member: &M) -> bool {
        let removed = match self.position(member) {
            Some(index) => self.data.borrow_mut().remove(index),
            None => return false,
        };
        self.dispatch(&CollectionEvent::Remove(removed));
        true
    }

    /// Replace the contents. Emits a single `Reset`, no per-item events.
    pub fn reset<I: IntoIterator<Item = M>>(&self, members: I) {
        let data = Self::dedup(members);
        *self.data.borrow_mut() = data;
        self.dispatch(&CollectionEvent::Reset);
    }

    /// Reset to empty.
    pub fn clear(&self) {
        self.reset(Vec::new());
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Call every listener with `event`.
    ///
    /// Works from a snapshot so listeners can subscribe, unsubscribe, or
    /// mutate the collection; a listener removed mid-dispatch is skipped.
    fn dispatch(&self, event: &CollectionEvent<M>) {
        let snapshot: Vec<(ListenerId, Listener<M>)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();

        for (id, listener) in snapshot {
            if !self.listeners.borrow().contains_key(&id) {
                continue;
            }
            listener(event);
        }
    }
}

impl<M: Member> Collection for ObservableVec<M> {
    type Member = M;

    fn members(&self) -> Vec<M> {
        self.data.borrow().clone()
    }

    fn subscribe(&self, listener: Listener<M>) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().shift_remove(&id);
    }
}

impl<M: Member> Default for ObservableVec<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Member> FromIterator<M> for ObservableVec<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self::from_members(iter)
    }
}

impl<M: Member + std::fmt::Debug> std::fmt::Debug for ObservableVec<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableVec")
            .field("data", &self.data.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::observable::listener;
    use crate::model;
    use crate::model::Model;
    use std::rc::Rc;

    fn kinds(log: &Rc<RefCell<Vec<&'static str>>>) -> Listener<Model> {
        let log = log.clone();
        listener(move |event| {
            log.borrow_mut().push(match event {
                CollectionEvent::Add(_) => "add",
                CollectionEvent::Remove(_) => "remove",
                CollectionEvent::Reset => "reset",
            })
        })
    }

    #[test]
    fn create_empty() {
        let vec: ObservableVec<Model> = ObservableVec::new();
        assert!(vec.is_empty());
        assert!(vec.members().is_empty());
    }

    #[test]
    fn from_members_skips_duplicates() {
        let apple = model! { "id" => 1 };
        let vec = ObservableVec::from_members([apple.clone(), apple.clone(), Model::new()]);
        assert_eq!(vec.len(), 2);
    }

    #[test]
    fn add_remove_emit_events() {
        let vec = ObservableVec::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        vec.subscribe(kinds(&log));

        let apple = model! { "id" => 1 };
        assert!(vec.add(apple.clone()));
        assert!(!vec.add(apple.clone()), "duplicate add is ignored");
        assert!(vec.remove(&apple));
        assert!(!vec.remove(&apple), "absent remove is ignored");
        vec.reset([apple]);
        vec.clear();

        assert_eq!(*log.borrow(), vec!["add", "remove", "reset", "reset"]);
        assert!(vec.is_empty());
    }

    #[test]
    fn change_is_visible_to_listeners() {
        let vec = Rc::new(ObservableVec::new());
        let seen = Rc::new(Cell::new(usize::MAX));

        let vec_clone = vec.clone();
        let seen_clone = seen.clone();
        vec.subscribe(listener(move |_| seen_clone.set(vec_clone.len())));

        vec.add(Model::new());
        assert_eq!(seen.get(), 1);
        vec.add(Model::new());
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let vec = ObservableVec::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = vec.subscribe(kinds(&log));

        vec.add(Model::new());
        vec.unsubscribe(id);
        vec.add(Model::new());

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(vec.listener_count(), 0);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let vec = Rc::new(ObservableVec::new());
        let second_calls = Rc::new(Cell::new(0));
        let second_id = Rc::new(Cell::new(None));

        let vec_clone = vec.clone();
        let second_id_clone = second_id.clone();
        vec.subscribe(listener(move |_| {
            if let Some(id) = second_id_clone.get() {
                vec_clone.unsubscribe(id);
            }
        }));

        let calls = second_calls.clone();
        let id = vec.subscribe(listener(move |_| calls.set(calls.get() + 1)));
        second_id.set(Some(id));

        vec.add(Model::new());
        assert_eq!(second_calls.get(), 0);
    }

    #[test]
    fn listener_may_mutate_collection() {
        let vec = Rc::new(ObservableVec::new());
        let extra = Model::new();

        let vec_clone = vec.clone();
        let extra_clone = extra.clone();
        vec.subscribe(listener(move |event| {
            if let CollectionEvent::Add(_) = event {
                vec_clone.add(extra_clone.clone());
            }
        }));

        vec.add(Model::new());
        assert_eq!(vec.len(), 2);
        assert!(vec.contains(&extra));
    }

    #[test]
    fn debug_format() {
        let vec = ObservableVec::from_members([model! { "id" => 7 }]);
        let debug = format!("{:?}", vec);
        assert!(debug.contains("ObservableVec"));
        assert!(debug.contains("listeners"));
    }
}
