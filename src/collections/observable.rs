// ============================================================================
// spark-cocomp - Observable Collection Contract
// What the engine needs from a mutable collection
// ============================================================================

use std::rc::Rc;

use crate::core::types::Member;

/// Structural change reported by a collection.
#[derive(Debug, Clone)]
pub enum CollectionEvent<M> {
    /// An item was inserted
    Add(M),
    /// An item was removed (it is no longer in the collection)
    Remove(M),
    /// The contents were replaced wholesale
    Reset,
}

/// Callback invoked synchronously for every structural change.
pub type Listener<M> = Rc<dyn Fn(&CollectionEvent<M>)>;

/// Box a closure as a [`Listener`].
pub fn listener<M, F>(f: F) -> Listener<M>
where
    F: Fn(&CollectionEvent<M>) + 'static,
{
    Rc::new(f)
}

/// Handle identifying one subscription on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A mutable collection the engine can observe.
///
/// Implementations must dispatch events synchronously, after the change is
/// visible through [`Collection::members`], and must not hold internal
/// borrows while listeners run: listeners may read or mutate the collection.
pub trait Collection: 'static {
    type Member: Member;

    /// Snapshot of the current items.
    fn members(&self) -> Vec<Self::Member>;

    fn subscribe(&self, listener: Listener<Self::Member>) -> ListenerId;

    /// Stop delivering events to `id`. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}
