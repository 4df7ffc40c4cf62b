// ============================================================================
// spark-cocomp - EventHub
// Per-item named-event subscription and synchronous emission
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

/// Handle returned by [`EventHub::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<P> = Rc<dyn Fn(&str, &P)>;

/// Which events a handler receives.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Filter {
    Exact(String),
    All,
}

impl Filter {
    fn matches(&self, event: &str) -> bool {
        match self {
            Filter::Exact(name) => name == event,
            Filter::All => true,
        }
    }
}

struct Subscription<P> {
    filter: Filter,
    handler: Handler<P>,
}

/// A small synchronous pub/sub keyed by event name.
///
/// Handlers run in subscription order, from a snapshot, so a handler may
/// subscribe or unsubscribe (itself included) while being called.
///
/// # Example
///
/// ```
/// use spark_cocomp::EventHub;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let hub: EventHub<i32> = EventHub::new();
/// let total = Rc::new(Cell::new(0));
///
/// let total_clone = total.clone();
/// let id = hub.on("tick", move |n| total_clone.set(total_clone.get() + *n));
///
/// hub.emit("tick", &2);
/// hub.emit("tock", &100);
/// assert_eq!(total.get(), 2);
///
/// hub.off(id);
/// hub.emit("tick", &2);
/// assert_eq!(total.get(), 2);
/// ```
pub struct EventHub<P> {
    subscriptions: RefCell<IndexMap<SubscriptionId, Subscription<P>>>,
    next_id: Cell<u64>,
}

impl<P> EventHub<P> {
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(IndexMap::new()),
            next_id: Cell::new(0),
        }
    }

    fn insert(&self, filter: Filter, handler: Handler<P>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions
            .borrow_mut()
            .insert(id, Subscription { filter, handler });
        id
    }

    /// Subscribe to one event name.
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&P) + 'static,
    {
        self.insert(
            Filter::Exact(event.into()),
            Rc::new(move |_: &str, payload: &P| handler(payload)),
        )
    }

    /// Subscribe to every event; the handler also receives the event name.
    pub fn on_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &P) + 'static,
    {
        self.insert(Filter::All, Rc::new(handler))
    }

    /// Unsubscribe. Returns false if `id` was not subscribed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.subscriptions.borrow_mut().shift_remove(&id).is_some()
    }

    /// Call every handler subscribed to `event`. Returns how many ran.
    pub fn emit(&self, event: &str, payload: &P) -> usize {
        let snapshot: Vec<(SubscriptionId, Handler<P>)> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|(_, sub)| sub.filter.matches(event))
            .map(|(id, sub)| (*id, sub.handler.clone()))
            .collect();

        let mut ran = 0;
        for (id, handler) in snapshot {
            if !self.subscriptions.borrow().contains_key(&id) {
                continue;
            }
            handler(event, payload);
            ran += 1;
        }
        ran
    }

    /// Number of handlers that would receive `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.subscriptions
            .borrow()
            .values()
            .filter(|sub| sub.filter.matches(event))
            .count()
    }
}

impl<P> Default for EventHub<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for EventHub<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish()
    }
}
