// ============================================================================
// spark-cocomp - Delivery Ledger
// Emits transitions, at most once per (item, peer, direction) per dispatch
// ============================================================================

use std::collections::HashSet;

use tracing::trace;

use crate::core::constants::{event_name, peer_event_name};
use crate::core::types::{CollectionName, Direction, Member, MembershipEvent};

/// Tracks the transitions already delivered during one triggering operation
/// (a single add, remove, reset, or explicit sweep).
///
/// Each transition is delivered as two events on the item: the generic
/// `<ns>:<dir>` first, then the peer-specific `<ns>:<dir>:<peer>`.
pub struct Delivery<'a, M: Member> {
    namespace: &'a str,
    sent: HashSet<(M::Id, CollectionName, Direction)>,
}

impl<'a, M: Member> Delivery<'a, M> {
    pub fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            sent: HashSet::new(),
        }
    }

    /// Deliver `event` to `item` unless the same transition already went out.
    ///
    /// Returns true if the events were emitted.
    pub fn notify(&mut self, item: &M, event: MembershipEvent<M>) -> bool {
        let key = (item.identity(), event.peer.clone(), event.direction);
        if !self.sent.insert(key) {
            return false;
        }

        trace!(
            item = ?item.identity(),
            peer = %event.peer,
            direction = %event.direction,
            "membership transition"
        );

        // Handlers may re-enter the engine from here
        item.trigger(&event_name(self.namespace, event.direction), &event);
        item.trigger(
            &peer_event_name(self.namespace, event.direction, event.peer.as_str()),
            &event,
        );
        true
    }

    /// Whether `item` already received `direction` for `peer`.
    pub fn has_delivered(&self, item: &M, peer: &CollectionName, direction: Direction) -> bool {
        self.sent
            .contains(&(item.identity(), peer.clone(), direction))
    }

    /// Number of distinct transitions delivered so far.
    pub fn delivered(&self) -> usize {
        self.sent.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(model: &Model) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        model.on_all(move |name, _| log_clone.borrow_mut().push(name.to_string()));
        log
    }

    #[test]
    fn generic_event_precedes_peer_event() {
        let item = Model::new();
        let log = recorder(&item);
        let veg = CollectionName::new("veg").unwrap();

        let mut delivery = Delivery::new("membership");
        assert!(delivery.notify(&item, MembershipEvent::left(veg)));

        assert_eq!(
            *log.borrow(),
            vec!["membership:out".to_string(), "membership:out:veg".to_string()]
        );
    }

    #[test]
    fn repeated_transition_is_suppressed() {
        let item = Model::new();
        let other = Model::new();
        let log = recorder(&item);
        let veg = CollectionName::new("veg").unwrap();

        let mut delivery = Delivery::new("membership");
        assert!(delivery.notify(&item, MembershipEvent::entered(veg.clone(), other.clone())));
        assert!(!delivery.notify(&item, MembershipEvent::entered(veg.clone(), other)));
        assert!(delivery.notify(&item, MembershipEvent::left(veg)));

        assert_eq!(log.borrow().len(), 4);
        assert_eq!(delivery.delivered(), 2);
    }

    #[test]
    fn has_delivered_tracks_direction_and_peer() {
        let item = Model::new();
        let veg = CollectionName::new("veg").unwrap();
        let fruit = CollectionName::new("fruit").unwrap();

        let mut delivery = Delivery::new("membership");
        assert!(!delivery.has_delivered(&item, &veg, Direction::In));
        delivery.notify(&item, MembershipEvent::entered(veg.clone(), Model::new()));

        assert!(delivery.has_delivered(&item, &veg, Direction::In));
        assert!(!delivery.has_delivered(&item, &veg, Direction::Out));
        assert!(!delivery.has_delivered(&item, &fruit, Direction::In));
    }

    #[test]
    fn clones_share_identity() {
        let item = Model::new();
        let log = recorder(&item);
        let veg = CollectionName::new("veg").unwrap();

        let mut delivery = Delivery::new("membership");
        delivery.notify(&item, MembershipEvent::left(veg.clone()));
        delivery.notify(&item.clone(), MembershipEvent::left(veg));

        assert_eq!(log.borrow().len(), 2);
    }
}
