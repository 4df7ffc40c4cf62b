// ============================================================================
// spark-cocomp - Cross-Collection Membership Reconciliation
// ============================================================================
//
// Register several independently mutated collections under unique names and
// every item learns, through `<ns>:in[:peer]` / `<ns>:out[:peer]` events,
// whether an equivalent item exists in each of the other collections.
// ============================================================================

pub mod collections;
pub mod comparison;
pub mod core;
pub mod engine;
pub mod model;

mod macros;

#[doc(hidden)]
pub use serde_json as __serde_json;

// Re-export core items at crate root for ergonomic access
pub use core::constants;
pub use core::error::{CoCompError, Result};
pub use core::types::{CollectionName, Direction, Member, MembershipEvent, Slot};

pub use collections::{listener, Collection, CollectionEvent, Listener, ListenerId, ObservableVec};
pub use comparison::{Comparator, PairKey, Pairing, PredicateFn};
pub use engine::{CoComp, CoCompConfig, CompareOptions, RegistrationOptions};
pub use model::{EventHub, Model, ModelId, SubscriptionId};

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Engine = CoComp<ObservableVec<Model>>;

    fn log_of(m: &Model) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        m.on_all(cloned!(log => move |name, _| log.borrow_mut().push(name.to_string())));
        log
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[test]
    fn scenario_fruit_and_veg_by_id() {
        let engine = Engine::default();
        let fruit = Rc::new(ObservableVec::new());
        let veg = Rc::new(ObservableVec::new());

        let apple = model! { "id" => 1 };
        let log = log_of(&apple);

        engine
            .set("fruit", fruit.clone(), RegistrationOptions::default())
            .unwrap();
        fruit.add(apple.clone());
        assert!(log.borrow().is_empty(), "no peers yet");

        veg.add(apple.clone());
        engine
            .set("veg", veg.clone(), RegistrationOptions::default())
            .unwrap();
        assert!(log.borrow().contains(&"membership:in:veg".to_string()));

        log.borrow_mut().clear();
        veg.remove(&apple);
        assert!(log.borrow().contains(&"membership:out:veg".to_string()));
        assert!(!log.borrow().iter().any(|e| e.starts_with("membership:in")));
    }

    #[test]
    fn scenario_identity_ignores_equal_attributes() {
        let engine = Engine::with_comparator(Comparator::parse("===").unwrap()).unwrap();
        let a = Rc::new(ObservableVec::new());
        let b = Rc::new(ObservableVec::new());
        let c = Rc::new(ObservableVec::new());
        for (name, coll) in [("a", &a), ("b", &b), ("c", &c)] {
            engine
                .set(name, coll.clone(), RegistrationOptions::default())
                .unwrap();
        }

        let first = model! { "id" => 1, "name" => "apple" };
        let second = model! { "id" => 1, "name" => "apple" };
        a.add(first.clone());

        let log = log_of(&second);
        b.add(second.clone());
        assert_eq!(
            *log.borrow(),
            vec![
                "membership:out",
                "membership:out:a",
                "membership:out",
                "membership:out:c",
            ]
        );

        // The very same instance does match
        log.borrow_mut().clear();
        c.add(second.clone());
        assert!(log.borrow().contains(&"membership:in:b".to_string()));
    }

    #[test]
    fn silent_registration_and_removal_emit_nothing() {
        let engine = Engine::default();
        let apple = model! { "id" => 1 };
        let copy = model! { "id" => 1 };
        let log = log_of(&apple);
        let copy_log = log_of(&copy);

        let fruit = Rc::new(ObservableVec::from_members([apple.clone()]));
        let veg = Rc::new(ObservableVec::from_members([copy.clone()]));
        engine.set("fruit", fruit, RegistrationOptions::silent()).unwrap();
        engine.set("veg", veg, RegistrationOptions::silent()).unwrap();
        engine.unset("veg", RegistrationOptions::silent());

        assert!(log.borrow().is_empty());
        assert!(copy_log.borrow().is_empty());
    }

    #[test]
    fn unset_matches_removing_every_item() {
        let build = || {
            let engine = Engine::default();
            let apple = model! { "id" => 1 };
            let pear = model! { "id" => 2 };
            let copy = model! { "id" => 1 };
            let fruit = Rc::new(ObservableVec::from_members([apple.clone(), pear.clone()]));
            let basket = Rc::new(ObservableVec::from_members([copy.clone()]));
            engine
                .set("fruit", fruit.clone(), RegistrationOptions::silent())
                .unwrap();
            engine
                .set("basket", basket, RegistrationOptions::silent())
                .unwrap();
            let logs = [log_of(&apple), log_of(&pear), log_of(&copy)];
            (engine, fruit, [apple, pear], logs)
        };

        let (engine, _fruit, _, unset_logs) = build();
        engine.unset("fruit", RegistrationOptions::default());

        let (_engine, fruit, items, remove_logs) = build();
        for item in &items {
            fruit.remove(item);
        }

        for (unset_log, remove_log) in unset_logs.iter().zip(remove_logs.iter()) {
            let mut unset_events = unset_log.borrow().clone();
            let mut remove_events = remove_log.borrow().clone();
            unset_events.sort();
            remove_events.sort();
            unset_events.dedup();
            remove_events.dedup();
            assert_eq!(unset_events, remove_events);
        }
    }

    #[test]
    fn custom_namespace_prefixes_events() {
        let engine = Engine::new(CoCompConfig::default().namespace("cocomp")).unwrap();
        let fruit = Rc::new(ObservableVec::new());
        let veg = Rc::new(ObservableVec::new());
        engine.set("fruit", fruit.clone(), RegistrationOptions::default()).unwrap();
        engine.set("veg", veg, RegistrationOptions::default()).unwrap();

        let apple = model! { "id" => 1 };
        let log = log_of(&apple);
        fruit.add(apple);
        assert_eq!(*log.borrow(), vec!["cocomp:out", "cocomp:out:veg"]);
    }
}
