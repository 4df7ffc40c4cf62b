// ============================================================================
// spark-cocomp - Bulk Path
// Explicit compare() sweeps, also used by set, unset, and reset
// ============================================================================

use tracing::debug;

use super::{CoComp, CompareOptions, EngineInner, Entry};
use crate::collections::Collection;
use crate::comparison::{plan_pairs, Delivery};
use crate::core::types::{CollectionName, Direction, MembershipEvent};

impl<C: Collection + ?Sized> CoComp<C> {
    /// Re-evaluate membership across registered collections.
    ///
    /// With no `names`, every pair of registered collections is swept.
    /// Otherwise only pairs with at least one side named in `names` are;
    /// unknown names are ignored. Each unordered pair is visited once.
    ///
    /// Returns the number of distinct transitions delivered.
    ///
    /// # Example
    ///
    /// ```
    /// use spark_cocomp::{model, CoComp, CompareOptions, Model, ObservableVec, RegistrationOptions};
    /// use std::rc::Rc;
    ///
    /// let engine: CoComp<ObservableVec<Model>> = CoComp::default();
    /// let fruit = Rc::new(ObservableVec::from_members([model! { "id" => 1 }]));
    /// let veg = Rc::new(ObservableVec::from_members([model! { "id" => 1 }]));
    /// engine.set("fruit", fruit, RegistrationOptions::silent()).unwrap();
    /// engine.set("veg", veg, RegistrationOptions::silent()).unwrap();
    ///
    /// // Both items enter the other collection
    /// assert_eq!(engine.compare(&[], CompareOptions::default()), 2);
    /// ```
    pub fn compare(&self, names: &[&str], options: CompareOptions) -> usize {
        self.inner.sweep(names, options)
    }

    /// Sweep every registered pair.
    pub fn compare_all(&self) -> usize {
        self.compare(&[], CompareOptions::default())
    }
}

impl<C: Collection + ?Sized> EngineInner<C> {
    pub(super) fn sweep(&self, scope: &[&str], options: CompareOptions) -> usize {
        let entries = self.snapshot();
        let names: Vec<&CollectionName> = entries.iter().map(|entry| &entry.name).collect();
        let pairs = plan_pairs(&names, scope);

        debug!(
            scope = ?scope,
            pairs = pairs.len(),
            reverse = options.reverse,
            one_way = options.one_way,
            "comparison sweep"
        );

        let mut delivery = Delivery::new(&self.namespace);
        for pair in &pairs {
            let first = &entries[pair.first];
            let second = &entries[pair.second];

            if options.reverse {
                if pair.first_in_scope {
                    self.sweep_departing(&mut delivery, first, second);
                }
                if pair.second_in_scope {
                    self.sweep_departing(&mut delivery, second, first);
                }
            } else {
                let mut unmatched = Vec::new();
                self.sweep_arriving(&mut delivery, &mut unmatched, first, second);
                if !options.one_way {
                    self.sweep_arriving(&mut delivery, &mut unmatched, second, first);
                }

                // OUT only once neither order of the pair found a match
                for (member, peer) in unmatched {
                    if !delivery.has_delivered(&member, &peer, Direction::In) {
                        delivery.notify(&member, MembershipEvent::left(peer));
                    }
                }
            }
        }

        let delivered = delivery.delivered();
        debug!(delivered, "comparison sweep finished");
        delivered
    }

    /// Every item of `origin` is checked against `peer`. Items with no
    /// equivalent are pushed onto `unmatched` with the peer they missed.
    fn sweep_arriving(
        &self,
        delivery: &mut Delivery<'_, C::Member>,
        unmatched: &mut Vec<(C::Member, CollectionName)>,
        origin: &Entry<C>,
        peer: &Entry<C>,
    ) {
        let peer_members = peer.handle.members();
        for member in origin.handle.members() {
            if !self.arrive(delivery, &member, &origin.name, peer, &peer_members) {
                unmatched.push((member, peer.name.clone()));
            }
        }
    }

    /// Every item of `origin` leaves it, as if `origin` had been emptied.
    fn sweep_departing(
        &self,
        delivery: &mut Delivery<'_, C::Member>,
        origin: &Entry<C>,
        peer: &Entry<C>,
    ) {
        let peer_members = peer.handle.members();
        for member in origin.handle.members() {
            delivery.notify(&member, MembershipEvent::left(origin.name.clone()));
            self.depart(delivery, &member, &origin.name, &[], peer, &peer_members);
        }
    }
}
