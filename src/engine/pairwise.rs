// ============================================================================
// spark-cocomp - Pairwise Comparison
// One item against one peer collection, arriving or departing
// ============================================================================
//
// Both paths share these two primitives:
//
// arrive: `member` counts as being in `origin`. It gets IN for `peer` if any
//   peer item is equivalent. Every equivalent peer item gets IN for `origin`,
//   since `member` may be the first thing in `origin` to match it. Returns
//   false when nothing matched; the caller decides when to send OUT.
//
// depart: `member` no longer counts as being in `origin`. Every equivalent
//   peer item that nothing left in `origin` still matches gets OUT for
//   `origin`. If no peer item is equivalent, `member` gets OUT for `peer`.
// ============================================================================

use super::{EngineInner, Entry};
use crate::collections::Collection;
use crate::comparison::{Delivery, Pairing};
use crate::core::types::{CollectionName, Member, MembershipEvent};

impl<C: Collection + ?Sized> EngineInner<C> {
    fn equivalent(
        &self,
        origin: &CollectionName,
        member: &C::Member,
        peer: &CollectionName,
        candidate: &C::Member,
    ) -> bool {
        self.comparator
            .equivalent(&Pairing::new(origin, member, peer, candidate))
    }

    pub(super) fn arrive(
        &self,
        delivery: &mut Delivery<'_, C::Member>,
        member: &C::Member,
        origin: &CollectionName,
        peer: &Entry<C>,
        peer_members: &[C::Member],
    ) -> bool {
        let matches: Vec<&C::Member> = peer_members
            .iter()
            .filter(|candidate| self.equivalent(origin, member, &peer.name, candidate))
            .collect();

        let Some(first) = matches.first() else {
            return false;
        };

        delivery.notify(
            member,
            MembershipEvent::entered(peer.name.clone(), (*first).clone()),
        );
        for candidate in matches {
            delivery.notify(
                candidate,
                MembershipEvent::entered(origin.clone(), member.clone()),
            );
        }
        true
    }

    pub(super) fn depart(
        &self,
        delivery: &mut Delivery<'_, C::Member>,
        member: &C::Member,
        origin: &CollectionName,
        remaining: &[C::Member],
        peer: &Entry<C>,
        peer_members: &[C::Member],
    ) {
        let departed = member.identity();
        let mut matched = false;

        for candidate in peer_members {
            if !self.equivalent(origin, member, &peer.name, candidate) {
                continue;
            }
            matched = true;

            let still_supported = remaining.iter().any(|other| {
                other.identity() != departed
                    && self.equivalent(origin, other, &peer.name, candidate)
            });
            if !still_supported {
                delivery.notify(candidate, MembershipEvent::left(origin.clone()));
            }
        }

        if !matched {
            delivery.notify(member, MembershipEvent::left(peer.name.clone()));
        }
    }
}
