// ============================================================================
// spark-cocomp - Incremental Path
// Reacting to a single item being added to or removed from a collection
// ============================================================================

use tracing::{debug, error};

use super::{CompareOptions, EngineInner};
use crate::collections::{Collection, CollectionEvent};
use crate::comparison::Delivery;
use crate::core::error::Result;
use crate::core::types::{CollectionName, MembershipEvent};

impl<C: Collection + ?Sized> EngineInner<C> {
    /// Entry point for events from a registered collection.
    ///
    /// Listeners cannot return errors, so a failure here is logged and the
    /// event dropped. `ObservableVec` never calls an unsubscribed listener;
    /// only a collection that keeps delivering after `unsubscribe` gets here.
    pub(super) fn handle_event(
        &self,
        name: &CollectionName,
        epoch: u64,
        event: &CollectionEvent<C::Member>,
    ) {
        let result = match event {
            CollectionEvent::Add(member) => self.on_add(name, epoch, member),
            CollectionEvent::Remove(member) => self.on_remove(name, epoch, member),
            CollectionEvent::Reset => self.on_reset(name, epoch),
        };
        if let Err(err) = result {
            error!(collection = %name, epoch, %err, "collection event from a stale registration");
        }
    }

    /// `member` was added to `name`: check it against every peer.
    pub(super) fn on_add(
        &self,
        name: &CollectionName,
        epoch: u64,
        member: &C::Member,
    ) -> Result<usize> {
        let origin = self.resolve(name, epoch)?;
        let peers = self.peers_of(&origin.name);

        let mut delivery = Delivery::new(&self.namespace);
        for peer in &peers {
            let peer_members = peer.handle.members();
            if !self.arrive(&mut delivery, member, &origin.name, peer, &peer_members) {
                delivery.notify(member, MembershipEvent::left(peer.name.clone()));
            }
        }
        Ok(delivery.delivered())
    }

    /// `member` was removed from `name`: it leaves `name`, and peer items it
    /// alone was matching leave `name` too.
    pub(super) fn on_remove(
        &self,
        name: &CollectionName,
        epoch: u64,
        member: &C::Member,
    ) -> Result<usize> {
        let origin = self.resolve(name, epoch)?;
        let peers = self.peers_of(&origin.name);
        if peers.is_empty() {
            return Ok(0);
        }

        let mut delivery = Delivery::new(&self.namespace);
        delivery.notify(member, MembershipEvent::left(origin.name.clone()));

        for peer in &peers {
            let remaining = origin.handle.members();
            let peer_members = peer.handle.members();
            self.depart(
                &mut delivery,
                member,
                &origin.name,
                &remaining,
                peer,
                &peer_members,
            );
        }
        Ok(delivery.delivered())
    }

    /// `name` was reset: sweep it, and only it, against every peer.
    pub(super) fn on_reset(&self, name: &CollectionName, epoch: u64) -> Result<usize> {
        let origin = self.resolve(name, epoch)?;
        debug!(collection = %origin.name, "collection reset");
        Ok(self.sweep(&[origin.name.as_str()], CompareOptions::default()))
    }
}
