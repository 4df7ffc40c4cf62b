// ============================================================================
// spark-cocomp - Registry
// set / get / unset of named collections
// ============================================================================

use std::rc::Rc;

use tracing::debug;

use super::{CoComp, CompareOptions, EngineInner, Registration, RegistrationOptions};
use crate::collections::{Collection, CollectionEvent, Listener};
use crate::core::error::Result;
use crate::core::types::CollectionName;

impl<C: Collection + ?Sized> CoComp<C> {
    /// Register `handle` under `name`.
    ///
    /// A handle already registered under `name` is replaced: its listener is
    /// removed first and it is returned. Unless `options.silent`, the new
    /// collection is then swept against every peer.
    ///
    /// Fails with [`CoCompError::ReservedName`](crate::CoCompError) for `"0"`
    /// and `"1"`; nothing is registered in that case.
    pub fn set(
        &self,
        name: &str,
        handle: Rc<C>,
        options: RegistrationOptions,
    ) -> Result<Option<Rc<C>>> {
        let name = CollectionName::new(name)?;

        let previous = self
            .inner
            .registry
            .borrow()
            .get(&name)
            .map(|reg| (reg.handle.clone(), reg.listener));
        if let Some((old, listener)) = &previous {
            old.unsubscribe(*listener);
        }

        let epoch = self.inner.take_epoch();
        let listener = handle.subscribe(self.inner.listener_for(name.clone(), epoch));
        self.inner.registry.borrow_mut().insert(
            name.clone(),
            Registration {
                handle,
                listener,
                epoch,
            },
        );

        debug!(
            collection = %name,
            replaced = previous.is_some(),
            silent = options.silent,
            "collection registered"
        );

        if !options.silent {
            self.inner
                .sweep(&[name.as_str()], CompareOptions::default());
        }
        Ok(previous.map(|(old, _)| old))
    }

    /// The handle registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Rc<C>> {
        self.inner
            .registry
            .borrow()
            .get(name)
            .map(|reg| reg.handle.clone())
    }

    /// Unregister `name`, returning its handle.
    ///
    /// Unless `options.silent`, every item of the collection is first treated
    /// as having left it, delivering the matching OUT transitions. Unknown
    /// names, reserved names included, are a no-op.
    pub fn unset(&self, name: &str, options: RegistrationOptions) -> Option<Rc<C>> {
        if !self.contains(name) {
            return None;
        }

        if !options.silent {
            self.inner.sweep(&[name], CompareOptions::reverse());
        }

        // A handler may already have unset it during the sweep
        let reg = self.inner.registry.borrow_mut().shift_remove(name)?;
        reg.handle.unsubscribe(reg.listener);

        debug!(collection = name, silent = options.silent, "collection unregistered");
        Some(reg.handle)
    }
}

impl<C: Collection + ?Sized> EngineInner<C> {
    /// Listener wired onto a registered collection.
    ///
    /// It carries its collection's name and registration epoch, and holds
    /// the engine weakly.
    fn listener_for(self: &Rc<Self>, name: CollectionName, epoch: u64) -> Listener<C::Member> {
        let engine = Rc::downgrade(self);
        Rc::new(move |event: &CollectionEvent<C::Member>| {
            if let Some(engine) = engine.upgrade() {
                engine.handle_event(&name, epoch, event);
            }
        })
    }
}
