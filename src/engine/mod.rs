// ============================================================================
// spark-cocomp - Comparison Engine
// Registry of named collections wired to the pairwise comparison paths
// ============================================================================
//
// Control flow:
//   set(name, handle)   -> subscribe to add/remove/reset, sweep name vs peers
//   add / remove        -> incremental path (incremental.rs)
//   reset / compare()   -> bulk path (bulk.rs)
//   unset(name)         -> reverse sweep, then unsubscribe
//
// Everything runs synchronously. Notification handlers may mutate any
// collection, which re-enters the engine depth-first before the outer
// operation resumes. No RefCell borrow is held across a notification.
// ============================================================================

mod bulk;
mod incremental;
mod pairwise;
mod registry;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::collections::{Collection, ListenerId};
use crate::comparison::Comparator;
use crate::core::constants::{DEFAULT_NAMESPACE, EVENT_SEPARATOR};
use crate::core::error::{CoCompError, Result};
use crate::core::types::{CollectionName, Member};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Engine construction options.
///
/// # Example
///
/// ```
/// use spark_cocomp::{CoComp, CoCompConfig, Comparator, Model, ObservableVec};
///
/// let config = CoCompConfig::default()
///     .comparator(Comparator::attribute("sku"))
///     .namespace("stock");
/// let engine: CoComp<ObservableVec<Model>> = CoComp::new(config).unwrap();
/// assert_eq!(engine.namespace(), "stock");
/// ```
pub struct CoCompConfig<M> {
    pub comparator: Comparator<M>,
    pub namespace: String,
}

impl<M: Member> CoCompConfig<M> {
    pub fn comparator(mut self, comparator: Comparator<M>) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn validate(&self) -> Result<()> {
        self.comparator.validate()?;
        if self.namespace.is_empty() || self.namespace.contains(EVENT_SEPARATOR) {
            return Err(CoCompError::InvalidConfig {
                reason: format!(
                    "event namespace {:?} must be non-empty and free of {EVENT_SEPARATOR:?}",
                    self.namespace
                ),
            });
        }
        Ok(())
    }
}

impl<M: Member> Default for CoCompConfig<M> {
    fn default() -> Self {
        Self {
            comparator: Comparator::default(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Options for [`CoComp::set`] and [`CoComp::unset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationOptions {
    /// Skip the comparison sweep that normally accompanies the change
    pub silent: bool,
}

impl RegistrationOptions {
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Options for [`CoComp::compare`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Treat every in-scope collection as having just lost all its items
    pub reverse: bool,
    /// Only sweep each pair from its leading side, skipping the mirror pass.
    ///
    /// Has no effect together with `reverse`: a reverse sweep only departs
    /// the in-scope sides and has no mirror pass to skip.
    pub one_way: bool,
}

impl CompareOptions {
    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }

    pub fn one_way() -> Self {
        Self {
            one_way: true,
            ..Self::default()
        }
    }
}

// =============================================================================
// SHARED STATE
// =============================================================================

/// A live registration.
struct Registration<C: ?Sized> {
    handle: Rc<C>,
    listener: ListenerId,
    /// Distinguishes successive registrations under the same name
    epoch: u64,
}

/// A registry entry captured for the duration of one operation.
pub(crate) struct Entry<C: ?Sized> {
    pub name: CollectionName,
    pub handle: Rc<C>,
}

impl<C: ?Sized> Clone for Entry<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handle: self.handle.clone(),
        }
    }
}

pub(crate) struct EngineInner<C: Collection + ?Sized> {
    comparator: Comparator<C::Member>,
    namespace: String,
    registry: RefCell<IndexMap<CollectionName, Registration<C>>>,
    next_epoch: Cell<u64>,
}

impl<C: Collection + ?Sized> EngineInner<C> {
    /// Registered collections in registration order.
    fn snapshot(&self) -> Vec<Entry<C>> {
        self.registry
            .borrow()
            .iter()
            .map(|(name, reg)| Entry {
                name: name.clone(),
                handle: reg.handle.clone(),
            })
            .collect()
    }

    /// Every registered collection except `name`.
    fn peers_of(&self, name: &CollectionName) -> Vec<Entry<C>> {
        self.snapshot()
            .into_iter()
            .filter(|entry| &entry.name != name)
            .collect()
    }

    /// The handle registered under `name` by the registration `epoch`.
    fn resolve(&self, name: &CollectionName, epoch: u64) -> Result<Entry<C>> {
        self.registry
            .borrow()
            .get(name)
            .filter(|reg| reg.epoch == epoch)
            .map(|reg| Entry {
                name: name.clone(),
                handle: reg.handle.clone(),
            })
            .ok_or_else(|| CoCompError::UnresolvedCollection {
                name: name.to_string(),
            })
    }

    fn take_epoch(&self) -> u64 {
        let epoch = self.next_epoch.get();
        self.next_epoch.set(epoch + 1);
        epoch
    }
}

impl<C: Collection + ?Sized> Drop for EngineInner<C> {
    fn drop(&mut self) {
        let registry = self.registry.get_mut();
        if !registry.is_empty() {
            debug!(collections = registry.len(), "engine dropped, releasing listeners");
        }
        for (_, reg) in registry.drain(..) {
            reg.handle.unsubscribe(reg.listener);
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Keeps every item of every registered collection informed about whether an
/// equivalent item exists in each other registered collection.
///
/// Transitions are delivered on the items themselves as two events each:
/// `<ns>:in` / `<ns>:out`, then `<ns>:in:<peer>` / `<ns>:out:<peer>`.
/// Within one triggering operation an item receives a given transition for
/// a given peer at most once.
///
/// `CoComp` is a cheap handle; clones share the same registry. Collections
/// only hold weak references back to the engine, and dropping the last
/// handle unsubscribes from every registered collection.
///
/// # Example
///
/// ```
/// use spark_cocomp::{model, CoComp, Model, ObservableVec, RegistrationOptions};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let engine: CoComp<ObservableVec<Model>> = CoComp::default();
/// let fruit = Rc::new(ObservableVec::new());
/// let veg = Rc::new(ObservableVec::new());
/// engine.set("fruit", fruit.clone(), RegistrationOptions::default()).unwrap();
/// engine.set("veg", veg.clone(), RegistrationOptions::default()).unwrap();
///
/// let tomato = model! { "id" => 7 };
/// let in_veg = Rc::new(Cell::new(false));
/// let in_veg_clone = in_veg.clone();
/// tomato.on("membership:in:veg", move |_| in_veg_clone.set(true));
///
/// fruit.add(tomato.clone());
/// assert!(!in_veg.get());
///
/// veg.add(model! { "id" => 7 });
/// assert!(in_veg.get());
/// ```
pub struct CoComp<C: Collection + ?Sized> {
    inner: Rc<EngineInner<C>>,
}

impl<C: Collection + ?Sized> CoComp<C> {
    /// Create an engine, validating the configuration.
    pub fn new(config: CoCompConfig<C::Member>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// `config` must already have passed validation.
    fn from_validated(config: CoCompConfig<C::Member>) -> Self {
        debug!(comparator = ?config.comparator, namespace = %config.namespace, "engine created");
        Self {
            inner: Rc::new(EngineInner {
                comparator: config.comparator,
                namespace: config.namespace,
                registry: RefCell::new(IndexMap::new()),
                next_epoch: Cell::new(0),
            }),
        }
    }

    /// Create an engine with the default namespace and the given comparator.
    pub fn with_comparator(comparator: Comparator<C::Member>) -> Result<Self> {
        Self::new(CoCompConfig::default().comparator(comparator))
    }

    pub fn comparator(&self) -> &Comparator<C::Member> {
        &self.inner.comparator
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<CollectionName> {
        self.inner.registry.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.registry.borrow().contains_key(name)
    }
}

impl<C: Collection + ?Sized> Clone for CoComp<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Collection + ?Sized> Default for CoComp<C> {
    fn default() -> Self {
        Self::from_validated(CoCompConfig::default())
    }
}

impl<C: Collection + ?Sized> std::fmt::Debug for CoComp<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoComp")
            .field("comparator", &self.inner.comparator)
            .field("namespace", &self.inner.namespace)
            .field("collections", &self.names())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
