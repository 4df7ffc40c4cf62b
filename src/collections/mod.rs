// ============================================================================
// spark-cocomp - Collections
// The observable-collection contract plus one ready-made implementation
// ============================================================================
//
// The engine never stores items itself. It observes collections through the
// `Collection` trait: snapshot the members, subscribe to add/remove/reset.
// `ObservableVec` is a minimal ordered implementation of that contract.
// ============================================================================

mod observable;
mod vec;

pub use observable::{listener, Collection, CollectionEvent, Listener, ListenerId};
pub use vec::ObservableVec;
