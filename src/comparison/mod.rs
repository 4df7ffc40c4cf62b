// ============================================================================
// spark-cocomp - Comparison Module
// Equivalence predicates, pair planning, and transition delivery
// ============================================================================

pub mod equality;
pub mod ledger;
pub mod plan;

pub use equality::{Comparator, PairKey, Pairing, PredicateFn};
pub use ledger::Delivery;
pub use plan::{plan_pairs, PlannedPair};
