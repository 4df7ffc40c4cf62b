// ============================================================================
// spark-cocomp - Pair Planning
// Which unordered collection pairs a sweep visits
// ============================================================================

use crate::core::types::CollectionName;

/// One unordered pair of registered collections, as indices into the
/// registry snapshot the plan was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedPair {
    /// Swept first; the in-scope side when only one side is in scope
    pub first: usize,
    pub second: usize,
    pub first_in_scope: bool,
    pub second_in_scope: bool,
}

/// Build the pairs a sweep must visit.
///
/// An empty `scope` means every pair. Otherwise a pair is kept when either
/// side is named in `scope`. Each unordered pair appears once and no
/// collection is paired with itself. Names in `scope` that are not
/// registered simply match nothing.
pub fn plan_pairs(registered: &[&CollectionName], scope: &[&str]) -> Vec<PlannedPair> {
    let in_scope = |name: &CollectionName| scope.is_empty() || scope.contains(&name.as_str());

    let mut pairs = Vec::new();
    for (i, a) in registered.iter().enumerate() {
        for (j, b) in registered.iter().enumerate().skip(i + 1) {
            let (a_in, b_in) = (in_scope(a), in_scope(b));
            if !a_in && !b_in {
                continue;
            }

            // Lead with the in-scope side so one-way sweeps start from it
            let pair = if !a_in && b_in {
                PlannedPair {
                    first: j,
                    second: i,
                    first_in_scope: true,
                    second_in_scope: false,
                }
            } else {
                PlannedPair {
                    first: i,
                    second: j,
                    first_in_scope: a_in,
                    second_in_scope: b_in,
                }
            };
            pairs.push(pair);
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<CollectionName> {
        raw.iter()
            .map(|n| CollectionName::new(*n).unwrap())
            .collect()
    }

    #[test]
    fn empty_scope_plans_every_pair_once() {
        let owned = names(&["a", "b", "c", "d"]);
        let registered: Vec<&CollectionName> = owned.iter().collect();

        let pairs = plan_pairs(&registered, &[]);
        assert_eq!(pairs.len(), 6);

        let mut seen = std::collections::HashSet::new();
        for pair in &pairs {
            assert_ne!(pair.first, pair.second);
            let key = (pair.first.min(pair.second), pair.first.max(pair.second));
            assert!(seen.insert(key), "pair {key:?} planned twice");
            assert!(pair.first_in_scope && pair.second_in_scope);
        }
    }

    #[test]
    fn scoped_plan_leaves_unrelated_pairs_out() {
        let owned = names(&["a", "b", "c"]);
        let registered: Vec<&CollectionName> = owned.iter().collect();

        let pairs = plan_pairs(&registered, &["b"]);
        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert_eq!(pair.first, 1, "the in-scope side leads");
            assert!(pair.first_in_scope);
            assert!(!pair.second_in_scope);
        }
    }

    #[test]
    fn duplicate_and_unknown_scope_names_are_harmless() {
        let owned = names(&["a", "b", "c"]);
        let registered: Vec<&CollectionName> = owned.iter().collect();

        assert_eq!(plan_pairs(&registered, &["a", "a"]).len(), 2);
        assert_eq!(plan_pairs(&registered, &["a", "b"]).len(), 3);
        assert!(plan_pairs(&registered, &["zzz"]).is_empty());
    }

    #[test]
    fn single_collection_has_no_pairs() {
        let owned = names(&["solo"]);
        let registered: Vec<&CollectionName> = owned.iter().collect();
        assert!(plan_pairs(&registered, &[]).is_empty());
    }
}
