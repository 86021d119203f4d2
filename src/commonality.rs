//! Commonality analysis: which course requirements recur across several
//! prerequisite trees, reported at the largest grouping of trees that
//! shares them, plus a best-effort containment inference between trees.
//!
//! The sub-grouping enumeration is a power set per shared course code, so
//! cost grows exponentially with the number of trees in one call. That is a
//! deliberate scope limit: callers compare a handful of desired courses at
//! a time, not whole catalogs.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::instrument;

use crate::arena::CourseTree;
use crate::errors::TreeResult;

/// A set of tree keys (root course codes), identifying one grouping of trees.
pub type Grouping = BTreeSet<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonalityReport {
    /// Grouping → course codes common to the trees of that grouping, after
    /// dominance pruning (each code appears under its largest grouping only).
    pub commonality: BTreeMap<Grouping, BTreeSet<String>>,
    /// Contained tree key → tree keys whose prerequisite structure is
    /// inferred to contain it. Heuristic: inferred when a grouping's own key
    /// shows up among that grouping's shared codes.
    pub containment: BTreeMap<String, BTreeSet<String>>,
}

impl CommonalityReport {
    pub fn is_empty(&self) -> bool {
        self.commonality.is_empty() && self.containment.is_empty()
    }
}

/// Analyzes the given trees, keyed by their root course codes.
///
/// Trees are read-only here; nothing is mutated. Fewer than two trees
/// yields an empty report (no pairwise sharing is possible), which is a
/// valid result rather than an error.
#[instrument(level = "debug", skip(trees))]
pub fn analyze(trees: &[&CourseTree]) -> TreeResult<CommonalityReport> {
    // course code -> keys of the trees whose course set contains it
    let mut occurrences: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for tree in trees {
        let key = tree.root_code()?.to_string();
        for code in tree.course_codes() {
            occurrences.entry(code).or_default().insert(key.clone());
        }
    }
    // a code in a single tree is not common to anything
    occurrences.retain(|_, roots| roots.len() > 1);

    let mut groupings: BTreeMap<Grouping, BTreeSet<String>> = BTreeMap::new();
    let mut subgroupings: BTreeMap<Grouping, Vec<Grouping>> = BTreeMap::new();

    for (code, roots) in &occurrences {
        let subs = proper_subgroupings(roots);
        for sub in &subs {
            groupings
                .entry(sub.clone())
                .or_default()
                .insert(code.clone());
        }
        groupings
            .entry(roots.clone())
            .or_default()
            .insert(code.clone());
        subgroupings.entry(roots.clone()).or_insert(subs);
    }

    // Dominance pruning: a code attributed to a maximal grouping is
    // redundant in every smaller grouping that grouping subsumes.
    for (top, subs) in &subgroupings {
        let top_codes = match groupings.get(top) {
            Some(codes) => codes.clone(),
            None => continue,
        };
        for sub in subs {
            if let Some(codes) = groupings.get_mut(sub) {
                codes.retain(|code| !top_codes.contains(code));
                if codes.is_empty() {
                    groupings.remove(sub);
                }
            }
        }
    }

    let containment = infer_containment(&groupings);
    Ok(CommonalityReport {
        commonality: groupings,
        containment,
    })
}

/// Every sub-combination of `roots` with at least two members, excluding
/// `roots` itself.
fn proper_subgroupings(roots: &Grouping) -> Vec<Grouping> {
    roots
        .iter()
        .cloned()
        .powerset()
        .filter(|combo| combo.len() >= 2 && combo.len() < roots.len())
        .map(|combo| combo.into_iter().collect())
        .collect()
}

/// If a grouping's shared codes include one of its own tree keys X, the
/// other trees in the grouping all require X, so X's tree is inferred to
/// contain them as sub-requirements.
fn infer_containment(
    groupings: &BTreeMap<Grouping, BTreeSet<String>>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut containment: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (grouping, codes) in groupings {
        for container in grouping {
            if !codes.contains(container) {
                continue;
            }
            for contained in grouping {
                if contained != container {
                    containment
                        .entry(contained.clone())
                        .or_default()
                        .insert(container.clone());
                }
            }
        }
    }
    containment
}
