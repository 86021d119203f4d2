//! Completion propagation: given a set of completed course codes, computes
//! the derived status flags for every node of a tree, in place.

use std::collections::BTreeSet;

use generational_arena::Index;
use tracing::instrument;

use crate::arena::{CourseTree, NodeKind};

/// Convenience: collects course codes into the set shape [`propagate`] takes.
pub fn completed_set<'a>(codes: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    codes.into_iter().map(str::to_string).collect()
}

/// Two full walks over the tree.
///
/// Pass 1 sets `completed` on every course node. Pass 2 runs strictly
/// bottom-up (post-order), so children carry final flags before their parent
/// is computed: an OR is marked when any child is completed or marked, an
/// AND when all are (vacuously true without children), and a course is ready
/// to take when it has no children or all of them are completed or marked.
/// Course nodes never get `marked`; `ready_to_take` is their satisfaction
/// signal. Flags are assigned outright, so the walk is idempotent and a
/// tree can be re-propagated with a different completed set.
#[instrument(level = "debug", skip(tree, completed))]
pub fn propagate(tree: &mut CourseTree, completed: &BTreeSet<String>) {
    let order: Vec<Index> = tree.iter_postorder().map(|(idx, _)| idx).collect();

    for &idx in &order {
        if let Some(node) = tree.get_mut(idx) {
            if let NodeKind::Course { code, .. } = &node.kind {
                node.status.completed = completed.contains(code.as_str());
            }
        }
    }

    for &idx in &order {
        let children = match tree.get(idx) {
            Some(node) => node.children.clone(),
            None => continue,
        };
        let all_satisfied = children.iter().all(|&c| child_satisfied(tree, c));
        let any_satisfied = children.iter().any(|&c| child_satisfied(tree, c));

        if let Some(node) = tree.get_mut(idx) {
            match node.kind {
                NodeKind::Or { .. } => node.status.marked = any_satisfied,
                NodeKind::And { .. } => node.status.marked = all_satisfied,
                NodeKind::Course { .. } => {
                    node.status.ready_to_take = children.is_empty() || all_satisfied;
                }
            }
        }
    }
}

fn child_satisfied(tree: &CourseTree, idx: Index) -> bool {
    tree.get(idx)
        .map(|node| node.status.completed || node.status.marked)
        .unwrap_or(false)
}
