//! Human-readable renderings of a prerequisite tree, for debugging.

use generational_arena::Index;
use termtree::Tree;

use crate::arena::{CourseTree, NodeKind};

/// Converts the tree into a [`termtree::Tree`] for pretty printing.
/// Empty trees render as None.
pub fn to_termtree(tree: &CourseTree) -> Option<Tree<String>> {
    tree.root().map(|root| branch(tree, root))
}

fn branch(tree: &CourseTree, idx: Index) -> Tree<String> {
    match tree.get(idx) {
        Some(node) => {
            let leaves: Vec<Tree<String>> = node
                .children
                .iter()
                .map(|&child| branch(tree, child))
                .collect();
            Tree::new(node_label(&node.kind)).with_leaves(leaves)
        }
        None => Tree::new(String::new()),
    }
}

fn node_label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Course {
            code,
            full_name: Some(name),
        } => format!("{} ({})", code, name),
        other => other.to_string(),
    }
}

/// One line per node in breadth-first order, annotated with its level.
pub fn level_lines(tree: &CourseTree) -> Vec<String> {
    tree.iter_levels()
        .map(|(_, level, node)| format!("{} - level {}", node.kind, level))
        .collect()
}
