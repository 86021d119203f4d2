//! Materializes prerequisite trees from a [`GraphSource`].
//!
//! Two strategies, matching the two query shapes the source exposes: one
//! bulk fetch followed by a local edge-wiring pass, or incremental
//! root-scoped descent that unrolls chained prerequisites one root at a
//! time.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::instrument;

use crate::arena::CourseTree;
use crate::errors::{TreeError, TreeResult};
use crate::source::{GraphSource, NodeRecord};

#[derive(Debug, Default)]
pub struct TreeMaterializer;

impl TreeMaterializer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the full tree for `root_code` from one bulk subgraph fetch.
    ///
    /// All nodes are created first, keyed by the source's opaque identity in
    /// a map scoped to this call, then every Contains edge is wired through
    /// the lookup. Repeated and concurrent materializations share no state.
    #[instrument(level = "debug", skip(self, source))]
    pub fn materialize_bulk<S: GraphSource>(
        &self,
        source: &S,
        root_code: &str,
    ) -> TreeResult<CourseTree> {
        let subgraph = source.subgraph(root_code)?;

        let mut tree = CourseTree::new();
        let mut by_id: HashMap<String, Index> = HashMap::with_capacity(subgraph.nodes.len());
        let mut root = None;

        for record in subgraph.nodes {
            let is_root = record.kind.code() == Some(root_code);
            let idx = tree.insert_node(record.kind);
            by_id.insert(record.id, idx);
            if is_root {
                root = Some(idx);
            }
        }

        for edge in &subgraph.edges {
            let start = *by_id
                .get(&edge.start)
                .ok_or_else(|| TreeError::UnknownNode(edge.start.clone()))?;
            let end = *by_id
                .get(&edge.end)
                .ok_or_else(|| TreeError::UnknownNode(edge.end.clone()))?;
            tree.attach_child(start, end);
        }

        let root = root.ok_or_else(|| TreeError::CourseNotFound(root_code.to_string()))?;
        tree.set_root(root);
        Ok(tree)
    }

    /// Builds the tree for `root_code` by querying one root-scoped level at
    /// a time.
    ///
    /// Each query returns only children whose edge is tagged with the active
    /// root scope. A course with no children under that scope starts its own
    /// prerequisite chain: it is re-queried under its own code, which becomes
    /// the scope for everything beneath it. Recursion ends when a query
    /// (after any such root switch) comes back empty.
    #[instrument(level = "debug", skip(self, source))]
    pub fn materialize<S: GraphSource>(
        &self,
        source: &S,
        root_code: &str,
    ) -> TreeResult<CourseTree> {
        let record = source
            .course(root_code)?
            .ok_or_else(|| TreeError::CourseNotFound(root_code.to_string()))?;

        let mut tree = CourseTree::new();
        let root_idx = tree.insert_node(record.kind.clone());
        tree.set_root(root_idx);
        self.expand(source, &mut tree, root_idx, &record, root_code)?;
        Ok(tree)
    }

    fn expand<'a, S: GraphSource>(
        &self,
        source: &S,
        tree: &mut CourseTree,
        idx: Index,
        record: &'a NodeRecord,
        scope: &'a str,
    ) -> TreeResult<()> {
        let mut scope = scope;
        let mut children = source.scoped_children(&record.id, scope)?;

        // Root switch: a course that owns no edges under the inherited scope
        // is the head of its own chain.
        if children.is_empty() {
            if let Some(code) = record.kind.code() {
                if code != scope {
                    scope = code;
                    children = source.scoped_children(&record.id, scope)?;
                }
            }
        }

        for child in children {
            let child_idx = tree.insert_node(child.kind.clone());
            tree.attach_child(idx, child_idx);
            self.expand(source, tree, child_idx, &child, scope)?;
        }
        Ok(())
    }
}
