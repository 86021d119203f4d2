//! Graph record adapter boundary.
//!
//! The materializer never talks to a database directly; it consumes typed
//! records through [`GraphSource`]. Real adapters (e.g. a graph-database
//! client) live outside this crate; [`InMemoryGraph`] is the reference
//! implementation used by tests.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::arena::NodeKind;
use crate::errors::{TreeError, TreeResult};

/// A node as reported by the graph source: an opaque identity plus the
/// parsed Course/AND/OR payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: String,
    pub kind: NodeKind,
}

impl NodeRecord {
    /// Builds a record from raw label/property values, the shape an external
    /// adapter gets back from its query layer. Unrecognized labels and
    /// missing variant properties fail the request here, before any tree is
    /// built.
    pub fn parse(
        id: impl Into<String>,
        label: &str,
        code: Option<String>,
        full_name: Option<String>,
        index: Option<i64>,
    ) -> TreeResult<Self> {
        let id = id.into();
        let kind = match label {
            "Course" => NodeKind::Course {
                code: code.ok_or_else(|| TreeError::MissingProperty {
                    id: id.clone(),
                    property: "code".to_string(),
                })?,
                full_name,
            },
            "AND" => NodeKind::And {
                index: index.ok_or_else(|| TreeError::MissingProperty {
                    id: id.clone(),
                    property: "index".to_string(),
                })?,
            },
            "OR" => NodeKind::Or {
                index: index.ok_or_else(|| TreeError::MissingProperty {
                    id: id.clone(),
                    property: "index".to_string(),
                })?,
            },
            other => {
                return Err(TreeError::UnknownLabel {
                    id,
                    label: other.to_string(),
                })
            }
        };
        Ok(Self { id, kind })
    }
}

/// A "Contains" edge between two node identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub start: String,
    pub end: String,
}

/// Bulk query result: every node and Contains edge reachable from a root.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Query boundary the tree materializer depends on.
///
/// Calls are sequential per materialization; implementations are not
/// required to support interleaved traversals.
pub trait GraphSource {
    /// Looks up the course node for `code`, None if the catalog has no such
    /// course.
    fn course(&self, code: &str) -> TreeResult<Option<NodeRecord>>;

    /// Returns everything reachable from the course over Contains edges,
    /// regardless of which root-scoped chain an edge belongs to.
    fn subgraph(&self, code: &str) -> TreeResult<Subgraph>;

    /// Returns the direct children of `parent_id` whose connecting edge is
    /// tagged with `root_scope`. An empty result is the leaf/termination
    /// condition, not an error.
    fn scoped_children(&self, parent_id: &str, root_scope: &str) -> TreeResult<Vec<NodeRecord>>;
}

#[derive(Debug, Clone)]
struct TaggedEdge {
    start: String,
    end: String,
    root: String,
}

/// In-memory graph of courses, junctions and root-tagged Contains edges.
///
/// Plays the role a graph database plays in production; every edge carries
/// the course code of the chain it was ingested under, which is what the
/// root-scoped query filters on.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    nodes: BTreeMap<String, NodeRecord>,
    edges: Vec<TaggedEdge>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_course(
        &mut self,
        id: impl Into<String>,
        code: impl Into<String>,
        full_name: Option<&str>,
    ) {
        let id = id.into();
        self.nodes.insert(
            id.clone(),
            NodeRecord {
                id,
                kind: NodeKind::course(code, full_name.map(str::to_string)),
            },
        );
    }

    pub fn add_and(&mut self, id: impl Into<String>, index: i64) {
        let id = id.into();
        self.nodes.insert(
            id.clone(),
            NodeRecord {
                id,
                kind: NodeKind::And { index },
            },
        );
    }

    pub fn add_or(&mut self, id: impl Into<String>, index: i64) {
        let id = id.into();
        self.nodes.insert(
            id.clone(),
            NodeRecord {
                id,
                kind: NodeKind::Or { index },
            },
        );
    }

    /// Adds a Contains edge tagged with the root course code of its chain.
    pub fn add_edge(
        &mut self,
        start: impl Into<String>,
        end: impl Into<String>,
        root: impl Into<String>,
    ) {
        self.edges.push(TaggedEdge {
            start: start.into(),
            end: end.into(),
            root: root.into(),
        });
    }

    fn find_course(&self, code: &str) -> Option<&NodeRecord> {
        self.nodes
            .values()
            .find(|record| record.kind.code() == Some(code))
    }
}

impl GraphSource for InMemoryGraph {
    fn course(&self, code: &str) -> TreeResult<Option<NodeRecord>> {
        Ok(self.find_course(code).cloned())
    }

    fn subgraph(&self, code: &str) -> TreeResult<Subgraph> {
        let start = self
            .find_course(code)
            .ok_or_else(|| TreeError::CourseNotFound(code.to_string()))?;

        let mut result = Subgraph::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start.id.clone());
        queue.push_back(start.id.clone());

        while let Some(current) = queue.pop_front() {
            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| TreeError::UnknownNode(current.clone()))?;
            result.nodes.push(node.clone());

            for edge in self.edges.iter().filter(|e| e.start == current) {
                result.edges.push(EdgeRecord {
                    start: edge.start.clone(),
                    end: edge.end.clone(),
                });
                if seen.insert(edge.end.clone()) {
                    queue.push_back(edge.end.clone());
                }
            }
        }

        Ok(result)
    }

    fn scoped_children(&self, parent_id: &str, root_scope: &str) -> TreeResult<Vec<NodeRecord>> {
        let mut children = Vec::new();
        for edge in self
            .edges
            .iter()
            .filter(|e| e.start == parent_id && e.root == root_scope)
        {
            let child = self
                .nodes
                .get(&edge.end)
                .ok_or_else(|| TreeError::UnknownNode(edge.end.clone()))?;
            children.push(child.clone());
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_record() {
        let record = NodeRecord::parse(
            "4:abc:17",
            "Course",
            Some("CSC108H1".to_string()),
            Some("Introduction to Computer Programming".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(record.kind.code(), Some("CSC108H1"));
    }

    #[test]
    fn test_parse_unknown_label_fails() {
        let err = NodeRecord::parse("n1", "XOR", None, None, Some(3)).unwrap_err();
        assert!(matches!(err, TreeError::UnknownLabel { .. }));
    }

    #[test]
    fn test_parse_junction_without_index_fails() {
        let err = NodeRecord::parse("n1", "AND", None, None, None).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MissingProperty { ref property, .. } if property == "index"
        ));
    }

    #[test]
    fn test_scoped_children_filters_by_root_tag() {
        let mut graph = InMemoryGraph::new();
        graph.add_course("c1", "A", None);
        graph.add_course("c2", "B", None);
        graph.add_course("c3", "C", None);
        graph.add_edge("c1", "c2", "A");
        graph.add_edge("c2", "c3", "B"); // deeper chain, scoped under B

        let under_a = graph.scoped_children("c2", "A").unwrap();
        assert!(under_a.is_empty());
        let under_b = graph.scoped_children("c2", "B").unwrap();
        assert_eq!(under_b.len(), 1);
        assert_eq!(under_b[0].kind.code(), Some("C"));
    }

    #[test]
    fn test_subgraph_of_unknown_course_errors() {
        let graph = InMemoryGraph::new();
        let err = graph.subgraph("NOPE101").unwrap_err();
        assert!(matches!(err, TreeError::CourseNotFound(_)));
    }
}
