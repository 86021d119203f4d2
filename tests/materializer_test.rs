//! Tests for TreeMaterializer: bulk and incremental strategies.

use prereqtree::{InMemoryGraph, NodeKind, TreeError, TreeMaterializer};
use prereqtree::util::testing::init_test_setup;
use rstest::rstest;

/// MAT334H1 -> AND -> (OR {MAT223H1, MAT240H1}, OR {MAT235Y1, MAT237Y1, MAT257Y1}),
/// everything scoped under MAT334H1.
fn mat334_graph() -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    graph.add_course("c0", "MAT334H1", Some("Complex Variables"));
    graph.add_and("j0", 1);
    graph.add_or("j1", 1);
    graph.add_or("j2", 2);
    graph.add_course("c1", "MAT223H1", Some("Linear Algebra I"));
    graph.add_course("c2", "MAT240H1", Some("Algebra I"));
    graph.add_course("c3", "MAT235Y1", Some("Calculus II"));
    graph.add_course("c4", "MAT237Y1", Some("Multivariable Calculus"));
    graph.add_course("c5", "MAT257Y1", Some("Analysis II"));

    graph.add_edge("c0", "j0", "MAT334H1");
    graph.add_edge("j0", "j1", "MAT334H1");
    graph.add_edge("j0", "j2", "MAT334H1");
    graph.add_edge("j1", "c1", "MAT334H1");
    graph.add_edge("j1", "c2", "MAT334H1");
    graph.add_edge("j2", "c3", "MAT334H1");
    graph.add_edge("j2", "c4", "MAT334H1");
    graph.add_edge("j2", "c5", "MAT334H1");
    graph
}

/// A requires B, B requires C; each hop is scoped under its own chain root.
fn chained_graph() -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    graph.add_course("a", "CSC301H1", None);
    graph.add_course("b", "CSC207H1", None);
    graph.add_course("c", "CSC148H1", None);
    graph.add_and("ja", 10);
    graph.add_and("jb", 11);

    graph.add_edge("a", "ja", "CSC301H1");
    graph.add_edge("ja", "b", "CSC301H1");
    // B's own requirements belong to B's chain, not A's
    graph.add_edge("b", "jb", "CSC207H1");
    graph.add_edge("jb", "c", "CSC207H1");
    graph
}

#[test]
fn given_and_or_catalog_when_bulk_materializing_then_structure_matches() {
    init_test_setup();
    let graph = mat334_graph();
    let materializer = TreeMaterializer::new();

    let tree = materializer.materialize_bulk(&graph, "MAT334H1").unwrap();

    assert_eq!(tree.len(), 9);
    assert_eq!(tree.depth(), 4);
    assert_eq!(tree.root_code().unwrap(), "MAT334H1");

    let root = tree.get(tree.root().unwrap()).unwrap();
    assert_eq!(root.children.len(), 1);
    let and = tree.get(root.children[0]).unwrap();
    assert!(matches!(and.kind, NodeKind::And { index: 1 }));
    assert_eq!(and.children.len(), 2);
}

#[test]
fn given_chained_prerequisites_when_materializing_incrementally_then_roots_switch() {
    init_test_setup();
    let graph = chained_graph();
    let materializer = TreeMaterializer::new();

    let tree = materializer.materialize(&graph, "CSC301H1").unwrap();

    // CSC301H1 -> AND -> CSC207H1 -> AND -> CSC148H1
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.depth(), 5);
    let codes = tree.course_codes();
    assert!(codes.contains("CSC207H1"));
    assert!(codes.contains("CSC148H1"));
}

#[test]
fn given_chained_prerequisites_when_using_both_strategies_then_they_agree() {
    let graph = chained_graph();
    let materializer = TreeMaterializer::new();

    let bulk = materializer.materialize_bulk(&graph, "CSC301H1").unwrap();
    let incremental = materializer.materialize(&graph, "CSC301H1").unwrap();

    assert_eq!(bulk.course_codes(), incremental.course_codes());
    assert_eq!(bulk.depth(), incremental.depth());
    assert_eq!(bulk.len(), incremental.len());
}

#[test]
fn given_course_without_prerequisites_when_materializing_then_single_leaf() {
    let mut graph = InMemoryGraph::new();
    graph.add_course("x", "CSC108H1", Some("Introduction to Computer Programming"));
    let materializer = TreeMaterializer::new();

    let tree = materializer.materialize(&graph, "CSC108H1").unwrap();

    assert_eq!(tree.len(), 1);
    let root = tree.get(tree.root().unwrap()).unwrap();
    assert!(root.children.is_empty());
}

#[rstest]
#[case::bulk(true)]
#[case::incremental(false)]
fn given_unknown_course_when_materializing_then_course_not_found(#[case] bulk: bool) {
    let graph = mat334_graph();
    let materializer = TreeMaterializer::new();

    let result = if bulk {
        materializer.materialize_bulk(&graph, "NOPE101")
    } else {
        materializer.materialize(&graph, "NOPE101")
    };

    assert!(matches!(result, Err(TreeError::CourseNotFound(code)) if code == "NOPE101"));
}

#[test]
fn given_repeated_calls_when_materializing_then_no_state_leaks_between_them() {
    let graph = mat334_graph();
    let materializer = TreeMaterializer::new();

    let first = materializer.materialize_bulk(&graph, "MAT334H1").unwrap();
    let second = materializer.materialize_bulk(&graph, "MAT334H1").unwrap();

    // Fresh tree per call, identical content
    assert_eq!(first.len(), second.len());
    assert_eq!(first.course_codes(), second.course_codes());

    // A later call against a different catalog is unaffected by the first
    let other = chained_graph();
    let third = materializer.materialize_bulk(&other, "CSC301H1").unwrap();
    assert!(!third.course_codes().contains("MAT334H1"));
}
