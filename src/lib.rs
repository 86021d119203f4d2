//! Course prerequisite trees as nested AND/OR logic.
//!
//! A prerequisite catalog lives in an external graph; this crate consumes
//! it through the [`source::GraphSource`] boundary and provides the three
//! algorithms on top:
//!
//! 1. [`builder::TreeMaterializer`] turns graph records into an in-memory
//!    [`arena::CourseTree`], either from one bulk subgraph fetch or by
//!    root-scoped incremental descent.
//! 2. [`propagate::propagate`] computes, for a set of completed course
//!    codes, which branches of the logic are satisfied and which courses
//!    are immediately ready to take.
//! 3. [`commonality::analyze`] compares several trees and reports shared
//!    requirements at their largest applicable grouping of trees, plus a
//!    containment heuristic.
//!
//! [`serialize`] projects trees and reports into their wire shapes;
//! [`display`] renders trees for humans.

pub mod arena;
pub mod builder;
pub mod commonality;
pub mod display;
pub mod errors;
pub mod propagate;
pub mod serialize;
pub mod source;
pub mod util;

pub use arena::{CourseTree, NodeKind, NodeStatus, TreeNode};
pub use builder::TreeMaterializer;
pub use commonality::{analyze, CommonalityReport, Grouping};
pub use errors::{TreeError, TreeResult};
pub use propagate::{completed_set, propagate};
pub use serialize::{project, CommonalityWire, NodeProjection};
pub use source::{EdgeRecord, GraphSource, InMemoryGraph, NodeRecord, Subgraph};
