//! Wire-shape projections: a tree becomes one nested record per node, a
//! commonality report becomes the `commonality_list`/`containment_dict`
//! pair the API layer returns.

use std::collections::BTreeMap;

use generational_arena::Index;
use itertools::Itertools;
use serde::Serialize;

use crate::arena::{CourseTree, NodeKind};
use crate::commonality::{CommonalityReport, Grouping};
use crate::errors::{TreeError, TreeResult};

/// Derived flags, identical for every variant on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusProjection {
    pub marked: bool,
    pub ready_to_take: bool,
    pub completed: bool,
}

/// Nested record for one node. `label` is the variant tag; `code`/`full_name`
/// exist only for courses, `index` only for junctions, and `children` is
/// omitted when there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "label")]
pub enum NodeProjection {
    Course {
        #[serde(flatten)]
        status: StatusProjection,
        code: String,
        full_name: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeProjection>,
    },
    #[serde(rename = "AND")]
    And {
        #[serde(flatten)]
        status: StatusProjection,
        index: i64,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeProjection>,
    },
    #[serde(rename = "OR")]
    Or {
        #[serde(flatten)]
        status: StatusProjection,
        index: i64,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeProjection>,
    },
}

/// Projects a whole tree from its root.
pub fn project(tree: &CourseTree) -> TreeResult<NodeProjection> {
    let root = tree.root().ok_or(TreeError::EmptyTree)?;
    project_node(tree, root).ok_or(TreeError::EmptyTree)
}

fn project_node(tree: &CourseTree, idx: Index) -> Option<NodeProjection> {
    let node = tree.get(idx)?;
    let status = StatusProjection {
        marked: node.status.marked,
        ready_to_take: node.status.ready_to_take,
        completed: node.status.completed,
    };
    let children: Vec<NodeProjection> = node
        .children
        .iter()
        .filter_map(|&child| project_node(tree, child))
        .collect();

    Some(match &node.kind {
        NodeKind::Course { code, full_name } => NodeProjection::Course {
            status,
            code: code.clone(),
            full_name: full_name.clone(),
            children,
        },
        NodeKind::And { index } => NodeProjection::And {
            status,
            index: *index,
            children,
        },
        NodeKind::Or { index } => NodeProjection::Or {
            status,
            index: *index,
            children,
        },
    })
}

/// Stable string rendering of a grouping: sorted root codes, comma-joined.
pub fn grouping_key(grouping: &Grouping) -> String {
    grouping.iter().join(", ")
}

/// Serializable commonality result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonalityWire {
    pub commonality_list: BTreeMap<String, Vec<String>>,
    pub containment_dict: BTreeMap<String, Vec<String>>,
}

impl From<&CommonalityReport> for CommonalityWire {
    fn from(report: &CommonalityReport) -> Self {
        let commonality_list = report
            .commonality
            .iter()
            .map(|(grouping, codes)| {
                (grouping_key(grouping), codes.iter().cloned().collect())
            })
            .collect();
        let containment_dict = report
            .containment
            .iter()
            .map(|(contained, containers)| {
                (contained.clone(), containers.iter().cloned().collect())
            })
            .collect();
        Self {
            commonality_list,
            containment_dict,
        }
    }
}
