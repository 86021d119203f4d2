use generational_arena::{Arena, Index};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use crate::errors::{TreeError, TreeResult};

/// Payload of a requirement node. The three variants are mutually exclusive
/// in their attributes: only courses carry a code, only junctions an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A course; its children are the logic that must hold to take it.
    Course {
        code: String,
        full_name: Option<String>,
    },
    /// All children must be satisfied.
    And { index: i64 },
    /// At least one child must be satisfied.
    Or { index: i64 },
}

impl NodeKind {
    pub fn course(code: impl Into<String>, full_name: Option<String>) -> Self {
        NodeKind::Course {
            code: code.into(),
            full_name,
        }
    }

    pub fn is_course(&self) -> bool {
        matches!(self, NodeKind::Course { .. })
    }

    pub fn is_junction(&self) -> bool {
        !self.is_course()
    }

    /// Course code, if this is a course node.
    pub fn code(&self) -> Option<&str> {
        match self {
            NodeKind::Course { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Junction index, if this is an AND/OR node.
    pub fn index(&self) -> Option<i64> {
        match self {
            NodeKind::And { index } | NodeKind::Or { index } => Some(*index),
            NodeKind::Course { .. } => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Course { code, .. } => write!(f, "{}", code),
            NodeKind::And { index } => write!(f, "AND #{}", index),
            NodeKind::Or { index } => write!(f, "OR #{}", index),
        }
    }
}

/// Derived satisfaction flags, all false at construction. Set only by
/// [`crate::propagate::propagate`]; `completed` and `ready_to_take` are
/// meaningful for courses, `marked` for junctions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStatus {
    pub marked: bool,
    pub completed: bool,
    pub ready_to_take: bool,
}

/// Tree node in the arena-based requirement structure.
#[derive(Debug)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub status: NodeStatus,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Arena-based prerequisite tree for one course.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// The tree exclusively owns its nodes; it is built once by the materializer
/// and mutated in place only by completion propagation.
#[derive(Debug, Default)]
pub struct CourseTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl CourseTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a detached node. Parent/child links are wired separately via
    /// [`CourseTree::attach_child`] because bulk materialization creates all
    /// nodes before any edge is known.
    pub fn insert_node(&mut self, kind: NodeKind) -> Index {
        self.arena.insert(TreeNode {
            kind,
            status: NodeStatus::default(),
            parent: None,
            children: Vec::new(),
        })
    }

    /// Appends `child` to `parent`'s children. Indices not present in the
    /// arena are ignored.
    pub fn attach_child(&mut self, parent: Index, child: Index) {
        if self.arena.get(parent).is_none() {
            return;
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        } else {
            return;
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn set_root(&mut self, idx: Index) {
        self.root = Some(idx);
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Root course code. The materializer always roots a tree at a course,
    /// so a junction root indicates a malformed tree.
    pub fn root_code(&self) -> TreeResult<&str> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        let node = self.get(root).ok_or(TreeError::EmptyTree)?;
        match &node.kind {
            NodeKind::Course { code, .. } => Ok(code),
            NodeKind::And { index } | NodeKind::Or { index } => {
                Err(TreeError::RootNotCourse(*index))
            }
        }
    }

    /// Pre-order (parent before children) traversal.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    /// Post-order (children before parent) traversal, the order completion
    /// propagation requires.
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Breadth-first traversal yielding each node with its depth (root = 0).
    pub fn iter_levels(&self) -> LevelIterator {
        LevelIterator::new(self)
    }

    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the codes of all course nodes in the tree, junctions skipped.
    pub fn course_codes(&self) -> BTreeSet<String> {
        self.iter()
            .filter_map(|(_, node)| node.kind.code().map(str::to_string))
            .collect()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a CourseTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a CourseTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a CourseTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a CourseTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

pub struct LevelIterator<'a> {
    tree: &'a CourseTree,
    queue: VecDeque<(Index, usize)>,
}

impl<'a> LevelIterator<'a> {
    fn new(tree: &'a CourseTree) -> Self {
        let mut queue = VecDeque::new();
        if let Some(root) = tree.root() {
            queue.push_back((root, 0));
        }
        Self { tree, queue }
    }
}

impl<'a> Iterator for LevelIterator<'a> {
    type Item = (Index, usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, level)) = self.queue.pop_front() {
            if let Some(node) = self.tree.get(current_idx) {
                for &child in &node.children {
                    self.queue.push_back((child, level + 1));
                }
                return Some((current_idx, level, node));
            }
        }
        None
    }
}
