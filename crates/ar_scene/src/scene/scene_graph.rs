//! Retained scene graph
//!
//! Nodes live in a slot map keyed by [`NodeId`]; parent/child links are
//! stored on the nodes. The graph always has a root node which can not be
//! removed.

use super::SceneNode;
use crate::foundation::math::{Mat4, Point3, Vec3};
use slotmap::SlotMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Handle of a node inside a [`SceneGraph`]
    pub struct NodeId;
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point, `None` for no points
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Self::new(p, p)),
            Some(b) => Some(Self::new(b.min.inf(&p), b.max.sup(&p))),
        })
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Union of two boxes
    pub fn merged(&self, other: &Self) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Box enclosing this box after an affine transform
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = (0..8).map(|i| {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            matrix.transform_point(&corner).coords
        });
        // Eight corners are always present
        Self::enclosing(corners).unwrap_or(*self)
    }
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live node
    #[error("node {0:?} does not exist")]
    MissingNode(NodeId),

    /// Attempted to detach or remove the root
    #[error("the root node can not be removed")]
    RootRemoval,

    /// Re-parenting would make a node its own ancestor
    #[error("node {child:?} is an ancestor of {parent:?}")]
    Cycle {
        /// Node being attached
        child: NodeId,
        /// Requested parent
        parent: NodeId,
    },
}

/// Hierarchical scene graph with a fixed root
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only a root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::named("root"));
        Self { nodes, root }
    }

    /// Root node handle
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutably borrow a node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Insert `node` as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        node.parent = Some(parent);
        node.children.clear();
        let id = self.nodes.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Insert `node` under the root
    pub fn add_to_root(&mut self, node: SceneNode) -> NodeId {
        let root = self.root;
        let mut node = node;
        node.parent = Some(root);
        node.children.clear();
        let id = self.nodes.insert(node);
        if let Some(root_node) = self.nodes.get_mut(root) {
            root_node.children.push(id);
        }
        id
    }

    /// Move an existing node under a new parent
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        if !self.nodes.contains_key(id) {
            return Err(SceneError::MissingNode(id));
        }
        if !self.nodes.contains_key(new_parent) {
            return Err(SceneError::MissingNode(new_parent));
        }
        if self.is_ancestor(id, new_parent) {
            return Err(SceneError::Cycle {
                child: id,
                parent: new_parent,
            });
        }

        self.unlink(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(new_parent);
        }
        if let Some(parent) = self.nodes.get_mut(new_parent) {
            parent.children.push(id);
        }
        Ok(())
    }

    /// Remove a node and its whole subtree, returning how many nodes were removed
    pub fn remove(&mut self, id: NodeId) -> Result<usize, SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        if !self.nodes.contains_key(id) {
            return Err(SceneError::MissingNode(id));
        }

        self.unlink(id);
        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Depth-first search for a node named `name` below `start` (exclusive)
    pub fn find_descendant(&self, start: NodeId, name: &str) -> Option<NodeId> {
        let mut pending: Vec<NodeId> = self.nodes.get(start)?.children.iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            let node = self.nodes.get(id)?;
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            pending.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Every node in the subtree rooted at `start`, in depth-first pre-order
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.get(id) {
                out.push(id);
                pending.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Nodes for which `predicate` holds, anywhere in the graph
    pub fn nodes_where(&self, predicate: impl Fn(&SceneNode) -> bool) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.nodes.get(*id).is_some_and(&predicate))
            .collect()
    }

    /// Matrix mapping node-local coordinates to world coordinates
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut matrix = self.nodes.get(id)?.local_matrix();
        let mut current = self.nodes.get(id)?.parent;
        while let Some(parent) = current {
            let node = self.nodes.get(parent)?;
            matrix = node.local_matrix() * matrix;
            current = node.parent;
        }
        Some(matrix)
    }

    /// Bounding box of a subtree in the coordinate space of `id`
    pub fn subtree_bounds(&self, id: NodeId) -> Option<AABB> {
        let node = self.nodes.get(id)?;
        let own = node.bounding_box();
        node.children.iter().fold(own, |acc, child| {
            let child_bounds = self
                .subtree_bounds(*child)
                .zip(self.nodes.get(*child))
                .map(|(bounds, child_node)| bounds.transformed(&child_node.local_matrix()));
            match (acc, child_bounds) {
                (Some(a), Some(b)) => Some(a.merged(&b)),
                (a, b) => a.or(b),
            }
        })
    }

    fn unlink(&mut self, id: NodeId) {
        let parent = self.nodes.get(id).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.nodes.get(id).and_then(|node| node.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}
