//! BSP tree node data structure

use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;

/// Index of a [`Node`] inside its [`Bsp`](super::Bsp) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for a node that has
    /// not been built yet.
    pub plane: Option<Plane>,

    /// Subtree for the *front* half‑space.
    pub front: Option<NodeId>,

    /// Subtree for the *back* half‑space.
    pub back: Option<NodeId>,

    /// Polygons that lie on `plane`, facing either way
    /// (after the node has been built).
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone> Default for Node<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> Node<S> {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// `true` if the node has neither a front nor a back child.
    pub const fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }
}
