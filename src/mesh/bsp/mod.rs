//! Binary Space Partitioning (BSP) tree implementation
//!
//! The tree is not a leafy BSP tree: every node owns a splitting plane and the
//! polygons lying on it, there is no distinction between internal and leaf
//! nodes. Nodes live in an arena ([`Bsp`]) and refer to their children by
//! [`NodeId`], so every traversal below runs on an explicit stack and tree depth
//! never turns into call-stack depth.

pub mod node;
pub mod traits;

pub use node::{Node, NodeId};
pub use traits::{BalancedSplittingStrategy, FirstPolygonStrategy, SplittingPlaneStrategy};

use crate::mesh::polygon::Polygon;

/// An arena-backed BSP tree. The root is always [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct Bsp<S: Clone> {
    nodes: Vec<Node<S>>,
}

impl<S: Clone> Default for Bsp<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> Bsp<S> {
    /// Create a tree holding a single empty root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
        }
    }

    /// Creates a new BSP tree from polygons, pivoting on the first polygon
    /// of every partition.
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        Self::from_polygons_with(polygons, &FirstPolygonStrategy)
    }

    /// Creates a new BSP tree from polygons using `strategy` to pick planes.
    pub fn from_polygons_with<SP: SplittingPlaneStrategy<S>>(
        polygons: &[Polygon<S>],
        strategy: &SP,
    ) -> Self {
        let mut tree = Self::new();
        tree.build_with(polygons, strategy);
        tree
    }

    /// The root node
    pub fn root(&self) -> &Node<S> {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Look up a node of this tree
    pub fn node(&self, id: NodeId) -> Option<&Node<S>> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of polygons stored across all nodes
    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|n| n.polygons.len()).sum()
    }

    /// Length of the longest root-to-node path, counting nodes.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(NodeId::ROOT, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id.0];
            stack.extend(node.front.iter().chain(node.back.iter()).map(|&c| (c, depth + 1)));
        }
        deepest
    }

    /// Invert all polygons in the BSP tree: flip every polygon and plane and
    /// swap the front and back subtrees, turning inside into outside.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            node.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove all parts of `polygons` that are inside this BSP tree.
    ///
    /// Coplanar polygons facing the node's plane are treated as front, the
    /// others as back. Whatever ends up behind a node without back subtree is
    /// inside the solid and discarded. A tree that was never built returns the
    /// input unchanged.
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        if self.root().plane.is_none() {
            return polygons.to_vec();
        }

        let mut result = Vec::with_capacity(polygons.len());
        let mut stack = vec![(NodeId::ROOT, polygons.to_vec())];

        while let Some((id, polys)) = stack.pop() {
            let node = &self.nodes[id.0];
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                front_polys.extend(coplanar_front);
                front_polys.extend(front_parts);
                back_polys.extend(coplanar_back);
                back_polys.extend(back_parts);
            }

            // back is pushed first so the front subtree is emitted first
            if let Some(back) = node.back {
                if !back_polys.is_empty() {
                    stack.push((back, back_polys));
                }
            }
            match node.front {
                Some(front) => {
                    if !front_polys.is_empty() {
                        stack.push((front, front_polys));
                    }
                },
                None => result.extend(front_polys),
            }
        }

        result
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, other: &Bsp<S>) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(&polygons);
        }
    }

    /// Return all polygons in this BSP tree, node first, then front, then back.
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(self.polygon_count());
        let mut stack = vec![NodeId::ROOT];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            result.extend_from_slice(&node.polygons);
            stack.extend(node.back);
            stack.extend(node.front);
        }
        result
    }

    /// Build a BSP tree from the given polygons, pivoting on the first polygon
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        self.build_with(polygons, &FirstPolygonStrategy);
    }

    /// Insert `polygons` into the tree. Nodes that already have a plane keep it;
    /// new nodes take theirs from `strategy`.
    pub fn build_with<SP: SplittingPlaneStrategy<S>>(
        &mut self,
        polygons: &[Polygon<S>],
        strategy: &SP,
    ) {
        let mut stack = vec![(NodeId::ROOT, polygons.to_vec())];

        while let Some((id, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let plane = self.nodes[id.0]
                .plane
                .get_or_insert_with(|| strategy.pick_splitting_plane(&polys))
                .clone();

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                let node = &mut self.nodes[id.0];
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            if !back.is_empty() {
                let child = self.child_or_insert(id, false);
                stack.push((child, back));
            }
            if !front.is_empty() {
                let child = self.child_or_insert(id, true);
                stack.push((child, front));
            }
        }

        log::trace!(
            "bsp built: {} nodes, depth {}, {} polygons",
            self.nodes.len(),
            self.depth(),
            self.polygon_count()
        );
    }

    fn child_or_insert(&mut self, parent: NodeId, front: bool) -> NodeId {
        let existing = if front {
            self.nodes[parent.0].front
        } else {
            self.nodes[parent.0].back
        };
        if let Some(id) = existing {
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new());
        let slot = if front {
            &mut self.nodes[parent.0].front
        } else {
            &mut self.nodes[parent.0].back
        };
        *slot = Some(id);
        id
    }
}
