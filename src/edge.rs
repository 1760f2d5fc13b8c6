//! Edges between layout nodes and the line geometry derived from them.

use serde::{Deserialize, Serialize};

use crate::vector::Vec3;

/// An unordered connection between two distinct node indices
///
/// The endpoints are stored in the order they were sampled; equality of the
/// underlying pair ignores that order (see [`Edge::same_pair`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }

    pub fn contains(&self, node: usize) -> bool {
        self.a == node || self.b == node
    }

    /// True if both edges connect the same two nodes, in either direction
    pub fn same_pair(&self, other: &Edge) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }

    /// The opposite endpoint, if `node` is one of this edge's endpoints
    pub fn other(&self, node: usize) -> Option<usize> {
        if node == self.a {
            Some(self.b)
        } else if node == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// Line geometry for this edge given the current node positions
    pub fn segment(&self, positions: &[Vec3]) -> Segment {
        Segment::between(positions[self.a], positions[self.b])
    }
}

/// Placement of the line connecting two nodes
///
/// This is what a renderer needs to position a connector: its center, the
/// unit direction it points along and its length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub midpoint: Vec3,
    /// Unit vector from the first to the second endpoint; zero if they coincide
    pub direction: Vec3,
    pub length: f32,
}

impl Segment {
    pub fn between(from: Vec3, to: Vec3) -> Self {
        let delta = to - from;
        Self {
            midpoint: from.midpoint(to),
            direction: delta.normalized(),
            length: delta.length(),
        }
    }
}
