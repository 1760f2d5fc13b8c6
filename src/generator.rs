//! Random initial layouts
//!
//! Positions and edges are drawn by rejection sampling, so the result never
//! contains two nodes at the same point, self-loops or repeated pairs.

use rand::Rng;

use crate::edge::Edge;
use crate::vector::Vec3;

/// Number of distinct unordered pairs among `node_count` nodes
pub fn max_edge_count(node_count: usize) -> usize {
    node_count * node_count.saturating_sub(1) / 2
}

/// Sample `count` pairwise distinct positions with coordinates in `[-extent, extent]`
pub fn random_positions<R: Rng + ?Sized>(rng: &mut R, count: usize, extent: f32) -> Vec<Vec3> {
    let mut positions: Vec<Vec3> = Vec::with_capacity(count);
    while positions.len() < count {
        let candidate = Vec3::new(
            rng.random_range(-extent..=extent),
            rng.random_range(-extent..=extent),
            rng.random_range(-extent..=extent),
        );
        if !positions.contains(&candidate) {
            positions.push(candidate);
        }
    }
    positions
}

/// Sample `edge_count` distinct unordered pairs of distinct nodes
///
/// `edge_count` is clamped to [`max_edge_count`], otherwise sampling could
/// never finish.
pub fn random_edges<R: Rng + ?Sized>(
    rng: &mut R,
    node_count: usize,
    edge_count: usize,
) -> Vec<Edge> {
    let edge_count = edge_count.min(max_edge_count(node_count));
    let mut edges: Vec<Edge> = Vec::with_capacity(edge_count);
    while edges.len() < edge_count {
        let candidate = Edge::new(
            rng.random_range(0..node_count),
            rng.random_range(0..node_count),
        );
        if candidate.is_self_loop() || edges.iter().any(|e| e.same_pair(&candidate)) {
            continue;
        }
        edges.push(candidate);
    }
    edges
}
