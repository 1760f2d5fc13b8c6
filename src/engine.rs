//! Force-directed layout engine
//!
//! Every node repels every other node with a force of `spread^2 / d^2`, and
//! every edge pulls its endpoints together with a force of `d / spread`.
//! Each tick moves a node along its net force by at most the current step
//! coefficient. The coefficient drops by a fixed decrement per tick and the
//! engine stops moving nodes once it would reach zero.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::{LayoutConfig, SimulationParams};
use crate::edge::{Edge, Segment};
use crate::error::ConfigError;
use crate::generator::{random_edges, random_positions};
use crate::snapshot::LayoutSnapshot;
use crate::vector::Vec3;

/// Repulsive force acting on the node at `p_i` from the node at `p_j`
///
/// Points away from `p_j` with magnitude `spread^2 / d^2`. Coincident points
/// have no defined direction and yield zero.
pub fn repulsive_force(p_i: Vec3, p_j: Vec3, spread: f32) -> Vec3 {
    let delta = p_j - p_i;
    let dist_sq = delta.length_squared();
    if dist_sq == 0.0 {
        return Vec3::ZERO;
    }
    -(delta.normalized() * (spread * spread / dist_sq))
}

/// Attractive force of an edge, acting on `p_a` toward `p_b`
///
/// Magnitude is `d / spread`. The node at `p_b` receives the negation.
pub fn attractive_force(p_a: Vec3, p_b: Vec3, spread: f32) -> Vec3 {
    let delta = p_b - p_a;
    delta.normalized() * (delta.length() / spread)
}

/// A force-directed simulation over a fixed set of nodes and edges
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    positions: Vec<Vec3>,
    edges: Vec<Edge>,
    forces: Vec<Vec3>,
    params: SimulationParams,
    step_coefficient: f32,
    ticks: u64,
    degenerate_pairs: u64,
}

impl LayoutEngine {
    /// Build an engine with a random initial layout
    pub fn new(config: &LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self::generate(config, &mut rng))
    }

    /// Build an engine with a random initial layout drawn from `rng`
    pub fn with_rng<R: Rng + ?Sized>(
        config: &LayoutConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::generate(config, rng))
    }

    /// Expects a validated `config`
    fn generate<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> Self {
        let node_count = usize::try_from(config.node_count).unwrap_or(0);
        let edge_count = config.effective_edge_count();
        if usize::try_from(config.edge_count).is_ok_and(|requested| requested > edge_count) {
            debug!(
                requested = config.edge_count,
                edge_count, "clamped edge count to distinct node pairs"
            );
        }

        let positions = random_positions(rng, node_count, config.initial_extent);
        let edges = random_edges(rng, node_count, edge_count);
        debug!(node_count, edge_count, seed = ?config.seed, "generated initial layout");

        Self::assemble(positions, edges, config.params())
    }

    /// Build an engine from known positions and edges
    pub fn from_layout(
        positions: Vec<Vec3>,
        edges: Vec<Edge>,
        params: SimulationParams,
    ) -> Result<Self, ConfigError> {
        let node_count = positions.len();
        if node_count < 2 {
            return Err(ConfigError::TooFewNodes(node_count as i64));
        }
        params.validate()?;

        if let Some(node) = positions.iter().position(|p| !p.is_finite()) {
            return Err(ConfigError::NonFinitePosition(node));
        }

        for (i, edge) in edges.iter().enumerate() {
            if edge.a >= node_count || edge.b >= node_count {
                return Err(ConfigError::EdgeOutOfRange {
                    a: edge.a,
                    b: edge.b,
                    node_count,
                });
            }
            if edge.is_self_loop() {
                return Err(ConfigError::SelfLoop(edge.a));
            }
            if edges[..i].iter().any(|e| e.same_pair(edge)) {
                return Err(ConfigError::DuplicateEdge {
                    a: edge.a,
                    b: edge.b,
                });
            }
        }

        Ok(Self::assemble(positions, edges, params))
    }

    fn assemble(positions: Vec<Vec3>, edges: Vec<Edge>, params: SimulationParams) -> Self {
        Self {
            forces: vec![Vec3::ZERO; positions.len()],
            positions,
            edges,
            step_coefficient: params.initial_step,
            params,
            ticks: 0,
            degenerate_pairs: 0,
        }
    }

    /// Check if the step coefficient has reached its floor
    pub fn is_converged(&self) -> bool {
        self.step_coefficient - self.params.decrement <= 0.0
    }

    /// Advance the simulation by one step
    ///
    /// Returns `false` without changing anything once converged.
    pub fn tick(&mut self) -> bool {
        if self.is_converged() {
            return false;
        }

        self.forces.fill(Vec3::ZERO);
        self.accumulate_repulsion();
        self.accumulate_attraction();
        self.apply_forces();

        self.step_coefficient -= self.params.decrement;
        self.ticks += 1;

        if self.is_converged() {
            info!(ticks = self.ticks, "layout converged");
        }
        true
    }

    /// Tick until converged or `max_ticks` steps were applied
    ///
    /// Returns the number of applied ticks.
    pub fn run_to_convergence(&mut self, max_ticks: usize) -> usize {
        let mut applied = 0;
        while applied < max_ticks && self.tick() {
            applied += 1;
        }
        applied
    }

    fn accumulate_repulsion(&mut self) {
        let spread = self.params.spread;
        let n = self.positions.len();

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                if self.positions[i] == self.positions[j] {
                    // counted once per unordered pair
                    if i < j {
                        self.degenerate_pairs += 1;
                        warn!(
                            tick = self.ticks,
                            i, j, "coincident nodes, skipping repulsion"
                        );
                    }
                    continue;
                }
                self.forces[i] += repulsive_force(self.positions[i], self.positions[j], spread);
            }
        }
    }

    fn accumulate_attraction(&mut self) {
        let spread = self.params.spread;

        for edge in &self.edges {
            let force = attractive_force(self.positions[edge.a], self.positions[edge.b], spread);
            self.forces[edge.a] += force;
            self.forces[edge.b] -= force;
        }
    }

    fn apply_forces(&mut self) {
        for (position, force) in self.positions.iter_mut().zip(&self.forces) {
            let magnitude = force.length();
            if magnitude == 0.0 || !magnitude.is_finite() {
                continue;
            }
            *position += force.normalized() * self.step_coefficient.min(magnitude);
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Net force on each node during the last applied tick
    pub fn forces(&self) -> &[Vec3] {
        &self.forces
    }

    /// Line geometry for every edge, in edge order
    pub fn segments(&self) -> Vec<Segment> {
        self.edges
            .iter()
            .map(|e| e.segment(&self.positions))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Current maximum per-tick displacement
    pub fn step_coefficient(&self) -> f32 {
        self.step_coefficient
    }

    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// Number of ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total number of coincident node pairs seen across all ticks
    pub fn degenerate_pairs(&self) -> u64 {
        self.degenerate_pairs
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            tick: self.ticks,
            step_coefficient: self.step_coefficient,
            converged: self.is_converged(),
            positions: self.positions.clone(),
            edges: self.edges.clone(),
            segments: self.segments(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn config(nodes: i64, edges: i64, seed: u64) -> LayoutConfig {
        LayoutConfig::default()
            .with_nodes(nodes)
            .with_edges(edges)
            .with_seed(seed)
    }

    fn small_params() -> SimulationParams {
        SimulationParams {
            spread: 50.0,
            decrement: 0.0001,
            initial_step: 0.1,
        }
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert_eq!(
            LayoutEngine::new(&config(1, 0, 0)).unwrap_err(),
            ConfigError::TooFewNodes(1)
        );
        assert_eq!(
            LayoutEngine::new(&config(4, -2, 0)).unwrap_err(),
            ConfigError::NegativeEdgeCount(-2)
        );
    }

    #[test]
    fn construction_yields_valid_edges_and_distinct_positions() {
        for (nodes, edges) in [(2, 1), (2, 5), (4, 3), (5, 10), (8, 28), (9, 40), (10, 0)] {
            let engine = LayoutEngine::new(&config(nodes, edges, 17)).unwrap();
            let n = nodes as usize;
            let expected = (edges as usize).min(n * (n - 1) / 2);

            assert_eq!(engine.node_count(), n);
            assert_eq!(engine.edge_count(), expected);
            for (i, e) in engine.edges().iter().enumerate() {
                assert!(!e.is_self_loop());
                assert!(engine.edges()[i + 1..].iter().all(|o| !o.same_pair(e)));
            }
            for (i, p) in engine.positions().iter().enumerate() {
                assert!(engine.positions()[i + 1..].iter().all(|q| q != p));
            }
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let mut a = LayoutEngine::new(&config(8, 28, 5)).unwrap();
        let mut b = LayoutEngine::new(&config(8, 28, 5)).unwrap();
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.edges(), b.edges());

        a.run_to_convergence(50);
        b.run_to_convergence(50);
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn four_node_scenario_converges_after_a_thousand_ticks() {
        let cfg = LayoutConfig {
            node_count: 4,
            edge_count: 3,
            spread: 50.0,
            decrement: 0.0001,
            initial_step: 0.1,
            initial_extent: 3.0,
            seed: Some(2024),
        };
        let mut engine = LayoutEngine::new(&cfg).unwrap();

        assert_eq!(engine.positions().len(), 4);
        assert_eq!(engine.edges().len(), 3);
        assert!(!engine.is_converged());

        for _ in 0..1000 {
            engine.tick();
        }

        assert!(engine.is_converged());
        assert!(engine.step_coefficient().abs() < 1e-3);
        assert!(engine.ticks() >= 999 && engine.ticks() <= 1000);
        assert!(engine.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn ticks_are_no_ops_once_converged() {
        let mut engine = LayoutEngine::new(&config(5, 6, 1)).unwrap();
        engine.run_to_convergence(usize::MAX);
        assert!(engine.is_converged());

        let frozen = engine.positions().to_vec();
        let step = engine.step_coefficient();
        let ticks = engine.ticks();
        for _ in 0..10 {
            assert!(!engine.tick());
        }
        assert_eq!(engine.positions(), frozen.as_slice());
        assert_eq!(engine.step_coefficient(), step);
        assert_eq!(engine.ticks(), ticks);
    }

    #[test]
    fn step_coefficient_strictly_decreases() {
        let mut engine = LayoutEngine::new(&config(6, 8, 3)).unwrap();
        let mut previous = engine.step_coefficient();
        while engine.tick() {
            let current = engine.step_coefficient();
            assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn displacement_is_bounded_by_step_coefficient() {
        let mut engine = LayoutEngine::new(&config(8, 28, 9)).unwrap();
        for _ in 0..200 {
            let step = engine.step_coefficient();
            let before = engine.positions().to_vec();
            if !engine.tick() {
                break;
            }
            for (old, new) in before.iter().zip(engine.positions()) {
                // positions drift away from the origin, so allow for f32 rounding
                assert!(old.distance(*new) <= step + 1e-4);
            }
        }
    }

    #[test]
    fn attractive_force_points_from_a_to_b_with_distance_over_spread() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(30.0, 40.0, 0.0);
        let force = attractive_force(a, b, 50.0);

        assert!((force.length() - 50.0 / 50.0).abs() < EPS);
        let dir = force.normalized();
        assert!((dir.x - 0.6).abs() < EPS);
        assert!((dir.y - 0.8).abs() < EPS);
    }

    #[test]
    fn two_node_tick_applies_attraction_toward_partner() {
        let positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)];
        let params = SimulationParams {
            spread: 2.0,
            decrement: 0.01,
            initial_step: 0.5,
        };
        let mut engine = LayoutEngine::from_layout(positions, vec![Edge::new(0, 1)], params).unwrap();

        assert!(engine.tick());

        // repulsion: 2^2 / 10^2 = 0.04 outward; attraction: 10 / 2 = 5 inward
        let attraction = attractive_force(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0);
        assert!((attraction.length() - 5.0).abs() < EPS);
        assert!(attraction.x > 0.0);

        let forces = engine.forces();
        assert!((forces[0].x - (5.0 - 0.04)).abs() < EPS);
        assert!((forces[1].x + (5.0 - 0.04)).abs() < EPS);

        // net force exceeds the step, so each node moves exactly 0.5 inward
        assert!((engine.positions()[0].x - 0.5).abs() < EPS);
        assert!((engine.positions()[1].x - 9.5).abs() < EPS);
    }

    #[test]
    fn repulsion_pushes_unconnected_nodes_apart() {
        let positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)];
        let mut engine = LayoutEngine::from_layout(positions, vec![], small_params()).unwrap();

        let force = repulsive_force(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 50.0);
        assert!((force.z + 2500.0).abs() < 1e-2);

        engine.tick();
        let gap = engine.positions()[0].distance(engine.positions()[1]);
        assert!((gap - 1.2).abs() < EPS);
    }

    #[test]
    fn coincident_nodes_are_counted_and_stay_finite() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let positions = vec![p, p, Vec3::new(-1.0, 0.0, 0.0)];
        let mut engine =
            LayoutEngine::from_layout(positions, vec![Edge::new(0, 1)], small_params()).unwrap();

        assert_eq!(repulsive_force(p, p, 50.0), Vec3::ZERO);
        assert_eq!(attractive_force(p, p, 50.0), Vec3::ZERO);

        engine.tick();
        assert_eq!(engine.degenerate_pairs(), 1);
        assert!(engine.forces().iter().all(|f| f.is_finite()));
        assert!(engine.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn from_layout_validates_edges() {
        let positions = vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];

        let err = LayoutEngine::from_layout(positions.clone(), vec![Edge::new(0, 3)], small_params())
            .unwrap_err();
        assert!(matches!(err, ConfigError::EdgeOutOfRange { node_count: 3, .. }));

        let err = LayoutEngine::from_layout(positions.clone(), vec![Edge::new(1, 1)], small_params())
            .unwrap_err();
        assert_eq!(err, ConfigError::SelfLoop(1));

        let err = LayoutEngine::from_layout(
            positions.clone(),
            vec![Edge::new(0, 2), Edge::new(2, 0)],
            small_params(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateEdge { a: 2, b: 0 });

        let err = LayoutEngine::from_layout(vec![Vec3::ZERO], vec![], small_params()).unwrap_err();
        assert_eq!(err, ConfigError::TooFewNodes(1));
    }

    #[test]
    fn from_layout_rejects_non_finite_positions() {
        let positions = vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)];
        let err = LayoutEngine::from_layout(positions, vec![], small_params()).unwrap_err();
        assert_eq!(err, ConfigError::NonFinitePosition(1));

        let positions = vec![Vec3::new(0.0, f32::INFINITY, 0.0), Vec3::ZERO];
        let err = LayoutEngine::from_layout(positions, vec![], small_params()).unwrap_err();
        assert_eq!(err, ConfigError::NonFinitePosition(0));
    }

    #[test]
    fn rejects_decrement_that_cannot_move_the_step() {
        let cfg = LayoutConfig {
            decrement: 1e-9,
            initial_step: 1.0,
            ..config(4, 3, 1)
        };
        assert!(matches!(
            LayoutEngine::new(&cfg),
            Err(ConfigError::InvalidParameter {
                name: "decrement",
                ..
            })
        ));

        let params = SimulationParams {
            spread: 50.0,
            decrement: 1e-9,
            initial_step: 1.0,
        };
        let positions = vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)];
        assert!(LayoutEngine::from_layout(positions, vec![], params).is_err());
    }

    #[test]
    fn rejects_extent_that_cannot_be_sampled() {
        let cfg = LayoutConfig {
            initial_extent: 3.0e38,
            ..config(4, 3, 1)
        };
        assert!(matches!(
            LayoutEngine::new(&cfg),
            Err(ConfigError::InvalidParameter {
                name: "initial_extent",
                ..
            })
        ));
    }

    #[test]
    fn with_rng_validates_configuration() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            LayoutEngine::with_rng(&config(1, 0, 0), &mut rng).unwrap_err(),
            ConfigError::TooFewNodes(1)
        );
        assert!(LayoutEngine::with_rng(&config(3, 2, 0), &mut rng).is_ok());
    }

    #[test]
    fn run_to_convergence_respects_tick_limit() {
        let mut engine = LayoutEngine::new(&config(4, 3, 8)).unwrap();
        assert_eq!(engine.run_to_convergence(10), 10);
        assert_eq!(engine.ticks(), 10);
        assert!(!engine.is_converged());
    }

    #[test]
    fn snapshot_reflects_engine_state() {
        let mut engine = LayoutEngine::new(&config(4, 3, 12)).unwrap();
        engine.tick();
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.positions, engine.positions());
        assert_eq!(snapshot.edges, engine.edges());
        assert_eq!(snapshot.segments.len(), 3);
        assert!(!snapshot.converged);
    }
}
