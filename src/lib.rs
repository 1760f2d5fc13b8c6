//! graphforce - force-directed graph layout simulation.
//!
//! A [`LayoutEngine`] owns a fixed set of 3D node positions and edges and
//! advances them one [`tick`](LayoutEngine::tick) at a time until the step
//! coefficient anneals to zero. Hosts read back positions, edges and edge
//! segments after each tick to draw the graph.

pub mod config;
pub mod edge;
pub mod engine;
pub mod error;
pub mod generator;
pub mod io;
pub mod snapshot;
pub mod vector;

pub use config::{LayoutConfig, SimulationParams};
pub use edge::{Edge, Segment};
pub use engine::LayoutEngine;
pub use error::{ConfigError, IoError};
pub use snapshot::{LayoutSnapshot, Trajectory};
pub use vector::Vec3;
