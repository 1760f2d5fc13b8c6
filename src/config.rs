//! Layout configuration
//!
//! Defaults reproduce the classic 8-node, fully connected demo graph: a
//! spread of 50 and a step that anneals from 0.1 by 0.0001 per tick.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, IoResult};
use crate::io;

/// Parameters for building and running a layout
///
/// Counts are signed because they come from files and command-line flags;
/// [`LayoutConfig::validate`] rejects the values a layout cannot use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of nodes in the graph
    pub node_count: i64,
    /// Requested number of edges, clamped to the maximum for `node_count`
    pub edge_count: i64,
    /// Scales both forces: repulsion grows with `spread^2`, attraction shrinks with it
    pub spread: f32,
    /// Amount the step coefficient drops after every tick
    pub decrement: f32,
    /// Step coefficient (maximum per-tick displacement) of the first tick
    pub initial_step: f32,
    /// Initial coordinates are drawn from `[-initial_extent, initial_extent]`
    pub initial_extent: f32,
    /// Seed for the random initial layout; a fresh seed is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_count: 8,
            edge_count: 28,
            spread: 50.0,
            decrement: 0.0001,
            initial_step: 0.1,
            initial_extent: 3.0,
            seed: None,
        }
    }
}

/// Numeric simulation parameters, already validated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub spread: f32,
    pub decrement: f32,
    pub initial_step: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        LayoutConfig::default().params()
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_finite("spread", self.spread)?;
        positive_finite("decrement", self.decrement)?;
        positive_finite("initial_step", self.initial_step)?;
        // the step coefficient must move on every tick or it never reaches its floor
        if self.initial_step - self.decrement == self.initial_step {
            return Err(ConfigError::InvalidParameter {
                name: "decrement",
                value: self.decrement,
            });
        }
        Ok(())
    }
}

impl LayoutConfig {
    /// Load a configuration from a YAML or JSON file and validate it
    pub fn from_path(path: &Path) -> IoResult<Self> {
        debug!(path = %path.display(), "loading layout configuration");
        let config: LayoutConfig = io::read_document(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_nodes(mut self, node_count: i64) -> Self {
        self.node_count = node_count;
        self
    }

    pub fn with_edges(mut self, edge_count: i64) -> Self {
        self.edge_count = edge_count;
        self
    }

    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            spread: self.spread,
            decrement: self.decrement,
            initial_step: self.initial_step,
        }
    }

    /// Check every field a layout depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_count < 2 {
            return Err(ConfigError::TooFewNodes(self.node_count));
        }
        if self.edge_count < 0 {
            return Err(ConfigError::NegativeEdgeCount(self.edge_count));
        }
        self.params().validate()?;
        positive_finite("initial_extent", self.initial_extent)?;
        // sampling needs the full width of the range to be representable
        if !(self.initial_extent + self.initial_extent).is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "initial_extent",
                value: self.initial_extent,
            });
        }
        Ok(())
    }

    /// Edge count after clamping to the number of distinct node pairs
    pub fn effective_edge_count(&self) -> usize {
        let requested = usize::try_from(self.edge_count).unwrap_or(0);
        let nodes = usize::try_from(self.node_count).unwrap_or(0);
        requested.min(crate::generator::max_edge_count(nodes))
    }

    /// Nominal number of ticks before the layout converges, `initial_step / decrement`
    ///
    /// Accumulated rounding in the step coefficient can make the real count
    /// differ by one.
    pub fn max_ticks(&self) -> usize {
        let ratio = f64::from(self.initial_step) / f64::from(self.decrement);
        if ratio.is_finite() && ratio > 0.0 {
            ratio.round() as usize
        } else {
            0
        }
    }
}

fn positive_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}
