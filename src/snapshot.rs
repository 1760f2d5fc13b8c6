//! Serializable views of a layout for hosts and output files

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::edge::{Edge, Segment};
use crate::error::IoResult;
use crate::io::{self, Format};
use crate::vector::Vec3;

/// Layout state after a given number of ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub tick: u64,
    pub step_coefficient: f32,
    pub converged: bool,
    pub positions: Vec<Vec3>,
    pub edges: Vec<Edge>,
    /// Connector geometry, one entry per edge
    pub segments: Vec<Segment>,
}

/// A sequence of snapshots recorded while a layout ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub config: LayoutConfig,
    pub frames: Vec<LayoutSnapshot>,
}

impl Trajectory {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            frames: Vec::new(),
        }
    }

    /// Append a frame unless it repeats the tick of the last one
    pub fn record(&mut self, snapshot: LayoutSnapshot) {
        if self.frames.last().is_some_and(|f| f.tick == snapshot.tick) {
            return;
        }
        self.frames.push(snapshot);
    }

    pub fn last(&self) -> Option<&LayoutSnapshot> {
        self.frames.last()
    }
}

/// Where and how a layout document is written
#[derive(Debug, Clone, Copy)]
pub enum Output<'a> {
    Stdout(Format),
    File { path: &'a Path, format: Format },
}

impl<'a> Output<'a> {
    /// Resolve the output format: an explicit format wins, then the file extension, then JSON
    pub fn resolve(path: Option<&'a Path>, format: Option<Format>) -> IoResult<Self> {
        match path {
            Some(path) => {
                let format = match format {
                    Some(format) => format,
                    None => Format::from_path(path)?,
                };
                Ok(Output::File { path, format })
            }
            None => Ok(Output::Stdout(format.unwrap_or_default())),
        }
    }

    pub fn write<T: Serialize>(&self, value: &T) -> IoResult<()> {
        match self {
            Output::Stdout(format) => io::write_document(value, *format, std::io::stdout().lock()),
            Output::File { path, format } => io::write_to_path(value, *format, path),
        }
    }
}
