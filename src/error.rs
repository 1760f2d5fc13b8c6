//! Error types for layout construction and file input/output

use thiserror::Error;

/// Invalid parameters or topology supplied when building a layout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Fewer than two nodes leaves no valid edge
    #[error("node count must be at least 2, got {0}")]
    TooFewNodes(i64),

    #[error("edge count must not be negative, got {0}")]
    NegativeEdgeCount(i64),

    /// A numeric parameter is non-finite or not strictly positive
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("edge ({a}, {b}) references a node outside 0..{node_count}")]
    EdgeOutOfRange { a: usize, b: usize, node_count: usize },

    #[error("edge ({0}, {0}) connects a node to itself")]
    SelfLoop(usize),

    #[error("position of node {0} is not finite")]
    NonFinitePosition(usize),

    #[error("edge ({a}, {b}) appears more than once")]
    DuplicateEdge { a: usize, b: usize },
}

/// Errors that can occur while reading configuration or writing layouts
#[derive(Error, Debug)]
pub enum IoError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),

    /// A serialization error occurred
    #[error("write error: {0}")]
    Serialize(String),

    /// The file parsed but describes an invalid layout
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for configuration loading and layout output
pub type IoResult<T> = Result<T, IoError>;
