//! Document formats and format dispatch
//!
//! Configuration files and layout output are plain serde documents. This
//! module picks JSON or YAML from an explicit name or a file extension and
//! handles reading and writing them.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{IoError, IoResult};

/// A supported document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// File extensions this format can handle
    pub fn supported_extensions(self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
        }
    }

    /// Find the format for the given file extension
    pub fn from_extension(ext: &str) -> Option<Format> {
        [Format::Json, Format::Yaml].into_iter().find(|f| {
            f.supported_extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
    }

    /// Find the format for the given path based on its extension
    pub fn from_path(path: &Path) -> IoResult<Format> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;

        Format::from_extension(ext).ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }
}

impl FromStr for Format {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_extension(s).ok_or_else(|| IoError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

/// Parse a document from a string in the given format
pub fn parse_document<T: DeserializeOwned>(content: &str, format: Format) -> IoResult<T> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| IoError::Parse(e.to_string())),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| IoError::Parse(e.to_string())),
    }
}

/// Read a document from a file, choosing the format from its extension
pub fn read_document<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path)?;
    parse_document(&content, format)
}

/// Serialize a document to any writer
pub fn write_document<T: Serialize, W: Write>(
    value: &T,
    format: Format,
    mut writer: W,
) -> IoResult<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, value)
                .map_err(|e| IoError::Serialize(e.to_string()))?;
            writeln!(writer)?;
        }
        Format::Yaml => {
            serde_yaml::to_writer(&mut writer, value)
                .map_err(|e| IoError::Serialize(e.to_string()))?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write a document to a file, creating parent directories as needed
pub fn write_to_path<T: Serialize>(value: &T, format: Format, path: &Path) -> IoResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    write_document(value, format, std::io::BufWriter::new(file))
}
