//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum QuakecatError {
    /// Input data could not be parsed into equal-length numeric columns.
    #[error("malformed input: {message}")]
    MalformedInput {
        /// What failed, naming the row and column where known.
        message: String,
    },
    /// A geographic coordinate lies outside the valid UTM domain.
    #[error("coordinate (lon {lon}, lat {lat}) is outside the UTM domain")]
    InvalidCoordinate {
        /// Longitude in decimal degrees.
        lon: f64,
        /// Latitude in decimal degrees.
        lat: f64,
    },
    /// A selector referenced an index beyond the catalogue length, or a
    /// boolean mask's length did not match it.
    #[error("index {index} is out of range for catalogue of length {len}")]
    IndexOutOfRange {
        /// Offending index (or mask length, for mask mismatches).
        index: usize,
        /// Catalogue length.
        len: usize,
    },
    /// Fewer than 3 vertices were supplied for a polygon.
    #[error("a polygon requires at least 3 vertices, got {vertices}")]
    InvalidPolygon {
        /// Number of vertices supplied.
        vertices: usize,
    },
    /// The requested operation is declared but not supported.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
    /// The projection backend rejected an operation.
    #[error("projection failed: {0}")]
    Projection(String),
    /// Error reading data from the file system.
    #[error("failed to read file")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for QuakecatError {
    fn from(value: csv::Error) -> Self {
        QuakecatError::MalformedInput {
            message: value.to_string(),
        }
    }
}
