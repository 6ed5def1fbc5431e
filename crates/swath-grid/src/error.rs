//! Error types for swath gridding.
//!
//! Configuration problems (unknown flags, incompatible grids, degenerate
//! transforms, bad extents) are errors and surface before any tile is
//! processed. Data absence (a swath outside the grid, a fully masked swath,
//! an empty cell) is never an error; it flows through as no-data.

use swath_common::CommonError;
use thiserror::Error;

/// Errors that can occur during swath gridding.
#[derive(Debug, Error)]
pub enum SwathGridError {
    /// Invalid bounding extent for a target grid.
    #[error("invalid grid bounds: {0}")]
    InvalidBounds(String),

    /// Grid resolution must be positive and finite.
    #[error("invalid grid resolution: {0}")]
    InvalidResolution(f64),

    /// The affine transform cannot be inverted.
    #[error("non-invertible grid transform (determinant {determinant})")]
    NonInvertibleTransform { determinant: f64 },

    /// Two grids that must share a cell lattice do not.
    #[error("grid mismatch: {0}")]
    GridMismatch(String),

    /// Array shapes disagree with the swath dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Source and target CRS are neither equal nor convertible.
    #[error("CRS mismatch: cannot map {source_crs} onto {target_crs}")]
    CrsMismatch {
        source_crs: String,
        target_crs: String,
    },

    /// A named data variable does not exist on the swath.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// Configuration error detected during setup.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Error from the shared type layer (flag vocabulary, CRS parsing).
    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Result type for swath gridding operations.
pub type Result<T> = std::result::Result<T, SwathGridError>;
