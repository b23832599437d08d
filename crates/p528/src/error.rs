//! Error types for the propagation prediction

use thiserror::Error;

/// Result type for P.528 computations
pub type P528Result<T> = Result<T, P528Error>;

/// Failures the engine can report instead of propagating invalid numerics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum P528Error {
    /// A request parameter is outside the valid domain
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested distance is at or beyond the maximum line-of-sight
    /// distance; the transhorizon modes of the recommendation are not
    /// implemented
    #[error(
        "transhorizon path (distance {distance_km} km >= maximum line-of-sight {d_ml_km} km) is unsupported"
    )]
    UnsupportedRegime { distance_km: f64, d_ml_km: f64 },

    /// The terminal geometry degenerates the diffraction anchors or the
    /// grazing-angle table (e.g. both terminals at height zero)
    #[error("degenerate path geometry: {0}")]
    DegenerateGeometry(String),
}
