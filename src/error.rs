//! Error types shared by the library and the MCP server.

use thiserror::Error;

use crate::ephemeris::HousesSystem;

/// The error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum AstrologerError {
    /// Quadrant house systems are undefined inside the polar circles.
    #[error("Quadrant system fails at high latitudes (latitude {latitude:.4}°)")]
    HighLatitude { latitude: f64 },

    #[error("{0} is not a quadrant system")]
    NotQuadrantSystem(HousesSystem),

    /// The Swiss Ephemeris reported a failure.
    #[error("Swiss Ephemeris error: {0}")]
    Ephemeris(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Local time falls in a DST gap or overlap.
    #[error("Ambiguous or invalid local time: {0}")]
    AmbiguousLocalTime(String),

    #[error("Chart '{0}' not found")]
    ChartNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A lock was poisoned by a panic in another thread.
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// A convenience `Result` alias using [`AstrologerError`].
pub type Result<T> = std::result::Result<T, AstrologerError>;
