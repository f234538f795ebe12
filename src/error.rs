use std::io;
use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, ContactError>;

/// Errors raised while validating input, building an index or running a search.
///
/// Input validation happens before any index is built, so a search either
/// completes with a full contact graph or fails with one of these.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("radius count {radii} does not match center count {centers}")]
    LengthMismatch { centers: usize, radii: usize },

    #[error("particle {index}: radius {radius} must be finite and non-negative")]
    InvalidRadius { index: usize, radius: f64 },

    #[error("particle {index}: center {center:?} has a non-finite coordinate")]
    NonFiniteCenter { index: usize, center: [f64; 3] },

    #[error("overlap tolerance {0} must be finite")]
    InvalidTolerance(f64),

    #[error("index holds {index} points but the particle set has {particles}")]
    IndexMismatch { index: usize, particles: usize },

    #[error("query against an empty index")]
    EmptyIndex,

    #[error("query point {0:?} has a non-finite coordinate")]
    NonFiniteQuery([f64; 3]),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON particle document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ContactError {
    /// Returns `true` for errors caused by malformed particle data.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ContactError::LengthMismatch { .. }
                | ContactError::InvalidRadius { .. }
                | ContactError::NonFiniteCenter { .. }
                | ContactError::InvalidTolerance(_)
        )
    }
}
