//! Error types.
//!
//! Only malformed input is an error. A tour that dead-ends or a map whose
//! start and end are disconnected is a normal outcome, reported through
//! invalid paths and an infinite best length.

use crate::grid::Point;
use thiserror::Error;

/// Errors raised while building a [`GridGraph`](crate::grid::GridGraph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown map character {ch:?} at ({x}, {y})")]
    UnknownCell { ch: char, x: usize, y: usize },

    #[error("map has no {0} marker")]
    MissingMarker(&'static str),

    #[error("{role} {point} lies outside the grid")]
    OutOfBounds { role: &'static str, point: Point },

    #[error("{role} {point} is a blocked cell")]
    Blocked { role: &'static str, point: Point },
}

/// Errors raised by configuration validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),
}

impl ConfigError {
    pub(crate) fn out_of_range(name: &'static str, value: f64, expected: &'static str) -> Self {
        ConfigError::OutOfRange {
            name,
            value,
            expected,
        }
    }
}

/// Errors raised when starting a colony run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColonyError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Checks `lo <= value <= hi` and finiteness.
pub(crate) fn check_range(
    name: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(name, value, expected))
    }
}

/// Checks `value > 0` and finiteness.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(name, value, "positive"))
    }
}
