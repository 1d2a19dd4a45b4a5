//! Error types for spatial index construction.

use std::fmt;

/// Reasons a [`SpatialIndex`](crate::SpatialIndex) refuses to build.
///
/// A rejected index stays unusable for its whole lifetime; every later
/// operation on it returns an empty or zero result.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// No points were supplied.
    EmptyInput,

    /// More points than the `u32` index domain can address
    /// (one value is reserved as the empty-bucket sentinel).
    TooManyPoints { count: usize, max: usize },

    /// `scale` is not positive, or `scale²` overflows or underflows
    /// (is not a normal `f64`).
    InvalidScale(f64),

    /// An input coordinate is NaN or infinite.
    NonFiniteCoordinate { index: usize },

    /// The squared bounding-box diagonal overflows to a non-finite value.
    RangeTooLarge,
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterError::EmptyInput => write!(f, "point set is empty"),
            ClusterError::TooManyPoints { count, max } => {
                write!(f, "too many points: got {}, at most {} supported", count, max)
            }
            ClusterError::InvalidScale(scale) => {
                write!(f, "scale length {} is not positive or is out of range", scale)
            }
            ClusterError::NonFiniteCoordinate { index } => {
                write!(f, "point {} has a non-finite coordinate", index)
            }
            ClusterError::RangeTooLarge => {
                write!(f, "coordinate range is too big for exact distance checks")
            }
        }
    }
}

impl std::error::Error for ClusterError {}
