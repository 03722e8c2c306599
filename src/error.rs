//! Error types for kdforest.

use thiserror::Error;

/// Errors that can occur while building or querying a forest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdForestError {
    /// Empty query provided.
    #[error("query is empty")]
    EmptyQuery,
    /// The point set holds no points.
    #[error("point set is empty")]
    EmptyIndex,
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Dimension mismatch between query and indexed points.
    #[error("dimension mismatch: query has {query_dim} dimensions, index has {index_dim}")]
    DimensionMismatch { query_dim: usize, index_dim: usize },
}

pub type Result<T> = std::result::Result<T, KdForestError>;
