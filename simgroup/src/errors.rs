use std::fmt;

/// Which corpus an index or a value refers to.
///
/// In single-corpus mode only `Left` is ever used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Errors returned by the grouping engine.
///
/// Every variant names the invariant it guards, so callers can tell a bad
/// corpus from a bad operand or a call made in the wrong state.
#[derive(Debug, thiserror::Error)]
pub enum GrouperError {
    /// A corpus element was missing. Only string values can be grouped.
    #[error("{side} corpus element at index {index} is missing; every element must be a string")]
    MissingValue { side: Side, index: usize },

    /// An `add_match`/`remove_match` operand does not occur in its corpus.
    #[error("'{value}' does not occur in the {side} corpus")]
    StringNotFound { side: Side, value: String },

    /// Matches or groups were requested before `fit` ran.
    #[error("the string grouper has not been fit; call fit() before querying or editing matches")]
    NotFit,

    /// A configuration value is out of range.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The normalization pattern failed to compile.
    #[error("invalid normalization pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The worker pool used by `fit` could not be created.
    #[error("failed to build the worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl GrouperError {
    pub(crate) fn invalid_config<V: fmt::Display>(
        field: &'static str,
        value: V,
        reason: &'static str,
    ) -> Self {
        GrouperError::InvalidConfig {
            field,
            value: value.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, GrouperError>;
