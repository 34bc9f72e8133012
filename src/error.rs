use std::collections::TryReserveError;

use thiserror::Error;

/// Errors returned by the clustering engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },

    /// An allocation failed while building the index or running the traversal.
    #[error("resource exhausted while allocating {what}")]
    ResourceExhausted {
        /// Which buffer could not be allocated.
        what: &'static str,
        /// Underlying allocator error.
        #[source]
        source: TryReserveError,
    },
}

impl Error {
    /// True for the errors caused by bad caller input (parameters or point shape).
    ///
    /// These are always reported before any index is built.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Error::ResourceExhausted { .. })
    }

    pub(crate) fn exhausted(what: &'static str) -> impl FnOnce(TryReserveError) -> Error {
        move |source| Error::ResourceExhausted { what, source }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
