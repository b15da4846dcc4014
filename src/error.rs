//! Error types for the string domain.
//!
//! Only contract violations are errors. Precision loss in a transfer
//! function is never reported here: it yields `⊤` (or `Unknown`).

use thiserror::Error;

/// Invalid arithmetic on [`ExtendedIndex`][crate::index::ExtendedIndex] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The result of a subtraction would be negative.
    #[error("cannot subtract {subtrahend} from {minuend}: result would be negative")]
    Negative { minuend: usize, subtrahend: usize },

    /// Subtracting an infinite index is undefined.
    #[error("cannot subtract an infinite index")]
    InfiniteSubtrahend,
}

/// Errors raised by lattice operations and value construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A brick was built with an infinite repetition lower bound.
    #[error("brick minimum cannot be infinite")]
    InfiniteMinimum,

    /// Index arithmetic failed while combining ill-formed operands.
    #[error("ill-formed operands: {0}")]
    Index(#[from] IndexError),
}

pub type Result<T, E = DomainError> = std::result::Result<T, E>;
