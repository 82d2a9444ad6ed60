//! Convenience result type alias for Suitter.

use crate::error::AppError;

/// A specialized `Result` type for Suitter operations.
pub type AppResult<T> = Result<T, AppError>;
