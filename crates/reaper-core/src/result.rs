//! Convenience result type alias for REAPER.

use crate::error::ReaperError;

/// A specialized `Result` type for REAPER operations.
pub type ReaperResult<T> = Result<T, ReaperError>;
