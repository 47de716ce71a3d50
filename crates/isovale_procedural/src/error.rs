//! # World Generation Error Types
//!
//! The numeric core is total over its domain; the only recoverable failure
//! is a caller requesting a degenerate grid.

use thiserror::Error;

/// Errors that can occur when generating a world.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldGenError {
    /// Requested grid dimensions are not positive.
    #[error("invalid world dimensions: {width}x{height} (both must be positive)")]
    InvalidDimension {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
}

/// Result type for world generation.
pub type WorldGenResult<T> = Result<T, WorldGenError>;
