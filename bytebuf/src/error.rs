//! Error types for buffer operations.

use thiserror::Error;

/// Buffer operation error.
///
/// A successful `Ok(0)` is never represented here: it means "no progress
/// right now" and callers are expected to retry or stop on their own terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The source or destination span was empty.
    #[error("buffer: invalid argument")]
    InvalidArgument,

    /// The checked copy refused to copy `needed` bytes into `available` bytes.
    #[error("buffer: copy fault: need {needed} bytes, destination holds {available}")]
    CopyFault { needed: usize, available: usize },

    /// A chained buffer was read while it held no segments at all.
    #[error("buffer: no data")]
    NoData,
}

impl BufferError {
    /// Returns the legacy negative status code for this error.
    ///
    /// `InvalidArgument` is `-0xffff`, `NoData` is `-1` and `CopyFault` is
    /// the negated `ERANGE` that `memcpy_s` reports for a short destination.
    pub fn code(&self) -> i64 {
        match self {
            BufferError::InvalidArgument => -0xffff,
            BufferError::NoData => -1,
            BufferError::CopyFault { .. } => -34,
        }
    }
}

/// Copies `src` into the front of `dst`.
///
/// Returns the number of bytes copied, or [`BufferError::CopyFault`] without
/// touching `dst` if it is shorter than `src`.
pub(crate) fn copy_checked(dst: &mut [u8], src: &[u8]) -> Result<usize, BufferError> {
    if dst.len() < src.len() {
        tracing::warn!(needed = src.len(), available = dst.len(), "buffer: copy fault");
        return Err(BufferError::CopyFault {
            needed: src.len(),
            available: dst.len(),
        });
    }
    dst[..src.len()].copy_from_slice(src);
    Ok(src.len())
}
