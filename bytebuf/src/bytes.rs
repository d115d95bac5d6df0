//! Convenience functions for creating byte buffers.
//!
//! This module provides pre-configured constructors for common segment
//! sizes and ring capacities.

use crate::{ChainedBuffer, RingBuffer};

// ============================================================================
// ChainedBuffer convenience functions
// ============================================================================

/// Creates a chained buffer with 256B segments.
pub fn chain_bytes_256b() -> ChainedBuffer {
    ChainedBuffer::with_segment_size(256)
}

/// Creates a chained buffer with 1KB segments.
pub fn chain_bytes_1kb() -> ChainedBuffer {
    ChainedBuffer::with_segment_size(1024)
}

/// Creates a chained buffer with 4KB segments.
pub fn chain_bytes_4kb() -> ChainedBuffer {
    ChainedBuffer::with_segment_size(4096)
}

/// Creates a chained buffer with 16KB segments.
pub fn chain_bytes_16kb() -> ChainedBuffer {
    ChainedBuffer::with_segment_size(16384)
}

/// Creates a chained buffer with 64KB segments.
pub fn chain_bytes_64kb() -> ChainedBuffer {
    ChainedBuffer::with_segment_size(65536)
}

/// Creates a default chained buffer with 1KB segments.
pub fn chain_bytes() -> ChainedBuffer {
    chain_bytes_1kb()
}

// ============================================================================
// RingBuffer convenience functions
// ============================================================================

/// Creates a 1KB ring buffer.
pub fn ring_bytes_1kb() -> RingBuffer {
    RingBuffer::new(1024)
}

/// Creates a 4KB ring buffer.
pub fn ring_bytes_4kb() -> RingBuffer {
    RingBuffer::new(4096)
}

/// Creates a 16KB ring buffer.
pub fn ring_bytes_16kb() -> RingBuffer {
    RingBuffer::new(16384)
}

/// Creates a 64KB ring buffer.
pub fn ring_bytes_64kb() -> RingBuffer {
    RingBuffer::new(65536)
}

/// Creates a ring buffer with the specified capacity.
pub fn ring_bytes(size: usize) -> RingBuffer {
    RingBuffer::new(size)
}
