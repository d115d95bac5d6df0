//! Thread-safe byte buffers for streaming data between threads.
//!
//! This crate decouples a producer thread from a consumer thread that run
//! at different rates. It offers two buffer types with the same read/write
//! shape but different space and blocking trade-offs:
//!
//! - [`ChainedBuffer`]: An unbounded buffer built from fixed-size [`Segment`]s
//! - [`RingBuffer`]: A fixed-capacity circular buffer that blocks when full or empty
//!
//! # Buffer Types
//!
//! ## ChainedBuffer (Growable, Non-blocking)
//!
//! [`ChainedBuffer`] never blocks and never drops data: writes allocate new
//! segments as needed and reads drop segments once drained. A read returns
//! whatever is buffered, so consumers poll.
//!
//! ```
//! use giztoy_bytebuf::ChainedBuffer;
//!
//! let buf = ChainedBuffer::with_segment_size(1024);
//! buf.write(&[1, 2, 3]).unwrap();
//!
//! let mut data = [0u8; 8];
//! let n = buf.read(&mut data).unwrap();
//! assert_eq!(&data[..n], &[1, 2, 3]);
//! ```
//!
//! ## RingBuffer (Fixed, Blocking)
//!
//! [`RingBuffer`] bounds memory and provides backpressure: writes block
//! until there is room and reads block until the destination is filled.
//!
//! ```
//! use giztoy_bytebuf::RingBuffer;
//!
//! let buf = RingBuffer::new(4);
//! buf.write(&[1, 2, 3, 4]).unwrap();  // Buffer is now full
//! assert!(buf.is_full());
//! // Next write would block until space is available
//! ```
//!
//! # Errors
//!
//! Both buffers return `Result<usize, BufferError>`. `Ok(0)` is a valid
//! "no progress" result, not an error; see [`BufferError`] for the failures.
//!
//! # Shutdown
//!
//! [`RingBuffer::shutdown`] wakes every blocked reader and writer. They
//! return the number of bytes transferred before the shutdown.
//!
//! # Thread Safety
//!
//! Both buffer types are `Send + Sync` and can be shared between threads
//! using `Clone` (which shares the underlying buffer via `Arc`). They are
//! intended for one writer and one reader at a time.
//!
//! # Convenience Functions
//!
//! The [`bytes`] module provides pre-sized constructors:
//!
//! ```
//! use giztoy_bytebuf::{chain_bytes_4kb, ring_bytes_4kb};
//!
//! let growable = chain_bytes_4kb();
//! let blocking = ring_bytes_4kb();
//! ```

pub mod bytes;
mod chained_buffer;
mod error;
mod ring_buffer;
mod segment;

pub use bytes::*;
pub use chained_buffer::{ChainedBuffer, DEFAULT_SEGMENT_SIZE};
pub use error::BufferError;
pub use ring_buffer::{LastOperation, RingBuffer, DEFAULT_POLL_TIMEOUT};
pub use segment::Segment;
