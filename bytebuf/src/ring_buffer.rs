//! Fixed-size blocking ring buffer implementation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::error::{copy_checked, BufferError};

/// Default upper bound on a single wait inside a blocking read or write.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(4);

/// The most recent operation that moved a ring buffer cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastOperation {
    #[default]
    None,
    Read,
    Write,
}

/// A thread-safe fixed-capacity byte ring buffer with blocking reads and writes.
///
/// `RingBuffer` stores at most `capacity` bytes. A write blocks until enough
/// space is free and a read blocks until its destination is filled, so the
/// buffer applies backpressure in both directions. Blocked callers wait on a
/// condition variable and re-check their condition at least once per poll
/// timeout.
///
/// # Semantics
///
/// - **Write**: Blocks until the bytes fit, then copies them in one step
/// - **Read**: Blocks until `dest` is full
/// - **Shutdown**: Wakes every waiter; blocked calls return the count so far
///
/// A write of at most `capacity` bytes is copied under a single lock
/// acquisition and is never interleaved with another writer. Larger writes
/// are copied in capacity-sized pieces as space frees up.
///
/// # Example
///
/// ```
/// use giztoy_bytebuf::RingBuffer;
/// use std::thread;
///
/// let buf = RingBuffer::new(8);
/// let producer_buf = buf.clone();
///
/// // Writes 32 bytes through an 8-byte ring, blocking while it is full
/// let producer = thread::spawn(move || {
///     let payload: Vec<u8> = (0..32).collect();
///     producer_buf.write(&payload).unwrap()
/// });
///
/// let mut data = [0u8; 32];
/// assert_eq!(buf.read(&mut data).unwrap(), 32);
/// assert_eq!(producer.join().unwrap(), 32);
/// assert_eq!(data[31], 31);
/// ```
pub struct RingBuffer {
    inner: Arc<RingInner>,
}

struct RingInner {
    capacity: usize,
    state: Mutex<RingState>,
    not_full: Condvar,
    not_empty: Condvar,
}

struct RingState {
    storage: Box<[u8]>,
    read_offset: usize,
    write_offset: usize,
    len: usize,
    last_op: LastOperation,
    shutdown: bool,
}

impl RingState {
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn free(&self) -> usize {
        self.capacity() - self.len
    }

    /// Copies all of `src` in at the write cursor. `src` must fit.
    fn push(&mut self, src: &[u8]) -> Result<usize, BufferError> {
        let capacity = self.capacity();
        let w = self.write_offset;
        let first = src.len().min(capacity - w);

        copy_checked(&mut self.storage[w..w + first], &src[..first])?;
        if first < src.len() {
            // Wrapped: the rest goes in front of the read cursor.
            let end = src.len() - first;
            copy_checked(&mut self.storage[..end], &src[first..])?;
        }

        self.write_offset = (w + src.len()) % capacity;
        self.len += src.len();
        self.last_op = LastOperation::Write;
        self.debug_check();
        Ok(src.len())
    }

    /// Copies as many buffered bytes as fit into `dest`.
    fn pop(&mut self, dest: &mut [u8]) -> Result<usize, BufferError> {
        let capacity = self.capacity();
        let r = self.read_offset;
        let n = dest.len().min(self.len);
        let first = n.min(capacity - r);

        copy_checked(&mut dest[..first], &self.storage[r..r + first])?;
        if first < n {
            copy_checked(&mut dest[first..n], &self.storage[..n - first])?;
        }

        self.read_offset = (r + n) % capacity;
        self.len -= n;
        self.last_op = LastOperation::Read;
        self.debug_check();
        Ok(n)
    }

    fn debug_check(&self) {
        debug_assert!(self.len <= self.capacity());
        debug_assert_eq!(
            (self.read_offset + self.len) % self.capacity(),
            self.write_offset
        );
        if self.read_offset == self.write_offset {
            debug_assert_eq!(
                self.len == self.capacity(),
                self.last_op == LastOperation::Write
            );
        }
    }
}

impl Clone for RingBuffer {
    fn clone(&self) -> Self {
        RingBuffer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl RingBuffer {
    /// Creates a new RingBuffer holding at most `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");

        RingBuffer {
            inner: Arc::new(RingInner {
                capacity,
                state: Mutex::new(RingState {
                    storage: vec![0u8; capacity].into_boxed_slice(),
                    read_offset: 0,
                    write_offset: 0,
                    len: 0,
                    last_op: LastOperation::None,
                    shutdown: false,
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
            }),
        }
    }

    /// Returns the buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Returns the number of bytes currently buffered.
    pub fn len(&self) -> usize {
        self.inner.state.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().len == 0
    }

    pub fn is_full(&self) -> bool {
        let state = self.inner.state.lock();
        state.len == state.capacity()
    }

    /// Returns true if `n` more bytes would fit without blocking.
    pub fn has_free_space(&self, n: usize) -> bool {
        let state = self.inner.state.lock();
        state.len.saturating_add(n) <= state.capacity()
    }

    /// Returns the last operation that moved a cursor.
    pub fn last_operation(&self) -> LastOperation {
        self.inner.state.lock().last_op
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.state.lock().shutdown
    }

    /// Shuts the buffer down and wakes every blocked reader and writer.
    ///
    /// Blocked and future calls return the number of bytes transferred so far.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock();
        if state.shutdown {
            return;
        }
        state.shutdown = true;
        tracing::debug!(buffered = state.len, "ring buffer: shutdown");
        self.inner.not_empty.notify_all();
        self.inner.not_full.notify_all();
    }

    /// Discards all buffered bytes.
    ///
    /// This does not change the shutdown state of the buffer.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        state.read_offset = 0;
        state.write_offset = 0;
        state.len = 0;
        state.last_op = LastOperation::None;
        self.inner.not_full.notify_all();
    }

    /// Writes all of `src`, blocking while the buffer lacks space.
    ///
    /// Uses [`DEFAULT_POLL_TIMEOUT`] between re-checks.
    pub fn write(&self, src: &[u8]) -> Result<usize, BufferError> {
        self.write_timeout(src, DEFAULT_POLL_TIMEOUT)
    }

    /// Writes all of `src`, waiting at most `poll` before each re-check.
    ///
    /// Returns the number of bytes written, which is less than `src.len()`
    /// only if the buffer was shut down meanwhile.
    pub fn write_timeout(&self, src: &[u8], poll: Duration) -> Result<usize, BufferError> {
        if src.is_empty() {
            return Err(BufferError::InvalidArgument);
        }

        let mut state = self.inner.state.lock();
        let mut written = 0;
        while written < src.len() && !state.shutdown {
            let wanted = (src.len() - written).min(state.capacity());
            if state.free() < wanted {
                tracing::trace!(wanted, free = state.free(), "ring buffer: waiting for space");
                self.inner.not_full.wait_for(&mut state, poll);
                continue;
            }

            written += state.push(&src[written..written + wanted])?;
            self.inner.not_empty.notify_one();
        }
        Ok(written)
    }

    /// Fills `dest`, blocking while the buffer is empty.
    ///
    /// Uses [`DEFAULT_POLL_TIMEOUT`] between re-checks.
    pub fn read(&self, dest: &mut [u8]) -> Result<usize, BufferError> {
        self.read_timeout(dest, DEFAULT_POLL_TIMEOUT)
    }

    /// Fills `dest`, waiting at most `poll` before each re-check.
    ///
    /// Returns the number of bytes read, which is less than `dest.len()`
    /// only if the buffer was shut down meanwhile.
    pub fn read_timeout(&self, dest: &mut [u8], poll: Duration) -> Result<usize, BufferError> {
        if dest.is_empty() {
            return Err(BufferError::InvalidArgument);
        }

        let mut state = self.inner.state.lock();
        let mut read = 0;
        while read < dest.len() && !state.shutdown {
            if state.len == 0 {
                tracing::trace!(wanted = dest.len() - read, "ring buffer: waiting for data");
                self.inner.not_empty.wait_for(&mut state, poll);
                continue;
            }

            read += state.pop(&mut dest[read..])?;
            self.inner.not_full.notify_one();
        }
        Ok(read)
    }
}
