//! Growable chained buffer implementation.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BufferError;
use crate::segment::Segment;

/// Segment size used when none was configured.
pub const DEFAULT_SEGMENT_SIZE: usize = 1024;

/// A thread-safe growable byte buffer built from a chain of segments.
///
/// `ChainedBuffer` is an unbounded FIFO byte stream. Writes append to the
/// tail segment and allocate a new one whenever it fills up; reads consume
/// the head segment and drop it as soon as it is fully drained. Memory use
/// therefore follows the amount of unread data, one segment at a time.
///
/// # Semantics
///
/// - **Write**: Never blocks, never fails for lack of space (grows instead)
/// - **Read**: Never blocks; returns whatever is buffered, possibly `Ok(0)`
/// - **No data**: Reading a buffer that holds no segments is [`BufferError::NoData`]
///
/// Callers that want to wait for data must poll; use [`RingBuffer`] for a
/// blocking, bounded alternative.
///
/// # Example
///
/// ```
/// use giztoy_bytebuf::ChainedBuffer;
///
/// let buf = ChainedBuffer::with_segment_size(4);
/// buf.write(b"hello world").unwrap();
/// assert_eq!(buf.segment_count(), 3);
///
/// let mut data = [0u8; 11];
/// assert_eq!(buf.read(&mut data).unwrap(), 11);
/// assert_eq!(&data, b"hello world");
/// ```
///
/// [`RingBuffer`]: crate::RingBuffer
pub struct ChainedBuffer {
    inner: Arc<Mutex<ChainState>>,
}

struct ChainState {
    segment_size: Option<usize>,
    segments: VecDeque<Segment>,
}

impl ChainState {
    fn segment_size(&self) -> usize {
        self.segment_size.unwrap_or(DEFAULT_SEGMENT_SIZE)
    }

    fn push_segment(&mut self) {
        let size = self.segment_size();
        self.segments.push_back(Segment::new(size));
        tracing::trace!(size, segments = self.segments.len(), "chained buffer: segment allocated");
    }

    /// Drops the head segment if it has been read to its end.
    fn reclaim_front(&mut self) -> bool {
        match self.segments.front() {
            Some(front) if front.needs_new_read_segment() => {
                self.segments.pop_front();
                tracing::trace!(segments = self.segments.len(), "chained buffer: segment reclaimed");
                true
            }
            _ => false,
        }
    }
}

impl Clone for ChainedBuffer {
    fn clone(&self) -> Self {
        ChainedBuffer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for ChainedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainedBuffer {
    /// Creates a new ChainedBuffer without a configured segment size.
    ///
    /// Until [`set_segment_size`](Self::set_segment_size) succeeds, segments
    /// are allocated with [`DEFAULT_SEGMENT_SIZE`] bytes.
    pub fn new() -> Self {
        ChainedBuffer {
            inner: Arc::new(Mutex::new(ChainState {
                segment_size: None,
                segments: VecDeque::new(),
            })),
        }
    }

    /// Creates a new ChainedBuffer whose segments hold `size` bytes each.
    ///
    /// A size of 0 leaves the segment size unset, like [`new`](Self::new).
    pub fn with_segment_size(size: usize) -> Self {
        let buf = Self::new();
        buf.set_segment_size(size);
        buf
    }

    /// Sets the segment size for all future segments.
    ///
    /// Only the first call with a non-zero size takes effect; every later
    /// call is ignored.
    pub fn set_segment_size(&self, size: usize) {
        let mut state = self.inner.lock();
        if state.segment_size.is_none() && size > 0 {
            state.segment_size = Some(size);
        }
    }

    /// Returns the capacity the next allocated segment will have.
    pub fn segment_size(&self) -> usize {
        self.inner.lock().segment_size()
    }

    /// Returns the number of segments currently held.
    pub fn segment_count(&self) -> usize {
        self.inner.lock().segments.len()
    }

    /// Returns the number of unread bytes across all segments.
    pub fn len(&self) -> usize {
        let state = self.inner.lock();
        state.segments.iter().map(Segment::readable).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all segments and their unread data.
    ///
    /// The segment size setting is kept.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.segments.clear();
    }

    /// Appends all of `src` to the buffer, allocating segments as needed.
    ///
    /// Returns `src.len()` on success.
    pub fn write(&self, src: &[u8]) -> Result<usize, BufferError> {
        if src.is_empty() {
            return Err(BufferError::InvalidArgument);
        }

        let mut state = self.inner.lock();
        let mut written = 0;
        while written < src.len() {
            let count = match state.segments.back_mut() {
                Some(tail) => tail.write(&src[written..])?,
                None => 0,
            };
            if count == 0 {
                state.push_segment();
            }
            written += count;
        }
        Ok(written)
    }

    /// Reads up to `dest.len()` bytes from the front of the buffer.
    ///
    /// A short read, including `Ok(0)`, means the reader has caught up with
    /// the writer. Returns [`BufferError::NoData`] if no segment exists.
    pub fn read(&self, dest: &mut [u8]) -> Result<usize, BufferError> {
        if dest.is_empty() {
            return Err(BufferError::InvalidArgument);
        }

        let mut state = self.inner.lock();
        if state.segments.is_empty() {
            return Err(BufferError::NoData);
        }

        let mut read = 0;
        while read < dest.len() {
            let count = match state.segments.front_mut() {
                Some(front) => front.read(&mut dest[read..])?,
                None => break,
            };
            read += count;

            let reclaimed = state.reclaim_front();
            if count == 0 && !reclaimed {
                break;
            }
        }
        Ok(read)
    }
}
