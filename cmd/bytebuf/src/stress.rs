//! Producer/consumer stress runs over a chained or ring buffer.
//!
//! A writer thread pushes `iterations` payloads; payload `i` is
//! `i % 26 + 65` bytes long and every byte equals that length. The reader
//! pulls payloads of the same lengths and counts the ones that differ.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use giztoy_bytebuf::{BufferError, ChainedBuffer, RingBuffer};

use crate::config::StressConfig;

/// Outcome of a stress run.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: &'static str,
    pub payloads: usize,
    pub bytes: usize,
    pub mismatches: usize,
    pub elapsed: Duration,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.mismatches == 0
    }
}

/// Returns payload `i` of the stress sequence.
pub fn payload(i: usize) -> Vec<u8> {
    let j = (i % 26 + 65) as u8;
    vec![j; j as usize]
}

/// The operations a stress run needs from a buffer.
trait Pipe: Clone + Send + 'static {
    const KIND: &'static str;

    fn send(&self, src: &[u8]) -> Result<usize, BufferError>;

    /// Fills `dest` unless the writer is gone and nothing more will arrive.
    fn receive(&self, dest: &mut [u8], writer_done: &AtomicBool) -> Result<usize, BufferError>;

    /// Releases a reader that would otherwise wait forever.
    fn abort(&self);
}

impl Pipe for ChainedBuffer {
    const KIND: &'static str = "chain";

    fn send(&self, src: &[u8]) -> Result<usize, BufferError> {
        self.write(src)
    }

    fn receive(&self, dest: &mut [u8], writer_done: &AtomicBool) -> Result<usize, BufferError> {
        let mut filled = 0;
        while filled < dest.len() {
            // Sample before reading so a final write is never missed.
            let done = writer_done.load(Ordering::Acquire);
            match self.read(&mut dest[filled..]) {
                Ok(0) | Err(BufferError::NoData) => {
                    if done {
                        break;
                    }
                    thread::yield_now();
                }
                Ok(n) => filled += n,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn abort(&self) {}
}

/// A ring buffer with the poll timeout used for every call.
#[derive(Clone)]
struct PolledRing {
    ring: RingBuffer,
    poll: Duration,
}

impl Pipe for PolledRing {
    const KIND: &'static str = "ring";

    fn send(&self, src: &[u8]) -> Result<usize, BufferError> {
        self.ring.write_timeout(src, self.poll)
    }

    fn receive(&self, dest: &mut [u8], _writer_done: &AtomicBool) -> Result<usize, BufferError> {
        self.ring.read_timeout(dest, self.poll)
    }

    fn abort(&self) {
        self.ring.shutdown();
    }
}

/// Runs the stress sequence through a [`ChainedBuffer`].
pub fn run_chain(config: &StressConfig) -> Result<Report> {
    config.validate()?;
    run(ChainedBuffer::with_segment_size(config.size), config)
}

/// Runs the stress sequence through a [`RingBuffer`].
pub fn run_ring(config: &StressConfig) -> Result<Report> {
    config.validate()?;
    let pipe = PolledRing {
        ring: RingBuffer::new(config.size),
        poll: Duration::from_millis(config.poll_ms),
    };
    run(pipe, config)
}

fn run<P: Pipe>(pipe: P, config: &StressConfig) -> Result<Report> {
    let iterations = config.iterations;
    let keep = config.dump.is_some();
    let writer_done = Arc::new(AtomicBool::new(false));

    tracing::info!(kind = P::KIND, iterations, size = config.size, "stress: starting");
    let start = Instant::now();

    let writer = {
        let pipe = pipe.clone();
        let writer_done = Arc::clone(&writer_done);
        thread::spawn(move || -> Result<Vec<u8>> {
            let mut sent = Vec::new();
            let result = (0..iterations).try_for_each(|i| {
                let data = payload(i);
                let n = pipe.send(&data)?;
                if n != data.len() {
                    tracing::warn!(payload = i, written = n, "stress: short write");
                }
                if keep {
                    sent.extend_from_slice(&data[..n]);
                }
                Ok::<_, BufferError>(())
            });
            writer_done.store(true, Ordering::Release);
            if result.is_err() {
                pipe.abort();
            }
            result.context("writer failed")?;
            Ok(sent)
        })
    };

    let mut received = Vec::new();
    let mut bytes = 0;
    let mut mismatches = 0;
    for i in 0..iterations {
        let expected = payload(i);
        let mut data = vec![0u8; expected.len()];
        let n = pipe
            .receive(&mut data, &writer_done)
            .with_context(|| format!("reader failed at payload {i}"))?;
        bytes += n;

        if n != expected.len() || data != expected {
            mismatches += 1;
            tracing::warn!(payload = i, read = n, want = expected.len(), "stress: read unexpected");
        }
        if keep {
            received.extend_from_slice(&data);
        }
    }

    let sent = writer
        .join()
        .map_err(|_| anyhow::anyhow!("writer thread panicked"))??;
    let elapsed = start.elapsed();

    if let Some(dir) = &config.dump {
        dump(dir, &sent, &received)?;
    }

    let report = Report {
        kind: P::KIND,
        payloads: iterations,
        bytes,
        mismatches,
        elapsed,
    };
    tracing::info!(kind = report.kind, bytes, mismatches, ?elapsed, "stress: finished");
    Ok(report)
}

/// Writes the sent and received streams to `src.bin` and `dst.bin`.
fn dump(dir: &Path, sent: &[u8], received: &[u8]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create dump directory: {}", dir.display()))?;
    for (name, data) in [("src.bin", sent), ("dst.bin", received)] {
        let path = dir.join(name);
        let mut file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(data)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
