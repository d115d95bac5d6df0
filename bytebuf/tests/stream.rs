//! Producer/consumer streaming across threads for both buffer types.

use std::thread;
use std::time::Duration;

use giztoy_bytebuf::{BufferError, ChainedBuffer, RingBuffer};

/// Payload `i` is `i % 26 + 65` bytes long, every byte equal to its length.
fn letter_payload(i: usize) -> Vec<u8> {
    let j = (i % 26 + 65) as u8;
    vec![j; j as usize]
}

/// Deterministic pseudo-random sizes in `1..=max`.
fn sizes(seed: u64, count: usize, max: usize) -> Vec<usize> {
    let mut x = seed;
    (0..count)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x % max as u64) as usize + 1
        })
        .collect()
}

/// Reads exactly `dest.len()` bytes from a chained buffer, polling on short reads.
fn chain_read_full(buf: &ChainedBuffer, dest: &mut [u8]) {
    let mut filled = 0;
    while filled < dest.len() {
        match buf.read(&mut dest[filled..]) {
            Ok(0) | Err(BufferError::NoData) => thread::yield_now(),
            Ok(n) => filled += n,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[test]
fn chained_letter_stream() {
    const ITERATIONS: usize = 5000;
    let buf = ChainedBuffer::with_segment_size(1024);
    let writer_buf = buf.clone();

    let writer = thread::spawn(move || {
        for i in 0..ITERATIONS {
            let payload = letter_payload(i);
            assert_eq!(writer_buf.write(&payload).unwrap(), payload.len());
        }
    });

    for i in 0..ITERATIONS {
        let expected = letter_payload(i);
        let mut data = vec![0u8; expected.len()];
        chain_read_full(&buf, &mut data);
        assert_eq!(data, expected, "payload {i} corrupted");
    }

    writer.join().unwrap();
    assert!(buf.is_empty());
    assert!(buf.segment_count() <= 1);
}

#[test]
fn ring_letter_stream() {
    const ITERATIONS: usize = 5000;
    let buf = RingBuffer::new(1024);
    let writer_buf = buf.clone();

    let writer = thread::spawn(move || {
        for i in 0..ITERATIONS {
            let payload = letter_payload(i);
            assert_eq!(writer_buf.write(&payload).unwrap(), payload.len());
        }
    });

    for i in 0..ITERATIONS {
        let expected = letter_payload(i);
        let mut data = vec![0u8; expected.len()];
        assert_eq!(buf.read(&mut data).unwrap(), data.len());
        assert_eq!(data, expected, "payload {i} corrupted");
    }

    writer.join().unwrap();
    assert!(buf.is_empty());
}

#[test]
fn chained_round_trip_with_mismatched_sizes() {
    let buf = ChainedBuffer::with_segment_size(37);
    let mut written = Vec::new();
    let mut read = Vec::new();
    let mut counter = 0u8;

    let write_sizes = sizes(7, 200, 90);
    let read_sizes = sizes(11, 400, 60);
    let mut reads = read_sizes.iter().cycle();

    for size in write_sizes {
        let payload: Vec<u8> = (0..size)
            .map(|_| {
                counter = counter.wrapping_add(1);
                counter
            })
            .collect();
        buf.write(&payload).unwrap();
        written.extend_from_slice(&payload);

        let mut dest = vec![0u8; *reads.next().unwrap()];
        match buf.read(&mut dest) {
            Ok(n) => read.extend_from_slice(&dest[..n]),
            Err(BufferError::NoData) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
        assert!(read.len() <= written.len());
    }

    let mut rest = vec![0u8; buf.len()];
    if !rest.is_empty() {
        chain_read_full(&buf, &mut rest);
        read.extend_from_slice(&rest);
    }
    assert_eq!(read, written);
}

#[test]
fn ring_round_trip_with_mismatched_sizes() {
    let buf = RingBuffer::new(64);
    let write_sizes = sizes(3, 300, 100);
    let total: usize = write_sizes.iter().sum();

    let expected: Vec<u8> = (0..total).map(|i| (i % 251) as u8).collect();
    let source = expected.clone();
    let writer_buf = buf.clone();

    let writer = thread::spawn(move || {
        let mut offset = 0;
        for size in write_sizes {
            writer_buf.write(&source[offset..offset + size]).unwrap();
            offset += size;
        }
    });

    let mut collected = Vec::with_capacity(total);
    let mut reads = sizes(5, 100, 80).into_iter().cycle();
    while collected.len() < total {
        let want = reads.next().unwrap().min(total - collected.len());
        let mut dest = vec![0u8; want];
        let n = buf.read(&mut dest).unwrap();
        collected.extend_from_slice(&dest[..n]);
    }

    writer.join().unwrap();
    assert_eq!(collected, expected);
}

#[test]
fn ring_shutdown_releases_both_sides() {
    let data_ring = RingBuffer::new(8);
    let space_ring = RingBuffer::new(8);
    space_ring.write(&[0; 8]).unwrap();

    let reader_ring = data_ring.clone();
    let reader = thread::spawn(move || {
        let mut dest = [0u8; 4];
        reader_ring.read_timeout(&mut dest, Duration::from_secs(30)).unwrap()
    });

    let writer_ring = space_ring.clone();
    let writer = thread::spawn(move || {
        writer_ring.write_timeout(&[1; 4], Duration::from_secs(30)).unwrap()
    });

    thread::sleep(Duration::from_millis(50));
    data_ring.shutdown();
    space_ring.shutdown();

    assert_eq!(reader.join().unwrap(), 0);
    assert_eq!(writer.join().unwrap(), 0);
}
