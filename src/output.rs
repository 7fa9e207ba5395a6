//! Append-only solution buffer. Each emitted solution is a fixed 32-byte
//! record; an atomic cursor hands out disjoint record indices so concurrent
//! workers never need a lock to append.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const RECORD_LEN: usize = 32;

pub struct SolutionBuffer {
    buf: UnsafeCell<Box<[u8]>>,
    count: AtomicUsize,
    capacity: usize,
}

// SAFETY: every write touches exactly the byte range `[idx*32, idx*32+32)`
// for an `idx` obtained via a unique `fetch_add`, so concurrent `push` calls
// never touch overlapping bytes. `buf` is never resized after construction.
unsafe impl Sync for SolutionBuffer {}

impl SolutionBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: UnsafeCell::new(vec![0u8; capacity * RECORD_LEN].into_boxed_slice()),
            count: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Appends one solution record, returning its assigned index. Panics if
    /// the buffer is already full; callers size the buffer from an
    /// upper-bound solution-count estimate so this should never trigger in
    /// practice, but a hard panic beats silent truncation of results.
    pub fn push(&self, record: &[u8; RECORD_LEN]) -> usize {
        let idx = self.count.fetch_add(1, Ordering::Relaxed);
        assert!(idx < self.capacity, "solution buffer overflow");

        let offset = idx * RECORD_LEN;
        // SAFETY: see the `unsafe impl Sync` comment above.
        unsafe {
            let base = (*self.buf.get()).as_mut_ptr();
            std::ptr::copy_nonoverlapping(record.as_ptr(), base.add(offset), RECORD_LEN);
        }
        idx
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// The written prefix of the buffer, `count() * 32` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        let n = self.count().min(self.capacity);
        // SAFETY: bytes [0, n*32) have each been written exactly once by a
        // `push` that happened-before this read returns a count >= n.
        unsafe { &(*self.buf.get())[..n * RECORD_LEN] }
    }
}

/// Formats one solution's five chosen word spellings into the fixed 32-byte
/// record layout: `"aaaaa\tbbbbb\tccccc\tddddd\teeeee  \n"`.
pub fn format_record(words: &[&[u8; 5]; 5]) -> [u8; RECORD_LEN] {
    let mut record = [0u8; RECORD_LEN];
    let mut pos = 0;
    for (i, word) in words.iter().enumerate() {
        record[pos..pos + 5].copy_from_slice(*word);
        pos += 5;
        if i < 4 {
            record[pos] = b'\t';
            pos += 1;
        }
    }
    record[pos] = b' ';
    record[pos + 1] = b' ';
    record[pos + 2] = b'\n';
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_the_exact_record_layout() {
        let words: [&[u8; 5]; 5] = [b"aaaaa", b"bbbbb", b"ccccc", b"ddddd", b"eeeee"];
        let record = format_record(&words);
        assert_eq!(&record, b"aaaaa\tbbbbb\tccccc\tddddd\teeeee  \n");
    }

    #[test]
    fn concurrent_pushes_land_in_disjoint_slots() {
        use std::thread;

        let buf = SolutionBuffer::with_capacity(1000);
        thread::scope(|s| {
            for t in 0..8u8 {
                let buf = &buf;
                s.spawn(move || {
                    for _ in 0..100 {
                        let words: [&[u8; 5]; 5] =
                            [b"aaaaa", b"bbbbb", b"ccccc", b"ddddd", b"eeeee"];
                        let mut record = format_record(&words);
                        record[0] = b'a' + t;
                        buf.push(&record);
                    }
                });
            }
        });

        assert_eq!(buf.count(), 800);
        assert_eq!(buf.as_bytes().len(), 800 * RECORD_LEN);
    }
}
