//! Chunk type and range planning.

/// One chunk of the source file: byte range [start, end) (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based sequence index sent to the backend.
    pub index: usize,
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
}

impl Chunk {
    /// Length of this chunk in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Number of chunks for a file: `ceil(total_size / chunk_size)`.
pub fn chunk_count(total_size: u64, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    total_size.div_ceil(chunk_size as u64) as usize
}

/// Splits `total_size` bytes into fixed-size chunks; the last one may be shorter.
///
/// Returns an empty vec if `total_size` is 0 or `chunk_size` is 0.
pub fn plan_chunks(total_size: u64, chunk_size: usize) -> Vec<Chunk> {
    let count = chunk_count(total_size, chunk_size);
    let size = chunk_size as u64;
    (0..count)
        .map(|index| {
            let start = index as u64 * size;
            Chunk {
                index,
                start,
                end: (start + size).min(total_size),
            }
        })
        .collect()
}
