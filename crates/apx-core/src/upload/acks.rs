//! Acknowledged-chunk set: one bit per chunk (LSB of byte 0 = chunk 0).

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AckSet {
    bytes: Vec<u8>,
    total: usize,
    count: usize,
}

impl AckSet {
    /// Empty set over indices `[0, total)`.
    pub fn new(total: usize) -> Self {
        AckSet {
            bytes: vec![0u8; total.div_ceil(8)],
            total,
            count: 0,
        }
    }

    /// Record `index`. Returns false if it is out of range or already present.
    pub fn insert(&mut self, index: usize) -> bool {
        if index >= self.total || self.contains(index) {
            return false;
        }
        self.bytes[index / 8] |= 1 << (index % 8);
        self.count += 1;
        true
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bytes
            .get(index / 8)
            .map(|&b| (b & (1 << (index % 8))) != 0)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True if every index in `[0, total)` is present.
    pub fn is_full(&self) -> bool {
        self.count == self.total
    }

    /// Indices not yet acknowledged, ascending.
    pub fn missing(&self) -> Vec<usize> {
        (0..self.total).filter(|&i| !self.contains(i)).collect()
    }
}
