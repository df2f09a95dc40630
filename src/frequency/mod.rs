use crate::{Symbol, NUM_BYTES};

/// Occurrence count of every data byte plus the end-of-stream marker.
///
/// Tables produced by [`build`](FrequencyTable::build) and
/// [`from_counts`](FrequencyTable::from_counts) always count the marker at
/// least once, so a tree built from them always has a code for it. The
/// `Default` table is all zeros and is only useful as an "unforced" table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; NUM_BYTES],
    end_of_stream: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; NUM_BYTES], end_of_stream: 0 }
    }
}

impl FrequencyTable {
    pub fn build(input: &[u8]) -> Self {
        let mut table = Self::default();
        table.add(input);
        table.force_end_of_stream();
        table
    }

    /// Builds a table from explicit byte counts. The marker is still forced.
    pub fn from_counts(counts: [u64; NUM_BYTES], end_of_stream: u64) -> Self {
        let mut table = Self { counts, end_of_stream };
        table.force_end_of_stream();
        table
    }

    fn add(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
    }

    fn force_end_of_stream(&mut self) {
        self.end_of_stream = self.end_of_stream.max(1);
    }

    pub fn count(&self, symbol: Symbol) -> u64 {
        match symbol {
            Symbol::Byte(b) => self.counts[b as usize],
            Symbol::EndOfStream => self.end_of_stream,
        }
    }

    /// Symbols with a non-zero count, in symbol order.
    pub fn symbols(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter()
            .enumerate()
            .map(|(b, &c)| (Symbol::Byte(b as u8), c))
            .chain(std::iter::once((Symbol::EndOfStream, self.end_of_stream)))
            .filter(|&(_, c)| c > 0)
    }

    pub fn distinct(&self) -> usize {
        self.symbols().count()
    }

    /// Number of data bytes counted, excluding the marker.
    pub fn total_bytes(&self) -> u64 {
        self.counts.iter().sum()
    }
}
