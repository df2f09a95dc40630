use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BitstreamError {
    #[error("bit stream exhausted after {read_bits} bits")]
    StreamExhausted { read_bits: usize },
}

/// The byte-aligned result of a [`BinaryWriterBuilder`].
#[derive(Debug)]
pub struct BinaryWriter {
    pub os: Box<[u8]>,
}

/// Accumulates bits MSB-first into whole bytes.
///
/// `current` holds the partial byte; its lowest `8 - free` bits are not yet
/// meaningful on their own and only reach `os` once the byte is full or the
/// builder is flushed.
#[derive(Debug)]
pub struct BinaryWriterBuilder {
    os: Vec<u8>,
    pub written_bits: usize,
    pub current: u64,
    pub free: usize,
}

impl Default for BinaryWriterBuilder {
    fn default() -> Self {
        BinaryWriterBuilder {
            os: Vec::default(),
            written_bits: 0,
            current: 0,
            free: 8,
        }
    }
}

impl BinaryWriterBuilder {
    /// Flushes the pending partial byte and hands back the bytes.
    pub fn build(mut self) -> BinaryWriter {
        self.flush();

        BinaryWriter {
            os: self.os.into_boxed_slice()
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of whole bytes already emitted.
    pub fn len(&self) -> usize {
        self.os.len()
    }

    pub fn is_empty(&self) -> bool {
        self.os.is_empty() && self.free == 8
    }

    #[inline(always)]
    pub fn write(&mut self, b: u64) {
        self.os.push(b as u8);
    }

    /// Writes a whole byte. Only valid on a byte boundary.
    pub fn write_byte(&mut self, b: u8) {
        debug_assert_eq!(self.free, 8, "write_byte called with a partial byte pending");
        self.write(b as u64);
        self.written_bits += 8;
    }

    #[inline(always)]
    pub fn write_in_current(&mut self, b: u64, len: u64) -> u64 {
        self.free -= len as usize;
        self.current |= (b & ((1 << len) - 1)) << self.free;

        if self.free == 0 {
            self.write(self.current);
            self.free = 8;
            self.current = 0;
        }

        self.written_bits += len as usize;
        len
    }

    #[inline(always)]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_in_current(bit as u64, 1);
    }

    pub fn write_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.write_bit(bit);
        }
    }

    /// Writes the lowest `len` bits of `x`, most significant first.
    #[inline(always)]
    pub fn push_bits(&mut self, x: u64, len: u64) -> u64 {
        assert!(len <= 64, "Cannot write {} bits to an integer", len);

        let mut left = len;
        while left != 0 {
            let chunk = left.min(self.free as u64);
            left -= chunk;
            self.write_in_current(x >> left, chunk);
        }

        len
    }

    /// Pads the partial byte with zeros and emits it. Returns the number of
    /// padding bits.
    pub fn flush(&mut self) -> usize {
        if self.free == 8 {
            return 0;
        }

        let padding = self.free;
        self.write(self.current);
        self.written_bits += padding;
        self.free = 8;
        self.current = 0;
        padding
    }
}

/// Reads back what a [`BinaryWriterBuilder`] produced, one bit at a time.
///
/// A new byte is fetched from `is` only once all 8 bits of `current` have
/// been consumed, so several sections can share one stream as long as both
/// sides agree on where they are flushed/aligned.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BinaryReader<'a> {
    is: &'a [u8],
    pub position: usize,
    pub read_bits: usize,
    pub current: u64,
    pub fill: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(input_stream: &'a [u8]) -> Self {
        BinaryReader {
            is: input_stream,
            position: 0,
            read_bits: 0,
            current: 0,
            fill: 0
        }
    }

    #[inline(always)]
    pub fn read(&mut self) -> Result<u64, BitstreamError> {
        if self.position >= self.is.len() {
            return Err(BitstreamError::StreamExhausted { read_bits: self.read_bits });
        }

        self.position += 1;
        Ok(self.is[self.position - 1] as u64)
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<bool, BitstreamError> {
        if self.fill == 0 {
            self.current = self.read()?;
            self.fill = 8;
        }

        self.fill -= 1;
        self.read_bits += 1;
        Ok((self.current >> self.fill) & 1 == 1)
    }

    /// Reads `len` bits as an unsigned integer, most significant first.
    pub fn read_int(&mut self, len: u64) -> Result<u64, BitstreamError> {
        assert!(len <= 64, "Cannot read {} bits into an integer", len);

        let mut x = 0;
        for _ in 0..len {
            x = (x << 1) | self.read_bit()? as u64;
        }

        Ok(x)
    }

    /// Drops the unread bits of the current byte. Returns how many were skipped.
    pub fn align(&mut self) -> usize {
        let skipped = self.fill;
        self.read_bits += skipped;
        self.fill = 0;
        skipped
    }

    /// Reads a whole byte. Only valid after [`align`](Self::align).
    pub fn read_byte(&mut self) -> Result<u8, BitstreamError> {
        debug_assert_eq!(self.fill, 0, "read_byte called with unread bits pending");
        let b = self.read()?;
        self.read_bits += 8;
        Ok(b as u8)
    }

    /// Whole bytes not yet fetched from the input.
    pub fn remaining_bytes(&self) -> usize {
        self.is.len() - self.position
    }
}
