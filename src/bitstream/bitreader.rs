//! BitReader: reads a packed bitstream, most significant bit of each byte first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!

use std::io::{ErrorKind, Read};

const BUFFER_SIZE: usize = 64 * 1024;

/// Reads a binary huffzip container.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    /// Valid bytes in the buffer.
    filled: usize,
    cursor: usize,
    bit_index: usize,
    /// Bytes fully or partly consumed before the current buffer.
    consumed: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            filled: 0,
            cursor: 0,
            bit_index: 0,
            consumed: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> std::io::Result<bool> {
        // Only try to read more data when the cursor has reached the end of what we hold
        if self.cursor == self.filled {
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            self.consumed += self.filled as u64;
            self.filled = size;
            self.cursor = 0;
            self.bit_index = 0;
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> std::io::Result<Option<u8>> {
        // If bit_index is == 0, check if we have a byte to read.
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Ok(Some(bit))
    }

    /// Return the next n (0-32) bits as an unsigned value, or None if the data ran out first.
    pub fn bint(&mut self, n: usize) -> std::io::Result<Option<u32>> {
        let mut result = 0_u32;
        for _ in 0..n {
            match self.bit()? {
                Some(bit) => result = result << 1 | bit as u32,
                None => return Ok(None),
            }
        }
        Ok(Some(result))
    }

    /// Returns a byte, or None if there is no more data to read.
    pub fn byte(&mut self) -> std::io::Result<Option<u8>> {
        Ok(self.bint(8)?.map(|byte| byte as u8))
    }

    /// Skip to the start of the next byte. Returns the number of bits skipped (0-7).
    pub fn align(&mut self) -> u8 {
        if self.bit_index == 0 {
            return 0;
        }
        let skipped = 8 - self.bit_index;
        self.bit_index = 0;
        self.cursor += 1;
        skipped as u8
    }

    /// True when the reader sits on a byte boundary with no data left.
    pub fn at_end(&mut self) -> std::io::Result<bool> {
        Ok(self.bit_index == 0 && !self.have_data()?)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> u64 {
        (self.consumed + self.cursor as u64) * 8 + self.bit_index as u64
    }

    /// Debugging function. Report current position as bytes.bits.
    pub fn loc(&self) -> String {
        let pos = self.position();
        format!("[{}.{}]", pos / 8, pos % 8)
    }
}
