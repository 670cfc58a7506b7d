//! The container header: the frequency table that precedes the payload.
//!
//! ```text
//! offset  size  field
//!   0      4    entry count          (i32, big-endian)
//!   4      6*n  entries, each { symbol: u16 BE ; count: i32 BE }
//!   .      .    payload              (MSB first, last byte zero padded)
//! ```
//!
//! Entries are written in ascending symbol order. The reader accepts any order.

use std::io::Read;

use log::debug;

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::{Error, Result};
use crate::tools::freq_count::{FrequencyMap, Symbol};

/// Bytes taken by the entry count.
pub const COUNT_SIZE: usize = 4;
/// Bytes taken by each table entry.
pub const ENTRY_SIZE: usize = 6;
/// Most entries a valid header can hold (one per 16-bit symbol).
pub const MAX_ENTRIES: i32 = 1 << 16;
/// Largest symbol the decoder can write back, since symbols are bytes widened to 16 bits.
pub const MAX_SYMBOL: Symbol = 0xff;

/// Size in bytes of the header for a map with `entries` entries.
pub fn header_size(entries: usize) -> usize {
    COUNT_SIZE + entries * ENTRY_SIZE
}

/// Put the frequency table on the stream.
pub fn write_header(bw: &mut BitPacker, freqs: &FrequencyMap) -> Result<()> {
    let entries = freqs.entries();
    bw.out32(entries.len() as u32);
    for (symbol, count) in entries {
        if count > i32::MAX as u64 {
            return Err(Error::CountOverflow { symbol, count });
        }
        bw.out16(symbol);
        bw.out32(count as u32);
    }
    debug!(
        "Wrote header with {} entries, {} bytes.",
        freqs.len(),
        header_size(freqs.len())
    );
    Ok(())
}

fn read_i32<R: Read>(br: &mut BitReader<R>, what: &'static str) -> Result<i32> {
    match br.bint(32).map_err(Error::read)? {
        Some(v) => Ok(v as i32),
        None => Err(Error::TruncatedStream { what }),
    }
}

/// Read the frequency table from the front of the stream, leaving the reader at the first
/// payload bit.
pub fn read_header<R: Read>(br: &mut BitReader<R>) -> Result<FrequencyMap> {
    let size = read_i32(br, "header entry count")?;
    if size <= 0 {
        return Err(Error::corrupt(format!("entry count {} is not positive", size)));
    }
    if size > MAX_ENTRIES {
        return Err(Error::corrupt(format!(
            "entry count {} exceeds {}",
            size, MAX_ENTRIES
        )));
    }

    let mut freqs = FrequencyMap::new();
    for _ in 0..size {
        let symbol = match br.bint(16).map_err(Error::read)? {
            Some(s) => s as Symbol,
            None => return Err(Error::TruncatedStream { what: "header entry" }),
        };
        let count = read_i32(br, "header entry")?;
        if count <= 0 {
            return Err(Error::corrupt(format!(
                "symbol {:#06x} has count {}",
                symbol, count
            )));
        }
        if symbol > MAX_SYMBOL {
            return Err(Error::corrupt(format!(
                "symbol {:#06x} is outside the byte alphabet",
                symbol
            )));
        }
        if freqs.insert(symbol, count as u64).is_some() {
            return Err(Error::corrupt(format!(
                "symbol {:#06x} appears twice in the header",
                symbol
            )));
        }
    }
    debug!(
        "Read header with {} entries, {} symbols to decode.",
        freqs.len(),
        freqs.total()
    );
    Ok(freqs)
}
