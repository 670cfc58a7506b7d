use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::bitstream::bitpacker::BitPacker;
use crate::error::{Error, IoOp, Result};
use crate::huffman_coding::huffman::build;
use crate::huffman_coding::huffman_codes::{codes, CodeTable};
use crate::tools::freq_count::{count, count_file, FrequencyMap, Symbol, READ_BUFFER};

use super::check_distinct;
use super::container::write_header;

/// Packed output is handed to the writer whenever the packer holds this much.
const WRITE_CHUNK: usize = 64 * 1024;

/// Sizes reported after compressing a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl Stats {
    /// Space saved as a percentage of the original size. Negative when the container is
    /// larger than the original.
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        (self.original_bytes as f64 - self.compressed_bytes as f64) / self.original_bytes as f64
            * 100.0
    }
}

/// What compress() did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Compressed(Stats),
    /// The source was empty. No container was written.
    EmptyInput,
}

/// Write a container for `source` to `sink`: the header for `freqs`, then every code unit of
/// `source` replaced by its code. Returns the number of bytes written.
///
/// `freqs` must be the counts of `source`. The decoder stops after the number of symbols the
/// header promises, so a source that changed since it was counted is refused.
pub fn encode<R: Read, W: Write>(
    mut source: R,
    sink: &mut W,
    freqs: &FrequencyMap,
    table: &CodeTable,
) -> Result<u64> {
    if freqs.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut bw = BitPacker::new(WRITE_CHUNK + 64);
    write_header(&mut bw, freqs)?;

    // Codes are looked up by byte, so move them into a dense table first.
    let mut dense: Vec<Option<_>> = vec![None; 256];
    for (&symbol, code) in table.iter() {
        if let Some(slot) = dense.get_mut(symbol as usize) {
            *slot = Some(*code);
        }
    }

    let mut buf = vec![0_u8; READ_BUFFER];
    let mut symbols = 0_u64;
    loop {
        let size = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::read(e)),
        };
        for &byte in &buf[..size] {
            match &dense[byte as usize] {
                Some(code) => bw.out_code(code),
                None => {
                    return Err(Error::MissingCode {
                        symbol: byte as Symbol,
                    })
                }
            }
        }
        symbols += size as u64;
        if bw.output.len() >= WRITE_CHUNK {
            bw.drain_to(sink).map_err(Error::write)?;
        }
    }

    if symbols != freqs.total() {
        return Err(Error::InputChanged {
            expected: freqs.total(),
            found: symbols,
        });
    }

    bw.flush();
    bw.drain_to(sink).map_err(Error::write)?;
    sink.flush().map_err(Error::write)?;
    debug!(
        "Encoded {} symbols, {} bytes out, {} bits used in the last byte.",
        symbols,
        bw.bytes_out(),
        bw.last_bits
    );
    Ok(bw.bytes_out())
}

/// Encode the file at `src` into a new container at `dst`, truncating any existing file.
/// `dst` may not be `src`.
pub fn encode_file(
    src: &Path,
    dst: &Path,
    freqs: &FrequencyMap,
    table: &CodeTable,
) -> Result<u64> {
    check_distinct(src, dst)?;
    let fin = File::open(src).map_err(|e| Error::at(IoOp::Open, src, e))?;
    let mut f_out = File::create(dst).map_err(|e| Error::at(IoOp::Create, dst, e))?;
    encode(fin, &mut f_out, freqs, table).map_err(|e| e.locate(src, dst))
}

/// Compress the file `src` into the container `dst`.
///
/// An empty source is not an error: nothing is written and `Outcome::EmptyInput` comes back.
/// If compression fails part way, whatever was written to `dst` is left in place.
pub fn compress(src: &Path, dst: &Path) -> Result<Outcome> {
    info!("Compressing {} to {}.", src.display(), dst.display());
    let freqs = count_file(src)?;
    if freqs.is_empty() {
        info!("{} is empty, no container written.", src.display());
        return Ok(Outcome::EmptyInput);
    }

    let tree = build(&freqs)?;
    let table = codes(&tree)?;
    let compressed_bytes = encode_file(src, dst, &freqs, &table)?;

    let stats = Stats {
        original_bytes: freqs.total(),
        compressed_bytes,
    };
    info!(
        "Compressed {} bytes to {} bytes ({:.2}% saved).",
        stats.original_bytes,
        stats.compressed_bytes,
        stats.ratio()
    );
    Ok(Outcome::Compressed(stats))
}

/// Compress a byte slice in memory. Empty input is `Error::EmptyInput`, since there is no
/// container to return for it.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let freqs = count(data)?;
    let tree = build(&freqs)?;
    let table = codes(&tree)?;
    let mut out = Vec::with_capacity(data.len() / 2 + 16);
    encode(data, &mut out, &freqs, &table)?;
    Ok(out)
}
