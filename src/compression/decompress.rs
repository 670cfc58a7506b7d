use log::{debug, info, warn};

use crate::bitstream::bitreader::BitReader;
use crate::error::{Error, IoOp, Result};
use crate::huffman_coding::huffman::{build, Node};

use super::check_distinct;
use super::container::read_header;

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

/// Decoded output is handed to the writer in chunks of this size.
const WRITE_CHUNK: usize = 64 * 1024;

/// What decode() found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Symbols written, always the sum of the header counts.
    pub symbols: u64,
    /// Zero bits that filled out the final payload byte (0-7).
    pub padding_bits: u8,
}

/// Read a container from `source` and write the original data to `sink`.
///
/// Decoding stops once the number of symbols the header promises has been written. The
/// rest of the last byte is padding, and never gets decoded.
pub fn decode<R: Read, W: Write>(source: R, sink: &mut W) -> Result<Decoded> {
    let mut br = BitReader::new(source);
    let freqs = read_header(&mut br)?;
    let total = freqs.total();
    let root = build(&freqs)?;

    let mut out: Vec<u8> = Vec::with_capacity(WRITE_CHUNK);
    let mut decoded = 0_u64;
    let mut node = &root;
    while decoded < total {
        let bit = match br.bit().map_err(Error::read)? {
            Some(bit) => bit,
            None => {
                return Err(Error::TruncatedStream {
                    what: "payload",
                })
            }
        };
        node = match (node, bit) {
            (Node::Internal { left, .. }, 0) => &**left,
            (Node::Internal { right: Some(right), .. }, _) => &**right,
            (Node::Internal { right: None, .. }, _) => {
                return Err(Error::corrupt(format!(
                    "bit 1 at {} leads nowhere in a single symbol tree",
                    br.loc()
                )))
            }
            // The cursor is reset to the root after every leaf.
            (Node::Leaf { .. }, _) => return Err(Error::corrupt("decoder left the tree")),
        };
        if let Node::Leaf { symbol, .. } = node {
            // read_header() only admits symbols that fit a byte.
            out.push(*symbol as u8);
            decoded += 1;
            node = &root;
            if out.len() == WRITE_CHUNK {
                sink.write_all(&out).map_err(Error::write)?;
                out.clear();
            }
        }
    }
    sink.write_all(&out).map_err(Error::write)?;
    sink.flush().map_err(Error::write)?;

    let padding_bits = br.align();
    if !br.at_end().map_err(Error::read)? {
        warn!(
            "Ignoring data after the end of the payload at byte {}.",
            br.position() / 8
        );
    }
    debug!(
        "Decoded {} symbols with {} padding bits.",
        decoded, padding_bits
    );
    Ok(Decoded {
        symbols: decoded,
        padding_bits,
    })
}

/// Decode the container at `src` into `dst`, truncating any existing file.
/// `dst` may not be `src`.
pub fn decode_file(src: &Path, dst: &Path) -> Result<Decoded> {
    check_distinct(src, dst)?;
    let fin = File::open(src).map_err(|e| Error::at(IoOp::Open, src, e))?;
    let mut f_out = File::create(dst).map_err(|e| Error::at(IoOp::Create, dst, e))?;
    decode(fin, &mut f_out).map_err(|e| e.locate(src, dst))
}

/// Decompress the container `src` into `dst`.
///
/// If decoding fails part way, whatever was written to `dst` is left in place.
pub fn decompress(src: &Path, dst: &Path) -> Result<()> {
    info!("Decompressing {} to {}.", src.display(), dst.display());
    let decoded = decode_file(src, dst)?;
    info!("Wrote {} bytes to {}.", decoded.symbols, dst.display());
    Ok(())
}

/// Decompress a container held in memory.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    decode(data, &mut out)?;
    Ok(out)
}
