//! Huffman file compressor.
//!
//! Version 0.1.0
//!
//! Compresses a file by counting how often each code unit occurs, building a huffman tree
//! from those counts, and replacing every code unit with its code. The container holds the
//! frequency table followed by the packed codes, which is all the decompressor needs to
//! rebuild the same tree and reverse the process.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffzip -z test.txt`
//!
//! This will compress the file and create the file test.txt.huff.
//! The original file is kept.
//!
//! From Rust:
//!
//! ```no_run
//! use std::path::Path;
//! use huffzip::{compress, decompress, Outcome};
//!
//! match compress(Path::new("input.txt"), Path::new("input.txt.huff"))? {
//!     Outcome::Compressed(stats) => println!("saved {:.1}%", stats.ratio()),
//!     Outcome::EmptyInput => println!("nothing to compress"),
//! }
//! decompress(Path::new("input.txt.huff"), Path::new("copy.txt"))?;
//! # Ok::<(), huffzip::Error>(())
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, compress_bytes, Outcome, Stats};
pub use compression::decompress::{decompress, decompress_bytes};
pub use error::{Error, Result};
