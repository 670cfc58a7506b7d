//! The huffman module builds the tree and the codes for huffzip.
//!
//! The tree is built from the frequency table alone, and ties between equal weights are
//! broken in a fixed order. That is what lets the decompressor, which only sees the
//! frequency table, rebuild exactly the tree the compressor used.
//!

pub mod huffman;
pub mod huffman_codes;
