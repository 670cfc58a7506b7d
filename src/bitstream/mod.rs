//! The bitstream module forms the I/O subsystem for huffzip.
//!
//! Bits are packed most significant bit first. The last byte of a stream is padded with
//! zeros in its low bits, so a reader has to know from elsewhere how many bits are real.
//! For huffzip that knowledge comes from the symbol counts in the container header.
//!
pub mod bitpacker;
pub mod bitreader;
