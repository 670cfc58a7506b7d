//! The compression module manages both directions of huffzip.
//!
//! Compression happens in the following steps:
//! - Frequency count: one pass over the input to count every code unit.
//! - Tree build: a huffman tree from those counts.
//! - Code table: the path to every leaf becomes that symbol's code.
//! - Encode: write the frequency table, then a second pass over the input writes the codes.
//!
//! Decompression reads the frequency table, rebuilds the same tree, and walks it bit by bit
//! until it has produced as many symbols as the table counts.
//!

pub mod compress;
pub mod container;
pub mod decompress;

use std::fs;
use std::path::Path;

use crate::error::{Error, IoOp, Result};

/// Refuse to write `dst` when it is the file `src` names, however either path is spelled.
/// `src` must exist. A `dst` that does not exist yet cannot be the same file.
fn check_distinct(src: &Path, dst: &Path) -> Result<()> {
    let src_real = fs::canonicalize(src).map_err(|e| Error::at(IoOp::Open, src, e))?;
    match fs::canonicalize(dst) {
        Ok(dst_real) if dst_real == src_real => Err(Error::SameFile { path: src_real }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::compress::{compress, encode_file, Outcome};
    use super::decompress::{decode_file, decompress};
    use crate::error::{Error, IoOp};
    use crate::huffman_coding::huffman::build;
    use crate::huffman_coding::huffman_codes::codes;
    use crate::tools::freq_count::count_file;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Input, container and output paths in the temp dir, removed on drop.
    struct Scratch {
        input: PathBuf,
        packed: PathBuf,
        output: PathBuf,
    }

    impl Scratch {
        fn new(name: &str, content: &[u8]) -> Self {
            let dir = std::env::temp_dir();
            let stem = format!("huffzip_{}_{}", std::process::id(), name);
            let scratch = Scratch {
                input: dir.join(format!("{}.txt", stem)),
                packed: dir.join(format!("{}.huff", stem)),
                output: dir.join(format!("{}.out", stem)),
            };
            let _ = fs::remove_file(&scratch.packed);
            fs::write(&scratch.input, content).unwrap();
            scratch
        }

        /// Compress then decompress, returning the stats and checking the round trip.
        fn round_trip(&self) -> super::compress::Stats {
            let stats = match compress(&self.input, &self.packed).unwrap() {
                Outcome::Compressed(stats) => stats,
                Outcome::EmptyInput => panic!("unexpected empty input"),
            };
            assert_eq!(
                stats.compressed_bytes,
                fs::metadata(&self.packed).unwrap().len()
            );
            decompress(&self.packed, &self.output).unwrap();
            assert_eq!(
                fs::read(&self.input).unwrap(),
                fs::read(&self.output).unwrap()
            );
            stats
        }

        fn payload(&self) -> Vec<u8> {
            let packed = fs::read(&self.packed).unwrap();
            let entries = u32::from_be_bytes([packed[0], packed[1], packed[2], packed[3]]);
            packed[4 + entries as usize * 6..].to_vec()
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.input);
            let _ = fs::remove_file(&self.packed);
            let _ = fs::remove_file(&self.output);
        }
    }

    #[test]
    fn hello_world_test() {
        let s = Scratch::new("hello", b"hello world");
        let stats = s.round_trip();
        assert_eq!(stats.original_bytes, 11);
        // 8 entries in the header
        assert!(stats.compressed_bytes > 4 + 8 * 6);
    }

    #[test]
    fn repetitive_test() {
        let s = Scratch::new("repetitive", b"aaaaabbbbb");
        s.round_trip();
        assert_eq!(s.payload(), vec![0x07, 0xc0]);
    }

    #[test]
    fn single_test() {
        let s = Scratch::new("single", b"a");
        let stats = s.round_trip();
        assert_eq!(stats.compressed_bytes, 11);
        assert_eq!(s.payload(), vec![0x00]);
    }

    #[test]
    fn empty_test() {
        let s = Scratch::new("empty", b"");
        assert_eq!(compress(&s.input, &s.packed).unwrap(), Outcome::EmptyInput);
        assert!(!s.packed.exists());
    }

    #[test]
    fn large_test() {
        let mut content = vec![b'a'; 1024];
        content.extend(vec![b'b'; 1024]);
        let s = Scratch::new("large", &content);
        s.round_trip();
        assert_eq!(s.payload().len(), 256);
    }

    #[test]
    fn every_byte_test() {
        let content: Vec<u8> = (0..=255).collect();
        let s = Scratch::new("every_byte", &content);
        let stats = s.round_trip();
        assert_eq!(stats.compressed_bytes, 256 + 4 + 256 * 6);
    }

    #[test]
    fn deterministic_test() {
        let s = Scratch::new("deterministic", b"abracadabra, abracadabra!");
        s.round_trip();
        let first = fs::read(&s.packed).unwrap();
        s.round_trip();
        assert_eq!(first, fs::read(&s.packed).unwrap());
    }

    #[test]
    fn output_is_truncated_test() {
        let s = Scratch::new("truncate", b"xyz");
        fs::write(&s.output, vec![b'!'; 100]).unwrap();
        s.round_trip();
        assert_eq!(fs::read(&s.output).unwrap(), b"xyz");
    }

    #[test]
    fn missing_input_test() {
        let s = Scratch::new("missing", b"");
        fs::remove_file(&s.input).unwrap();
        match compress(&s.input, &s.packed) {
            Err(Error::Io { op, path, .. }) => {
                assert_eq!(op, IoOp::Open);
                assert_eq!(path, Some(s.input.clone()));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            decompress(&s.packed, &s.output),
            Err(Error::Io { op: IoOp::Open, .. })
        ));
    }

    #[test]
    fn corrupt_container_test() {
        let s = Scratch::new("corrupt", b"");
        fs::write(&s.packed, [0xff, 0xff, 0xff, 0xfe]).unwrap();
        assert!(matches!(
            decompress(&s.packed, &s.output),
            Err(Error::CorruptStream { .. })
        ));
    }

    fn assert_io(result: crate::error::Result<impl std::fmt::Debug>, op: IoOp, path: &Path) {
        match result {
            Err(Error::Io {
                op: found,
                path: Some(p),
                ..
            }) => {
                assert_eq!(found, op);
                assert_eq!(p, path);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn same_file_test() {
        let s = Scratch::new("same_file", b"hello world");
        assert!(matches!(
            compress(&s.input, &s.input),
            Err(Error::SameFile { .. })
        ));
        assert_eq!(fs::read(&s.input).unwrap(), b"hello world");

        // The same file spelled differently.
        let dir = s.input.parent().unwrap();
        let name = s.input.file_name().unwrap();
        let other = dir.join(".").join(name);
        assert!(matches!(
            compress(&s.input, &other),
            Err(Error::SameFile { .. })
        ));
        assert_eq!(fs::read(&s.input).unwrap(), b"hello world");

        s.round_trip();
        let packed = fs::read(&s.packed).unwrap();
        assert!(matches!(
            decompress(&s.packed, &s.packed),
            Err(Error::SameFile { .. })
        ));
        assert_eq!(fs::read(&s.packed).unwrap(), packed);
    }

    #[cfg(unix)]
    #[test]
    fn read_failure_names_input_test() {
        // A directory opens fine on unix but cannot be read.
        let s = Scratch::new("read_failure", b"hello world");
        let freqs = count_file(&s.input).unwrap();
        let table = codes(&build(&freqs).unwrap()).unwrap();
        let dir = std::env::temp_dir().join(format!("huffzip_{}_dir", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        assert_io(encode_file(&dir, &s.packed, &freqs, &table), IoOp::Read, &dir);
        assert_io(decode_file(&dir, &s.output), IoOp::Read, &dir);
        let _ = fs::remove_dir(&dir);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_failure_names_output_test() {
        // Every write to /dev/full fails with "no space left on device".
        let full = Path::new("/dev/full");
        let s = Scratch::new("write_failure", b"hello world");
        let freqs = count_file(&s.input).unwrap();
        let table = codes(&build(&freqs).unwrap()).unwrap();
        assert_io(encode_file(&s.input, full, &freqs, &table), IoOp::Write, full);
        s.round_trip();
        assert_io(decode_file(&s.packed, full), IoOp::Write, full);
    }
}
