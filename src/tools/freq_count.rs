//! Frequency counting for the huffman coder.
//!
//! Symbols are 16-bit code units. The source is read as bytes, each byte widened to one
//! code unit, so the dense counting table only ever needs 256 slots.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use log::debug;
use rustc_hash::FxHashMap;

use crate::error::{Error, IoOp, Result};

/// One code unit of the source stream.
pub type Symbol = u16;

/// Size of the read buffer used when scanning a source.
pub const READ_BUFFER: usize = 64 * 1024;

/// Mapping from symbol to a positive occurrence count. Never holds zero counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: FxHashMap<Symbol, u64>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` occurrences of `symbol`. Adding zero is a no-op, so no zero entry is created.
    pub fn add(&mut self, symbol: Symbol, n: u64) {
        if n > 0 {
            *self.counts.entry(symbol).or_insert(0) += n;
        }
    }

    /// Set the count for `symbol`, returning the previous count if there was one.
    /// A zero count removes the symbol.
    pub fn insert(&mut self, symbol: Symbol, count: u64) -> Option<u64> {
        if count == 0 {
            self.counts.remove(&symbol)
        } else {
            self.counts.insert(symbol, count)
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, which is the number of symbols in the source.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// All entries in ascending symbol order. Header writing and tree building both use
    /// this order, so neither depends on hash iteration order.
    pub fn entries(&self) -> Vec<(Symbol, u64)> {
        let mut entries: Vec<(Symbol, u64)> = self.counts.iter().map(|(&s, &c)| (s, c)).collect();
        entries.sort_unstable_by_key(|&(symbol, _)| symbol);
        entries
    }
}

impl FromIterator<(Symbol, u64)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (Symbol, u64)>>(iter: I) -> Self {
        let mut map = FrequencyMap::new();
        iter.into_iter().for_each(|(symbol, n)| map.add(symbol, n));
        map
    }
}

/// Returns a frequency count of a byte slice as a dense 256 entry table.
pub fn freqs(data: &[u8]) -> Vec<u64> {
    let mut freqs = vec![0_u64; 256];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

/// Count the code units in `source`. Empty input gives an empty map.
pub fn count<R: Read>(mut source: R) -> Result<FrequencyMap> {
    let mut table = vec![0_u64; 256];
    let mut buf = vec![0_u8; READ_BUFFER];
    loop {
        let size = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::read(e)),
        };
        freqs(&buf[..size])
            .iter()
            .zip(table.iter_mut())
            .for_each(|(n, t)| *t += n);
    }

    let map: FrequencyMap = table
        .iter()
        .enumerate()
        .map(|(byte, &n)| (byte as Symbol, n))
        .collect();
    debug!(
        "Counted {} symbols, {} distinct.",
        map.total(),
        map.len()
    );
    Ok(map)
}

/// Count the code units in the file at `path`.
pub fn count_file(path: &Path) -> Result<FrequencyMap> {
    let fin = File::open(path).map_err(|e| Error::at(IoOp::Open, path, e))?;
    count(fin).map_err(|e| e.locate(path, path))
}
