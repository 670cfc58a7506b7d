//! Turns a huffman tree into the code table used by the encoder.
//!
//! Going left appends a `0`, going right appends a `1`. The lone leaf of a single symbol
//! tree sits to the left of its parent, so it comes out as `0` without special handling.

use std::fmt::{Display, Formatter};

use log::trace;
use rustc_hash::FxHashMap;

use super::huffman::Node;
use crate::error::{Error, Result};
use crate::tools::freq_count::Symbol;

/// Longest code the table can hold.
pub const MAX_CODE_LEN: usize = 64;

/// A code of `len` bits, stored in the low bits of `bits`. The first bit sent is bit `len - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    /// Is `self` a prefix of `other`? (A code is a prefix of itself.)
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", (self.bits >> i) & 1)?;
        }
        Ok(())
    }
}

pub type CodeTable = FxHashMap<Symbol, Code>;

/// Walk the tree and return the code for every leaf.
pub fn codes(root: &Node) -> Result<CodeTable> {
    let mut table = CodeTable::default();
    match root {
        // A bare leaf never comes out of build(), but it still needs a non-empty code.
        Node::Leaf { symbol, .. } => {
            table.insert(*symbol, Code { bits: 0, len: 1 });
        }
        Node::Internal { .. } => walk(root, 0, 0, &mut table)?,
    }
    Ok(table)
}

fn walk(node: &Node, bits: u64, depth: usize, table: &mut CodeTable) -> Result<()> {
    match node {
        Node::Internal { left, right, .. } => {
            if depth == MAX_CODE_LEN {
                return Err(Error::CodeOverflow { depth: depth + 1 });
            }
            walk(left, bits << 1, depth + 1, table)?;
            if let Some(right) = right {
                walk(right, bits << 1 | 1, depth + 1, table)?;
            }
        }
        Node::Leaf { symbol, .. } => {
            let code = Code {
                bits,
                len: depth as u8,
            };
            trace!("Symbol {:#06x} -> {}", symbol, code);
            table.insert(*symbol, code);
        }
    }
    Ok(())
}
