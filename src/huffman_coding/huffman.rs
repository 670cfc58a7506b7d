use log::{debug, trace};

use crate::error::{Error, Result};
use crate::tools::freq_count::{FrequencyMap, Symbol};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A huffman tree node. Children are owned by their parent.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    /// `right` is only `None` in the single symbol tree, where the lone leaf hangs to the left.
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Option<Box<Node>>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    /// Sum of the weights of every internal node in the tree. For a huffman tree this equals
    /// the encoded length in bits of the source it was built from.
    pub fn internal_weight(&self) -> u64 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal {
                weight,
                left,
                right,
            } => {
                weight
                    + left.internal_weight()
                    + right.as_ref().map_or(0, |r| r.internal_weight())
            }
        }
    }

    /// Every (symbol, depth) pair, left to right.
    pub fn leaves(&self) -> Vec<(Symbol, usize)> {
        let mut leaves = vec![];
        return_leaves(self, 0, &mut leaves);
        leaves
    }
}

/// Recursively walk the tree and return in "leaves" how far (deep) from the root node each leaf is.
fn return_leaves(node: &Node, depth: usize, leaves: &mut Vec<(Symbol, usize)>) {
    match node {
        Node::Internal { left, right, .. } => {
            return_leaves(left, depth + 1, leaves);
            if let Some(right) = right {
                return_leaves(right, depth + 1, leaves);
            }
        }
        Node::Leaf { symbol, .. } => leaves.push((*symbol, depth)),
    }
}

/// A node waiting in the build queue. `seq` is its insertion number.
#[derive(Debug)]
struct Pending {
    weight: u64,
    seq: u64,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl Eq for Pending {}

impl Ord for Pending {
    /// Sort by decreasing weight, then decreasing insertion number, so the max-heap pops the
    /// lightest node and, among equal weights, the one inserted first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build a huffman tree from a frequency map.
///
/// Leaves enter the queue in ascending symbol order. Each step removes the two lightest
/// nodes `a` then `b` and queues `Internal(a + b, left = a, right = b)`. Equal weights leave
/// the queue in the order they entered it, so the same map always gives the same tree,
/// whatever order its entries arrived in.
///
/// A single symbol gets an artificial parent with no right child, giving it the code `0`.
pub fn build(freqs: &FrequencyMap) -> Result<Node> {
    let entries = freqs.entries();
    if entries.is_empty() {
        return Err(Error::EmptyInput);
    }

    if let &[(symbol, weight)] = entries.as_slice() {
        debug!("Single symbol {:#06x}, building degenerate tree.", symbol);
        return Ok(Node::Internal {
            weight,
            left: Box::new(Node::Leaf { symbol, weight }),
            right: None,
        });
    }

    let mut seq = 0;
    let mut queue: BinaryHeap<Pending> = BinaryHeap::with_capacity(entries.len());
    for (symbol, weight) in entries {
        queue.push(Pending {
            weight,
            seq,
            node: Node::Leaf { symbol, weight },
        });
        seq += 1;
    }

    // Pare the queue down to the root.
    while queue.len() > 1 {
        let (a, b) = match (queue.pop(), queue.pop()) {
            (Some(a), Some(b)) => (a, b),
            _ => break,
        };
        let weight = a.weight + b.weight;
        trace!(
            "Joining #{} ({}) and #{} ({}) as #{}",
            a.seq,
            a.weight,
            b.seq,
            b.weight,
            seq
        );
        queue.push(Pending {
            weight,
            seq,
            node: Node::Internal {
                weight,
                left: Box::new(a.node),
                right: Some(Box::new(b.node)),
            },
        });
        seq += 1;
    }

    let root = queue.pop().ok_or(Error::EmptyInput)?.node;
    debug!(
        "Built huffman tree for {} symbols, root weight {}.",
        freqs.len(),
        root.weight()
    );
    Ok(root)
}

#[cfg(test)]
mod test {
    use super::*;

    fn map(pairs: &[(Symbol, u64)]) -> FrequencyMap {
        pairs.iter().copied().collect()
    }

    fn leaf(symbol: Symbol, weight: u64) -> Box<Node> {
        Box::new(Node::Leaf { symbol, weight })
    }

    #[test]
    fn empty_map_test() {
        assert!(matches!(build(&FrequencyMap::new()), Err(Error::EmptyInput)));
    }

    #[test]
    fn single_symbol_test() {
        let root = build(&map(&[(b'a' as Symbol, 5)])).unwrap();
        assert_eq!(
            root,
            Node::Internal {
                weight: 5,
                left: leaf(97, 5),
                right: None
            }
        );
        assert_eq!(root.leaves(), vec![(97, 1)]);
    }

    #[test]
    fn two_symbol_test() {
        let root = build(&map(&[(b'b' as Symbol, 5), (b'a' as Symbol, 5)])).unwrap();
        assert_eq!(
            root,
            Node::Internal {
                weight: 10,
                left: leaf(97, 5),
                right: Some(leaf(98, 5)),
            }
        );
    }

    #[test]
    fn lighter_goes_left_test() {
        let root = build(&map(&[(1, 9), (2, 1)])).unwrap();
        assert_eq!(root.leaves(), vec![(2, 1), (1, 1)]);
    }

    #[test]
    fn fifo_tie_break_test() {
        // All weights equal: leaves pair off in symbol order, and the two internal nodes
        // pair in the order they were made.
        let root = build(&map(&[(4, 1), (3, 1), (2, 1), (1, 1)])).unwrap();
        assert_eq!(
            root,
            Node::Internal {
                weight: 4,
                left: Box::new(Node::Internal {
                    weight: 2,
                    left: leaf(1, 1),
                    right: Some(leaf(2, 1)),
                }),
                right: Some(Box::new(Node::Internal {
                    weight: 2,
                    left: leaf(3, 1),
                    right: Some(leaf(4, 1)),
                })),
            }
        );
    }

    #[test]
    fn leaf_before_internal_on_tie_test() {
        // After joining 1 and 2 (weight 2), symbol 3 (weight 2) was queued earlier and must
        // be taken first, landing on the left.
        let root = build(&map(&[(1, 1), (2, 1), (3, 2)])).unwrap();
        assert_eq!(root.leaves(), vec![(3, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn entry_order_does_not_matter_test() {
        let a = map(&[(10, 3), (20, 3), (30, 1), (40, 7), (50, 3)]);
        let mut b = FrequencyMap::new();
        for (s, c) in [(50, 3), (40, 7), (30, 1), (20, 3), (10, 3)] {
            b.insert(s, c);
        }
        assert_eq!(build(&a).unwrap(), build(&b).unwrap());
    }

    #[test]
    fn weights_add_up_test() {
        fn check(node: &Node) {
            if let Node::Internal {
                weight,
                left,
                right,
            } = node
            {
                let right_weight = right.as_ref().map_or(0, |r| r.weight());
                assert_eq!(*weight, left.weight() + right_weight);
                check(left);
                if let Some(r) = right {
                    check(r);
                }
            }
        }
        let freqs = map(&[(1, 45), (2, 13), (3, 12), (4, 16), (5, 9), (6, 5)]);
        let root = build(&freqs).unwrap();
        check(&root);
        assert_eq!(root.weight(), 100);
        assert_eq!(root.leaves().len(), 6);
    }

    #[test]
    fn internal_weight_test() {
        // Textbook example: optimal cost is 224.
        let freqs = map(&[(1, 45), (2, 13), (3, 12), (4, 16), (5, 9), (6, 5)]);
        let root = build(&freqs).unwrap();
        assert_eq!(root.internal_weight(), 224);
    }

    #[test]
    fn balanced_test() {
        let freqs: FrequencyMap = (0..256).map(|s| (s as Symbol, 1)).collect();
        let root = build(&freqs).unwrap();
        assert!(root.leaves().iter().all(|&(_, depth)| depth == 8));
    }
}
