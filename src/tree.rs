//! Huffman tree construction
//!
//! Nodes are merged lowest weight first. Equal weights are broken by a fixed
//! `order` key so the same frequencies always give the same tree: leaves use
//! their byte value, merged nodes use `256 + merge index`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        byte: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        zero: Box<Node>,
        one: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest `(weight, order)` first.
#[derive(Debug)]
struct HeapEntry {
    weight: u64,
    order: u32,
    node: Node,
}

impl Eq for HeapEntry {}
impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: Node,
}

impl HuffmanTree {
    /// Build the tree for a frequency map. Returns `None` when the map is empty.
    ///
    /// A single distinct byte yields a tree whose root is a lone leaf.
    pub fn build(freqs: &BTreeMap<u8, u64>) -> Option<HuffmanTree> {
        let mut heap: BinaryHeap<HeapEntry> = freqs
            .iter()
            .map(|(&byte, &weight)| HeapEntry {
                weight,
                order: byte as u32,
                node: Node::Leaf { byte, weight },
            })
            .collect();

        let mut next_order = 256u32;
        loop {
            let zero = heap.pop()?;
            let one = match heap.pop() {
                Some(one) => one,
                None => return Some(HuffmanTree { root: zero.node }),
            };
            let weight = zero.weight + one.weight;
            heap.push(HeapEntry {
                weight,
                order: next_order,
                node: Node::Internal {
                    weight,
                    zero: Box::new(zero.node),
                    one: Box::new(one.node),
                },
            });
            next_order += 1;
        }
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal { zero, one, .. } => count(zero) + count(one),
            }
        }
        count(&self.root)
    }

    /// Length of the longest root-to-leaf path, 0 for a lone leaf.
    pub fn depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Internal { zero, one, .. } => 1 + depth(zero).max(depth(one)),
            }
        }
        depth(&self.root)
    }
}
