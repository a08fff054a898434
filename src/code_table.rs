//! Prefix code tables derived from a Huffman tree
//!
//! `CodeTable` maps bytes to bit codes for encoding. Its inverse, keyed by the
//! textual bitstring (`"0110"`), is what the header persists; `DecodeTable` is
//! that inverse parsed back and validated for decoding.

use crate::error::{CodecError, Result};
use crate::tree::{HuffmanTree, Node};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Vec<bool>>,
}

fn build_codes(node: &Node, prefix: &mut Vec<bool>, codes: &mut BTreeMap<u8, Vec<bool>>) {
    match node {
        Node::Leaf { byte, .. } => {
            // a lone leaf has an empty path, which could not be told apart in the bitstream
            let code = if prefix.is_empty() {
                vec![false]
            } else {
                prefix.clone()
            };
            codes.insert(*byte, code);
        }
        Node::Internal { zero, one, .. } => {
            prefix.push(false);
            build_codes(zero, prefix, codes);
            prefix.pop();
            prefix.push(true);
            build_codes(one, prefix, codes);
            prefix.pop();
        }
    }
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        build_codes(&tree.root, &mut Vec::new(), &mut codes);
        Self { codes }
    }

    pub fn code(&self, byte: u8) -> Option<&[bool]> {
        self.codes.get(&byte).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> {
        self.codes.iter().map(|(&b, c)| (b, c.as_slice()))
    }

    /// Number of payload bits needed to encode a buffer with these frequencies
    pub fn encoded_bit_len(&self, freqs: &BTreeMap<u8, u64>) -> u64 {
        freqs
            .iter()
            .filter_map(|(b, &f)| self.codes.get(b).map(|c| c.len() as u64 * f))
            .sum()
    }

    /// Bitstring-to-byte form stored in the artifact header
    pub fn inverse(&self) -> BTreeMap<String, u8> {
        self.codes
            .iter()
            .map(|(&byte, code)| (bits_to_string(code), byte))
            .collect()
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut strings: Vec<String> = self.codes.values().map(|c| bits_to_string(c)).collect();
        strings.sort();
        check_prefix_free(&strings).is_ok()
    }
}

pub fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

fn parse_bitstring(s: &str) -> Result<Vec<bool>> {
    if s.is_empty() {
        return Err(CodecError::MalformedTable("empty code".into()));
    }
    s.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(CodecError::MalformedTable(format!(
                "invalid character {:?} in code {:?}",
                other, s
            ))),
        })
        .collect()
}

/// `sorted` must be in lexicographic order; a prefix then sorts directly before its extension.
fn check_prefix_free<S: AsRef<str>>(sorted: &[S]) -> Result<()> {
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0].as_ref(), pair[1].as_ref());
        if b.starts_with(a) {
            return Err(CodecError::MalformedTable(format!(
                "code {:?} is a prefix of {:?}",
                a, b
            )));
        }
    }
    Ok(())
}

/// Inverse code table rebuilt from an artifact header
#[derive(Debug, Clone, Default)]
pub struct DecodeTable {
    symbols: HashMap<Vec<bool>, u8>,
    max_code_len: usize,
}

impl DecodeTable {
    pub fn from_inverse(inverse: &BTreeMap<String, u8>) -> Result<Self> {
        let keys: Vec<&str> = inverse.keys().map(String::as_str).collect();
        check_prefix_free(&keys)?;

        let mut symbols = HashMap::with_capacity(inverse.len());
        let mut max_code_len = 0;
        for (code, &byte) in inverse {
            let bits = parse_bitstring(code)?;
            max_code_len = max_code_len.max(bits.len());
            symbols.insert(bits, byte);
        }
        Ok(Self {
            symbols,
            max_code_len,
        })
    }

    pub fn lookup(&self, code: &[bool]) -> Option<u8> {
        self.symbols.get(code).copied()
    }

    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
