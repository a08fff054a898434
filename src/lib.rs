//! hfm: byte-oriented Huffman codec.
//!
//! An artifact is a self-describing header (version, creation time, payload
//! bit length and the code table) followed by the packed bitstream:
//! - `frequency` counts byte occurrences
//! - `tree` merges the two lightest nodes until one root remains
//! - `code_table` assigns each leaf its root path as a prefix code
//! - `bits` packs and unpacks the bitstream MSB first
//! - `header` reads and writes the artifact header
//!
//! `Codec` composes them; `fs` wraps it for whole-file compression.

pub mod bits;
pub mod code_table;
pub mod config;
pub mod error;
pub mod frequency;
pub mod fs;
pub mod header;
pub mod tree;

use crate::code_table::{CodeTable, DecodeTable};
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::header::FileHeader;
use crate::tree::HuffmanTree;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace, warn};

/// Statistics about one encode call
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    pub header_size: usize,
    pub content_bit_len: u64,
    pub distinct_symbols: usize,
    pub ratio: f64,
    pub entropy_bits: f64,
}

/// The codec engine
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `data` into an artifact stamped with the current time.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.encode_at(data, unix_now())
    }

    /// Encode `data` with an explicit creation time, giving byte-identical
    /// artifacts for identical inputs.
    pub fn encode_at(&self, data: &[u8], create_time: i64) -> Result<Vec<u8>> {
        self.encode_inner(data, create_time).map(|(artifact, _)| artifact)
    }

    pub fn encode_with_stats(&self, data: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
        self.encode_inner(data, unix_now())
    }

    fn encode_inner(&self, data: &[u8], create_time: i64) -> Result<(Vec<u8>, CompressionStats)> {
        self.check_size(data.len())?;

        let freqs = frequency::count_frequencies(data);
        let table = match HuffmanTree::build(&freqs) {
            Some(tree) => {
                debug!(leaves = tree.leaf_count(), depth = tree.depth(), "built huffman tree");
                CodeTable::from_tree(&tree)
            }
            None => CodeTable::default(),
        };
        for (byte, code) in table.iter() {
            trace!(byte, code = %code_table::bits_to_string(code), "code");
        }

        let packed = bits::pack(&table, data)?;
        let header = FileHeader::new(table.inverse(), packed.bit_len, create_time)?;
        let mut artifact = header.to_bytes()?;
        let header_size = artifact.len();
        artifact.extend_from_slice(&packed.bytes);

        debug!(
            input = data.len(),
            symbols = table.len(),
            bits = packed.bit_len,
            artifact = artifact.len(),
            "encoded"
        );

        if self.config.verify_after_encode {
            let decoded = self.decode(&artifact)?;
            if decoded != data {
                return Err(CodecError::MalformedPayload(
                    "artifact does not decode back to its input".into(),
                ));
            }
        }

        let stats = CompressionStats {
            original_size: data.len(),
            compressed_size: artifact.len(),
            header_size,
            content_bit_len: packed.bit_len,
            distinct_symbols: table.len(),
            ratio: if data.is_empty() {
                1.0
            } else {
                artifact.len() as f64 / data.len() as f64
            },
            entropy_bits: frequency::entropy_bits(data),
        };
        Ok((artifact, stats))
    }

    /// Decode an artifact back into the original bytes.
    pub fn decode(&self, artifact: &[u8]) -> Result<Vec<u8>> {
        let result = self.decode_inner(artifact);
        if let Err(ref e) = result {
            warn!(error = %e, len = artifact.len(), "rejected artifact");
        }
        result
    }

    fn decode_inner(&self, artifact: &[u8]) -> Result<Vec<u8>> {
        let (header, payload) = FileHeader::parse(artifact)?;
        let table = DecodeTable::from_inverse(&header.codes)?;
        let output = bits::unpack(
            payload,
            header.content_bit_len as u64,
            &table,
            self.config.max_input_size,
        )?;
        debug!(
            artifact = artifact.len(),
            symbols = table.len(),
            bits = header.content_bit_len,
            output = output.len(),
            "decoded"
        );
        Ok(output)
    }

    /// Parse only the header of an artifact.
    pub fn inspect(&self, artifact: &[u8]) -> Result<FileHeader> {
        FileHeader::parse(artifact).map(|(header, _)| header)
    }

    fn check_size(&self, len: usize) -> Result<()> {
        if len > self.config.max_input_size {
            return Err(CodecError::InputTooLarge {
                limit: self.config.max_input_size,
                actual: len,
            });
        }
        Ok(())
    }
}

/// Encode with the default configuration
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    Codec::default().encode(data)
}

/// Decode with the default configuration
pub fn decode(artifact: &[u8]) -> Result<Vec<u8>> {
    Codec::default().decode(artifact)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
