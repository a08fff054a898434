//! Bit packing and unpacking of the payload
//!
//! Bits are packed most-significant-bit first: logical bit `i` lands in byte
//! `i / 8` at position `7 - i % 8`. The last byte is zero padded.

use crate::code_table::{CodeTable, DecodeTable};
use crate::error::{CodecError, Result};
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

/// Packed payload together with its exact number of meaningful bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    pub bytes: Vec<u8>,
    pub bit_len: u64,
}

/// Bytes needed to hold `bit_len` bits
pub fn packed_len(bit_len: u64) -> u64 {
    (bit_len + 7) / 8
}

/// Concatenate the code of every byte of `data`, in order, and pack the result.
pub fn pack(table: &CodeTable, data: &[u8]) -> Result<PackedBits> {
    let mut writer = BitWriter::endian(Vec::new(), BigEndian);
    let mut bit_len = 0u64;
    for &b in data {
        let code = table.code(b).ok_or_else(|| {
            CodecError::MalformedTable(format!("byte {:#04x} has no code", b))
        })?;
        for &bit in code {
            writer.write_bit(bit)?;
        }
        bit_len += code.len() as u64;
    }
    writer.byte_align()?;
    Ok(PackedBits {
        bytes: writer.into_writer(),
        bit_len,
    })
}

/// Decode exactly `bit_len` bits of `payload`, stopping with an error once
/// more than `limit` bytes would be produced.
pub fn unpack(payload: &[u8], bit_len: u64, table: &DecodeTable, limit: usize) -> Result<Vec<u8>> {
    let expected = packed_len(bit_len);
    let actual = payload.len() as u64;
    if actual < expected {
        return Err(CodecError::MalformedPayload(format!(
            "truncated payload: {} bits need {} bytes, got {}",
            bit_len, expected, actual
        )));
    }
    if actual > expected {
        return Err(CodecError::MalformedPayload(format!(
            "{} trailing bytes after payload",
            actual - expected
        )));
    }

    let mut reader = BitReader::endian(payload, BigEndian);
    let mut output = Vec::with_capacity(payload.len());
    let mut prefix = Vec::with_capacity(table.max_code_len());

    for _ in 0..bit_len {
        prefix.push(reader.read_bit()?);
        if let Some(sym) = table.lookup(&prefix) {
            if output.len() == limit {
                return Err(CodecError::InputTooLarge {
                    limit,
                    actual: output.len() + 1,
                });
            }
            output.push(sym);
            prefix.clear();
        } else if prefix.len() >= table.max_code_len() {
            return Err(CodecError::MalformedPayload(format!(
                "bit sequence {} matches no code",
                crate::code_table::bits_to_string(&prefix)
            )));
        }
    }

    if !prefix.is_empty() {
        return Err(CodecError::MalformedPayload(format!(
            "{} leftover bits do not form a complete code",
            prefix.len()
        )));
    }
    Ok(output)
}
