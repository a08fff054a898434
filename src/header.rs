//! Artifact header
//!
//! Layout, all integers little-endian:
//! `[version:u8][create_time:i64][content_bit_len:i64][code_table_len:i16][code_table]`
//! followed by the packed payload. The code table is a JSON object mapping each
//! bitstring to its byte value.

use crate::error::{CodecError, Result};
use std::collections::BTreeMap;

pub const FORMAT_VERSION: u8 = 1;

/// Size of the fixed fields preceding the code table
pub const FIXED_HEADER_LEN: usize = 19;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u8,
    /// Unix seconds
    pub create_time: i64,
    /// Exact number of meaningful payload bits
    pub content_bit_len: i64,
    /// Byte length of the serialized code table
    pub code_table_len: i16,
    pub codes: BTreeMap<String, u8>,
}

impl FileHeader {
    pub fn new(codes: BTreeMap<String, u8>, content_bit_len: u64, create_time: i64) -> Result<Self> {
        let content_bit_len = i64::try_from(content_bit_len).map_err(|_| {
            CodecError::MalformedHeader(format!("bit length {} overflows i64", content_bit_len))
        })?;
        let table_len = serialize_table(&codes)?.len();
        let code_table_len =
            i16::try_from(table_len).map_err(|_| CodecError::TableTooLarge(table_len))?;
        Ok(Self {
            version: FORMAT_VERSION,
            create_time,
            content_bit_len,
            code_table_len,
            codes,
        })
    }

    /// Total header size, fixed fields plus table
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + self.code_table_len as usize
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let table = serialize_table(&self.codes)?;
        let table_len = i16::try_from(table.len()).map_err(|_| CodecError::TableTooLarge(table.len()))?;

        let mut output = Vec::with_capacity(FIXED_HEADER_LEN + table.len());
        output.push(self.version);
        output.extend_from_slice(&self.create_time.to_le_bytes());
        output.extend_from_slice(&self.content_bit_len.to_le_bytes());
        output.extend_from_slice(&table_len.to_le_bytes());
        output.extend_from_slice(&table);
        Ok(output)
    }

    /// Parse the header at the start of `data`, returning it with the remaining payload bytes.
    pub fn parse(data: &[u8]) -> Result<(FileHeader, &[u8])> {
        if data.len() < FIXED_HEADER_LEN {
            return Err(CodecError::MalformedHeader(format!(
                "artifact is {} bytes, fixed header needs {}",
                data.len(),
                FIXED_HEADER_LEN
            )));
        }

        let version = data[0];
        if version != FORMAT_VERSION {
            return Err(CodecError::MalformedHeader(format!(
                "unsupported version {}",
                version
            )));
        }
        let create_time = i64::from_le_bytes(le_array(&data[1..9]));
        let content_bit_len = i64::from_le_bytes(le_array(&data[9..17]));
        let code_table_len = i16::from_le_bytes(le_array(&data[17..19]));

        if content_bit_len < 0 {
            return Err(CodecError::MalformedHeader(format!(
                "negative content bit length {}",
                content_bit_len
            )));
        }
        if code_table_len < 0 {
            return Err(CodecError::MalformedHeader(format!(
                "negative code table length {}",
                code_table_len
            )));
        }
        let table_end = FIXED_HEADER_LEN + code_table_len as usize;
        if table_end > data.len() {
            return Err(CodecError::MalformedHeader(format!(
                "code table of {} bytes overruns artifact of {} bytes",
                code_table_len,
                data.len()
            )));
        }

        let codes: BTreeMap<String, u8> = serde_json::from_slice(&data[FIXED_HEADER_LEN..table_end])
            .map_err(|e| CodecError::MalformedTable(e.to_string()))?;

        Ok((
            FileHeader {
                version,
                create_time,
                content_bit_len,
                code_table_len,
                codes,
            },
            &data[table_end..],
        ))
    }
}

fn serialize_table(codes: &BTreeMap<String, u8>) -> Result<Vec<u8>> {
    serde_json::to_vec(codes).map_err(|e| CodecError::Serialization(e.to_string()))
}

fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
