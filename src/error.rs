//! Error types for hfm

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("malformed code table: {0}")]
    MalformedTable(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("serialized code table is {0} bytes, more than the header can describe")]
    TableTooLarge(usize),

    #[error("input too large: limit {limit} bytes, got {actual}")]
    InputTooLarge { limit: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
