//! Configuration for hfm

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest buffer accepted by `encode` or produced by `decode`.
    pub max_input_size: usize,
    /// Decode every fresh artifact and compare it against the input.
    pub verify_after_encode: bool,
    /// Write destination files through a temporary file that is renamed into place.
    pub atomic_write: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_size: 1024 * 1024 * 1024, // 1 GiB
            verify_after_encode: false,
            atomic_write: true,
        }
    }
}
