//! Whole-file compression on top of `Codec`

use crate::error::Result;
use crate::{Codec, CompressionStats};
use std::io::Write;
use std::path::Path;
use tracing::debug;

impl Codec {
    /// Compress the file at `src` into an artifact at `dst`.
    pub fn zip_file(&self, src: &Path, dst: &Path) -> Result<CompressionStats> {
        let data = std::fs::read(src)?;
        let (artifact, stats) = self.encode_with_stats(&data)?;
        self.write_output(dst, &artifact)?;
        Ok(stats)
    }

    /// Restore the file at `dst` from the artifact at `src`, returning its size.
    pub fn unzip_file(&self, src: &Path, dst: &Path) -> Result<usize> {
        let artifact = std::fs::read(src)?;
        let data = self.decode(&artifact)?;
        self.write_output(dst, &data)?;
        Ok(data.len())
    }

    fn write_output(&self, dst: &Path, bytes: &[u8]) -> Result<()> {
        if !self.config().atomic_write {
            std::fs::write(dst, bytes)?;
            return Ok(());
        }

        let dir = match dst.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(dst).map_err(|e| e.error)?;
        debug!(path = %dst.display(), len = bytes.len(), "wrote output");
        Ok(())
    }
}
