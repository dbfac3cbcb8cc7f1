//! Container loading: read the compressed file and inflate it

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::ZlibDecoder;

use crate::error::{DmfError, Result};
use crate::MAX_UNCOMPRESSED_LEN;

/// Decoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest decompressed module accepted, in bytes
    pub max_uncompressed_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_uncompressed_len: MAX_UNCOMPRESSED_LEN,
        }
    }
}

impl DecoderConfig {
    pub fn with_max_uncompressed_len(mut self, len: usize) -> Self {
        self.max_uncompressed_len = len;
        self
    }
}

/// Decompressed module bytes, trimmed to their exact length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContainer {
    data: Vec<u8>,
}

impl RawContainer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

/// Load and inflate a DMF container with the default 4 MiB cap
pub fn load(path: impl AsRef<Path>) -> Result<RawContainer> {
    load_with(path, &DecoderConfig::default())
}

/// Load and inflate a DMF container
pub fn load_with(path: impl AsRef<Path>, config: &DecoderConfig) -> Result<RawContainer> {
    let path = path.as_ref();
    let io_error = |source: io::Error| DmfError::IoError {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_error)?;
    if !metadata.is_file() {
        return Err(io_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    if metadata.len() > isize::MAX as u64 {
        return Err(DmfError::TooLarge(metadata.len()));
    }

    let compressed = fs::read(path).map_err(io_error)?;
    tracing::debug!(
        "Read {} compressed bytes from {}",
        compressed.len(),
        path.display()
    );

    let data = inflate(&compressed, config.max_uncompressed_len)?;
    Ok(RawContainer::new(data))
}

/// Inflate a zlib stream into a buffer of at most `cap` bytes
///
/// The returned buffer is exactly as long as the decompressed data.
pub fn inflate(compressed: &[u8], cap: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve(cap).map_err(|_| DmfError::OutOfMemory { requested: cap })?;

    // One byte past the cap is enough to tell "fits exactly" from "too big"
    let limit = (cap as u64).saturating_add(1);
    ZlibDecoder::new(compressed)
        .take(limit)
        .read_to_end(&mut out)
        .map_err(|e| DmfError::DecompressError(e.to_string()))?;

    if out.len() > cap {
        return Err(DmfError::DecompressError(format!(
            "decompressed data exceeds {} bytes",
            cap
        )));
    }

    out.shrink_to_fit();
    tracing::debug!("Inflated {} -> {} bytes", compressed.len(), out.len());
    Ok(out)
}
