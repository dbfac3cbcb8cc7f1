//! Error types for DMF loading and decoding

use std::io;
use std::path::PathBuf;

/// Errors that can occur when loading or decoding a DMF module
///
/// Every variant is terminal for the decode that produced it. Offsets refer to
/// positions in the decompressed buffer.
#[derive(Debug, thiserror::Error)]
pub enum DmfError {
    /// The container could not be opened, stat'ed or read
    #[error("IO error reading {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The container is larger than the platform can address
    #[error("File too large: {0} bytes")]
    TooLarge(u64),

    /// Inflate failed or produced more than the configured cap
    #[error("Decompression error: {0}")]
    DecompressError(String),

    /// The output buffer could not be allocated
    #[error("Out of memory allocating {requested} bytes")]
    OutOfMemory { requested: usize },

    /// A read or skip ran past the end of the buffer
    #[error(
        "Read of {requested} bytes at offset 0x{offset:06X} overruns buffer ({remaining} bytes left)"
    )]
    OutOfBounds {
        offset: usize,
        requested: usize,
        remaining: usize,
    },

    /// Missing ".DelekDefleMask." signature
    #[error("Invalid magic bytes (expected '.DelekDefleMask.')")]
    BadMagic,

    /// Format revision this decoder does not know
    #[error("Unsupported DMF version: {0}")]
    UnsupportedVersion(u8),

    /// Any system other than the PC Engine
    #[error("Unsupported system: 0x{0:02X} (only PC Engine modules are supported)")]
    UnsupportedProfile(u8),

    /// FM (or any non-standard) instrument
    #[error("Instrument {index} has unsupported kind {kind} (only standard instruments)")]
    UnsupportedInstrumentKind { index: u8, kind: u8 },

    /// An instrument record ran past the end of the buffer
    #[error("Instrument {index} truncated at offset 0x{offset:06X}")]
    TruncatedInstrument { index: u8, offset: usize },

    /// Nonzero byte where the V24 end marker should be
    #[error("Unexpected trailer byte: 0x{0:02X}")]
    UnexpectedTrailer(u8),

    /// Decode finished but the cursor is not at the end of the buffer
    #[error("Parse ended at offset 0x{position:06X} but buffer is {len} bytes")]
    TrailingOrMissingData { position: usize, len: usize },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DmfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DmfError::BadMagic.to_string(),
            "Invalid magic bytes (expected '.DelekDefleMask.')"
        );
        assert_eq!(
            DmfError::UnsupportedVersion(23).to_string(),
            "Unsupported DMF version: 23"
        );
        assert_eq!(
            DmfError::UnsupportedProfile(0x02).to_string(),
            "Unsupported system: 0x02 (only PC Engine modules are supported)"
        );
        assert_eq!(
            DmfError::TrailingOrMissingData {
                position: 0x20,
                len: 40
            }
            .to_string(),
            "Parse ended at offset 0x000020 but buffer is 40 bytes"
        );
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;

        let err = DmfError::IoError {
            path: PathBuf::from("song.dmf"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("song.dmf"));
    }
}
