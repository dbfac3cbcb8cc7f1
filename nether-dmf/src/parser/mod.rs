//! DMF decoder
//!
//! A single forward walk over the decompressed buffer. Every record's size is
//! derived from values read earlier in the same buffer, so the stages must run
//! in file order:
//!
//! - `format` - magic, version and system
//! - `header` - song metadata and the pattern matrix
//! - `instrument` - instruments and wavetables
//! - `pattern` - per-channel pattern blocks
//! - `sample` - sample table
//!
//! The trailer check at the end is the only cross-check that every inline
//! length was consistent.

mod header;
mod instrument;
mod pattern;
mod sample;

use crate::cursor::ByteCursor;
use crate::error::{DmfError, Result};
use crate::format::{identify, VersionCaps};
use crate::module::DmfModule;

use header::{decode_header, decode_matrix};
use instrument::{decode_instruments, decode_wavetables};
use pattern::decode_patterns;
use sample::decode_samples;

/// Decode an already-decompressed DMF buffer into a DmfModule
///
/// # Arguments
/// * `data` - Decompressed DMF bytes, starting with the magic
///
/// # Returns
/// * `Ok(DmfModule)` - Fully decoded module; the whole buffer was consumed
/// * `Err(DmfError)` - The first error encountered
pub fn decode_bytes(data: &[u8]) -> Result<DmfModule> {
    let mut cursor = ByteCursor::new(data);

    let format = identify(&mut cursor)?;
    let header = decode_header(&mut cursor, &format)?;
    let matrix = decode_matrix(&mut cursor, &format, &header)?;
    let instruments = decode_instruments(&mut cursor, &format)?;
    let wavetables = decode_wavetables(&mut cursor)?;
    let patterns = decode_patterns(&mut cursor, &format, &header, &matrix)?;
    let samples = decode_samples(&mut cursor, &format.caps)?;

    check_trailer(&mut cursor, &format.caps)?;

    Ok(DmfModule {
        format,
        header,
        matrix,
        instruments,
        wavetables,
        patterns,
        samples,
    })
}

/// Consume the end byte and require end of buffer
///
/// Only V24 requires the end byte to be zero; older revisions leave it
/// unspecified.
fn check_trailer(cursor: &mut ByteCursor<'_>, caps: &VersionCaps) -> Result<()> {
    if caps.end_byte {
        let marker = cursor.read_u8()?;
        if caps.end_byte_must_be_zero && marker != 0 {
            return Err(DmfError::UnexpectedTrailer(marker));
        }
    }

    if !cursor.is_at_end() {
        return Err(DmfError::TrailingOrMissingData {
            position: cursor.position(),
            len: cursor.len(),
        });
    }
    Ok(())
}
