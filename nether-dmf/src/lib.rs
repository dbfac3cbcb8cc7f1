//! Nether-DMF: DefleMask module (DMF) decoder for Nethercore
//!
//! This crate decodes DefleMask `.dmf` files targeting the PC Engine into a
//! structural description of the song: header, pattern matrix, instruments,
//! wavetables, pattern blocks and samples.
//!
//! # Key Features
//!
//! - **Bounds-checked**: every read goes through a forward-only cursor
//! - **Version-aware**: DMF revisions 19, 21, 22 and 24
//! - **Strict**: a decode only succeeds if the whole buffer was consumed
//!
//! # DMF Format Overview
//!
//! A DMF file is a zlib stream. Decompressed, it contains, in order:
//! - Magic, format version and target system
//! - Song name, author and global timing
//! - Pattern matrix (one row of pattern indices per channel)
//! - Instruments with volume/arpeggio/duty/wave macros
//! - Wavetables
//! - Pattern data (per channel, per matrix row)
//! - Samples
//!
//! None of these records carries its own length in a header; the decoder sizes
//! each one from counts read earlier in the same record.
//!
//! # Usage
//!
//! ```ignore
//! use nether_dmf::decode;
//!
//! let module = decode("song.dmf").unwrap();
//!
//! println!("Song: {}", module.header.name);
//! println!("Channels: {}", module.channel_count());
//! println!("Instruments: {}", module.num_instruments());
//! println!("Samples: {}", module.num_samples());
//! ```
//!
//! # Format Reference
//!
//! - <http://www.deflemask.com/DMF_SPECS.txt>

mod cursor;
mod error;
mod format;
mod loader;
mod module;
mod parser;

use std::path::Path;

pub use cursor::ByteCursor;
pub use error::{DmfError, Result};
pub use format::{
    identify, FormatContext, FormatVersion, HardwareProfile, ProfileCaps, VersionCaps,
    TARGET_PROFILE,
};
pub use loader::{inflate, load, load_with, DecoderConfig, RawContainer};
pub use module::{
    cell_width, ArpeggioMode, ChannelPatterns, DmfModule, Effect, FrameMode, Instrument, Macro,
    MacroKind, Pattern, PatternCell, PatternGrid, PatternMatrix, Sample, SampleRate, SongHeader,
    Wavetable, SAMPLE_RATE_TABLE,
};
pub use parser::decode_bytes;

// =============================================================================
// Constants
// =============================================================================

/// Signature at the start of every decompressed DMF
pub const DMF_MAGIC: &[u8; 16] = b".DelekDefleMask.";

/// Largest decompressed module accepted by default (4 MiB)
pub const MAX_UNCOMPRESSED_LEN: usize = 4 * 1024 * 1024;

/// Instrument kind byte for standard (non-FM) instruments
pub const STANDARD_INSTRUMENT: u8 = 0;

/// Bytes per macro value
pub const MACRO_ENTRY_LEN: usize = 4;

/// Bytes per wavetable value
pub const WAVE_ENTRY_LEN: usize = 4;

/// Bytes per sample point
pub const SAMPLE_POINT_LEN: usize = 2;

/// Bit depth of samples in revisions that do not store it
pub const IMPLICIT_SAMPLE_BITS: u8 = 16;

// =============================================================================
// Pattern Cell Layout
// =============================================================================

/// Note, octave and volume fields at the start of every cell
pub const CELL_FIXED_LEN: usize = 6;

/// Effect code + effect value
pub const EFFECT_LEN: usize = 4;

/// Instrument field at the end of every cell
pub const CELL_INSTRUMENT_LEN: usize = 2;

/// Effect columns DefleMask lets a channel use
pub const MAX_EFFECT_COLUMNS: u8 = 4;

/// Field value for "nothing here"
pub const EMPTY_FIELD: i16 = -1;

/// Note value for "note off"
pub const NOTE_OFF: u16 = 100;

// =============================================================================
// Entry Points
// =============================================================================

/// Load, inflate and decode a DMF file
pub fn decode(path: impl AsRef<Path>) -> Result<DmfModule> {
    decode_with(path, &DecoderConfig::default())
}

/// Load, inflate and decode a DMF file with explicit settings
pub fn decode_with(path: impl AsRef<Path>, config: &DecoderConfig) -> Result<DmfModule> {
    let raw = load_with(path, config)?;
    decode_bytes(raw.as_bytes())
}
