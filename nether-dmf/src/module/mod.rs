//! DMF module data structures

mod instrument;
mod pattern;
mod sample;

pub use instrument::{ArpeggioMode, Instrument, Macro, MacroKind, Wavetable};
pub use pattern::{cell_width, ChannelPatterns, Effect, Pattern, PatternCell, PatternGrid};
pub use sample::{Sample, SampleRate, SAMPLE_RATE_TABLE};

use crate::format::FormatContext;

/// Fully decoded DMF module
///
/// Only produced once the whole buffer has been consumed, so every offset
/// stored in here is known to be consistent with the rest of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmfModule {
    /// Revision and system of the module
    pub format: FormatContext,
    /// Song metadata and timing
    pub header: SongHeader,
    /// Per-channel arrangement
    pub matrix: PatternMatrix,
    /// Instrument definitions, indexed by instrument number
    pub instruments: Vec<Instrument>,
    /// Wavetable definitions, indexed by wave number
    pub wavetables: Vec<Wavetable>,
    /// Pattern blocks, indexed by channel and matrix row
    pub patterns: PatternGrid,
    /// Sample definitions with their PCM data
    pub samples: Vec<Sample>,
}

impl DmfModule {
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.format.channel_count
    }

    #[inline]
    pub fn num_instruments(&self) -> usize {
        self.instruments.len()
    }

    #[inline]
    pub fn num_wavetables(&self) -> usize {
        self.wavetables.len()
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Pattern played by `channel` at matrix position `matrix_row`
    pub fn pattern_at(&self, channel: usize, matrix_row: usize) -> Option<&Pattern> {
        self.patterns.get(channel, matrix_row)
    }

    /// Pattern numbered `pattern_index` on `channel`, validated against the matrix
    pub fn pattern_by_index(&self, channel: usize, pattern_index: u8) -> Option<&Pattern> {
        self.patterns.lookup(&self.matrix, channel, pattern_index)
    }
}

/// Video timing the song was written against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameMode {
    /// 50 Hz
    Pal,
    /// 60 Hz
    #[default]
    Ntsc,
}

impl FrameMode {
    pub fn from_u8(val: u8) -> Self {
        if val != 0 { Self::Ntsc } else { Self::Pal }
    }

    /// Tick rate of the video standard
    pub fn rate_hz(self) -> u32 {
        match self {
            Self::Pal => 50,
            Self::Ntsc => 60,
        }
    }
}

/// Song metadata and global timing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SongHeader {
    /// Song name
    pub name: String,
    /// Song author
    pub author: String,
    /// Row highlight A (editor only)
    pub highlight_a: u8,
    /// Row highlight B (editor only)
    pub highlight_b: u8,
    /// Base time multiplier for tick times
    pub base_time: u8,
    /// Ticks per even row
    pub tick_time_1: u8,
    /// Ticks per odd row
    pub tick_time_2: u8,
    /// PAL or NTSC
    pub frame_mode: FrameMode,
    /// Custom tick rate in Hz, if the song overrides the frame mode
    pub custom_rate: Option<u16>,
    /// Rows in every pattern
    pub rows_in_pattern: u32,
    /// Rows in the pattern matrix
    pub rows_in_matrix: u8,
    /// Arpeggio tick speed (only stored before DefleMask 11.1)
    pub arpeggio_ticks: Option<u8>,
}

impl SongHeader {
    /// Tick rate to play at: the custom rate, or the frame mode's standard rate
    pub fn tick_rate_hz(&self) -> u32 {
        self.custom_rate
            .map(u32::from)
            .unwrap_or_else(|| self.frame_mode.rate_hz())
    }
}

/// Per-channel pattern arrangement
///
/// `rows[channel][matrix_row]` is an opaque pattern index. Indices are only
/// checked when a consumer resolves them through [`PatternGrid::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternMatrix {
    pub rows: Vec<Vec<u8>>,
}

impl PatternMatrix {
    /// Pattern index for `channel` at `matrix_row`
    pub fn get(&self, channel: usize, matrix_row: usize) -> Option<u8> {
        self.rows.get(channel)?.get(matrix_row).copied()
    }

    /// The whole matrix row of one channel
    pub fn channel(&self, channel: usize) -> Option<&[u8]> {
        self.rows.get(channel).map(Vec::as_slice)
    }

    pub fn num_channels(&self) -> usize {
        self.rows.len()
    }
}
