//! DMF sample structures

/// Playback rate for each 3-bit rate code; None marks reserved codes
pub const SAMPLE_RATE_TABLE: [Option<u32>; 8] = [
    None,
    Some(8000),
    Some(11025),
    Some(16000),
    Some(22050),
    Some(32000),
    None,
    None,
];

/// Sample playback rate decoded from the rate code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRate {
    Hz(u32),
    /// Code that maps to no rate in the table
    Reserved(u8),
}

impl SampleRate {
    pub fn from_code(code: u8) -> Self {
        let index = code & 0x07;
        match SAMPLE_RATE_TABLE[index as usize] {
            Some(hz) => Self::Hz(hz),
            None => Self::Reserved(index),
        }
    }

    pub fn hz(self) -> Option<u32> {
        match self {
            Self::Hz(hz) => Some(hz),
            Self::Reserved(_) => None,
        }
    }

    pub fn is_reserved(self) -> bool {
        matches!(self, Self::Reserved(_))
    }
}

/// Sample with its 16-bit PCM data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Offset of the size field in the decompressed buffer
    pub offset: usize,
    /// Only stored from DefleMask 0.12.0 on
    pub name: Option<String>,
    /// Raw rate code byte
    pub rate_code: u8,
    pub rate: SampleRate,
    pub pitch: u8,
    pub amplitude: u8,
    /// Bit depth (16 when the format does not store it)
    pub bits: u8,
    pub data: Vec<i16>,
}

impl Sample {
    /// Length in samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
