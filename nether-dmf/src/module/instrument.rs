//! Instrument, macro and wavetable structures

/// Which of the four instrument macros a [`Macro`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    Volume,
    Arpeggio,
    DutyNoise,
    Wavetable,
}

/// Envelope/automation sequence attached to an instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub kind: MacroKind,
    /// Offset of the count byte in the decompressed buffer
    pub offset: usize,
    /// One value per tick
    pub values: Vec<i32>,
    /// Loop start, None if the macro does not loop (or is empty)
    pub loop_position: Option<u8>,
}

impl Macro {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Values of the looped section, if the macro loops
    pub fn loop_values(&self) -> Option<&[i32]> {
        self.values.get(self.loop_position? as usize..)
    }
}

/// How arpeggio macro values are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArpeggioMode {
    /// Values are offsets from the played note
    #[default]
    Normal,
    /// Values are absolute notes
    Fixed,
    Unknown(u8),
}

impl ArpeggioMode {
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => Self::Normal,
            1 => Self::Fixed,
            other => Self::Unknown(other),
        }
    }
}

/// Standard (non-FM) instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub name: String,
    /// Offset of the name string in the decompressed buffer
    pub offset: usize,
    /// Absent on systems without a software volume envelope
    pub volume: Option<Macro>,
    pub arpeggio: Macro,
    pub arpeggio_mode: ArpeggioMode,
    pub duty_noise: Macro,
    pub wavetable: Macro,
}

impl Instrument {
    /// Macros in file order
    pub fn macros(&self) -> impl Iterator<Item = &Macro> {
        self.volume
            .iter()
            .chain([&self.arpeggio, &self.duty_noise, &self.wavetable])
    }
}

/// Wave definition for the PC Engine's wavetable channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wavetable {
    /// Offset of the size field in the decompressed buffer
    pub offset: usize,
    pub values: Vec<u32>,
}

impl Wavetable {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
