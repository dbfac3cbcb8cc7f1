//! Pattern blocks and on-demand cell decoding

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::{CELL_FIXED_LEN, CELL_INSTRUMENT_LEN, EFFECT_LEN, EMPTY_FIELD, NOTE_OFF};

use super::PatternMatrix;

/// Width in bytes of one cell for a channel with `effect_columns` effect columns
#[inline]
pub const fn cell_width(effect_columns: u8) -> usize {
    CELL_FIXED_LEN + EFFECT_LEN * effect_columns as usize + CELL_INSTRUMENT_LEN
}

/// One effect column entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub code: i16,
    /// Parameter, None when the column has no value
    pub value: Option<i16>,
}

/// A single decoded pattern row for one channel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternCell {
    /// 1-12 = C# through C, 100 = note off, 0 = empty
    pub note: u16,
    pub octave: u16,
    /// None when the volume column is empty
    pub volume: Option<i16>,
    /// One entry per effect column; None for empty columns
    pub effects: Vec<Option<Effect>>,
    /// None when no instrument is set
    pub instrument: Option<i16>,
}

impl PatternCell {
    /// Decode a cell from exactly [`cell_width`] bytes
    pub fn parse(cursor: &mut ByteCursor<'_>, effect_columns: u8) -> Result<Self> {
        let note = cursor.read_u16_le()?;
        let octave = cursor.read_u16_le()?;
        let volume = optional(cursor.read_i16_le()?);

        let mut effects = Vec::with_capacity(effect_columns as usize);
        for _ in 0..effect_columns {
            let code = cursor.read_i16_le()?;
            let value = optional(cursor.read_i16_le()?);
            effects.push(optional(code).map(|code| Effect { code, value }));
        }

        let instrument = optional(cursor.read_i16_le()?);

        Ok(Self {
            note,
            octave,
            volume,
            effects,
            instrument,
        })
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.note == NOTE_OFF
    }

    /// Check if this cell triggers a note
    #[inline]
    pub fn has_note(&self) -> bool {
        (1..=12).contains(&self.note)
    }

    /// Check if nothing at all is set in this cell
    pub fn is_empty(&self) -> bool {
        self.note == 0
            && self.octave == 0
            && self.volume.is_none()
            && self.instrument.is_none()
            && self.effects.iter().all(Option::is_none)
    }
}

fn optional(value: i16) -> Option<i16> {
    (value != EMPTY_FIELD).then_some(value)
}

/// Raw cell block for one channel at one matrix row
///
/// Cells are kept undecoded; [`Pattern::cell`] interprets them on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub channel: usize,
    pub matrix_row: usize,
    /// Pattern number taken from the matrix
    pub index: u8,
    /// Offset of the first cell in the decompressed buffer
    pub offset: usize,
    pub rows: u32,
    pub effect_columns: u8,
    pub data: Vec<u8>,
}

impl Pattern {
    #[inline]
    pub fn cell_width(&self) -> usize {
        cell_width(self.effect_columns)
    }

    /// Decode the cell at `row`
    pub fn cell(&self, row: usize) -> Option<PatternCell> {
        let width = self.cell_width();
        let start = row.checked_mul(width)?;
        let bytes = self.data.get(start..start.checked_add(width)?)?;
        PatternCell::parse(&mut ByteCursor::new(bytes), self.effect_columns).ok()
    }

    /// Decode every cell in row order
    pub fn cells(&self) -> impl Iterator<Item = PatternCell> + '_ {
        self.data
            .chunks_exact(self.cell_width())
            .filter_map(|bytes| {
                PatternCell::parse(&mut ByteCursor::new(bytes), self.effect_columns).ok()
            })
    }
}

/// All pattern blocks of one channel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelPatterns {
    /// Effect columns used by every cell of this channel
    pub effect_columns: u8,
    /// One pattern per matrix row
    pub patterns: Vec<Pattern>,
}

/// Pattern blocks for the whole song, `channels[channel].patterns[matrix_row]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternGrid {
    pub channels: Vec<ChannelPatterns>,
}

impl PatternGrid {
    /// Pattern block stored for `channel` at `matrix_row`
    pub fn get(&self, channel: usize, matrix_row: usize) -> Option<&Pattern> {
        self.channels.get(channel)?.patterns.get(matrix_row)
    }

    /// First pattern block of `channel` whose matrix entry is `pattern_index`
    ///
    /// Returns None if the matrix never references that index on that channel.
    pub fn lookup(
        &self,
        matrix: &PatternMatrix,
        channel: usize,
        pattern_index: u8,
    ) -> Option<&Pattern> {
        let matrix_row = matrix
            .channel(channel)?
            .iter()
            .position(|&idx| idx == pattern_index)?;
        self.get(channel, matrix_row)
    }

    /// Total number of pattern blocks across all channels
    pub fn len(&self) -> usize {
        self.channels.iter().map(|c| c.patterns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate every pattern block, channel-major
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.channels.iter().flat_map(|c| c.patterns.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_i16(out: &mut Vec<u8>, value: i16) {
        out.extend_from_slice(&value.to_le_bytes());
    }

    fn cell_bytes(
        note: i16,
        octave: i16,
        volume: i16,
        effects: &[(i16, i16)],
        instr: i16,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        push_i16(&mut out, note);
        push_i16(&mut out, octave);
        push_i16(&mut out, volume);
        for &(code, value) in effects {
            push_i16(&mut out, code);
            push_i16(&mut out, value);
        }
        push_i16(&mut out, instr);
        out
    }

    #[test]
    fn test_cell_width() {
        assert_eq!(cell_width(0), 8);
        assert_eq!(cell_width(1), 12);
        assert_eq!(cell_width(4), 24);
    }

    #[test]
    fn test_parse_cell_with_effects() {
        let bytes = cell_bytes(1, 4, 15, &[(0x0F, 6), (-1, -1)], 2);
        let cell = PatternCell::parse(&mut ByteCursor::new(&bytes), 2).unwrap();

        assert_eq!(cell.note, 1);
        assert_eq!(cell.octave, 4);
        assert_eq!(cell.volume, Some(15));
        assert_eq!(
            cell.effects,
            vec![
                Some(Effect {
                    code: 0x0F,
                    value: Some(6)
                }),
                None
            ]
        );
        assert_eq!(cell.instrument, Some(2));
        assert!(cell.has_note());
        assert!(!cell.is_empty());
    }

    #[test]
    fn test_parse_empty_and_note_off() {
        let bytes = cell_bytes(0, 0, -1, &[], -1);
        let cell = PatternCell::parse(&mut ByteCursor::new(&bytes), 0).unwrap();
        assert!(cell.is_empty());
        assert!(!cell.has_note());

        let bytes = cell_bytes(100, 0, -1, &[], -1);
        let cell = PatternCell::parse(&mut ByteCursor::new(&bytes), 0).unwrap();
        assert!(cell.is_note_off());
    }

    #[test]
    fn test_pattern_cells() {
        let mut data = cell_bytes(1, 3, -1, &[(0x01, 2)], 0);
        data.extend(cell_bytes(0, 0, -1, &[(-1, -1)], -1));
        let pattern = Pattern {
            channel: 0,
            matrix_row: 0,
            index: 0,
            offset: 0,
            rows: 2,
            effect_columns: 1,
            data,
        };

        assert_eq!(pattern.cell_width(), 12);
        assert_eq!(pattern.cells().count(), 2);
        assert_eq!(pattern.cell(0).unwrap().instrument, Some(0));
        assert!(pattern.cell(1).unwrap().is_empty());
        assert!(pattern.cell(2).is_none());
    }

    #[test]
    fn test_grid_lookup() {
        let pattern = |matrix_row: usize, index: u8| Pattern {
            channel: 0,
            matrix_row,
            index,
            offset: 0,
            rows: 0,
            effect_columns: 0,
            data: Vec::new(),
        };
        let grid = PatternGrid {
            channels: vec![ChannelPatterns {
                effect_columns: 0,
                patterns: vec![pattern(0, 3), pattern(1, 7), pattern(2, 7)],
            }],
        };
        let matrix = PatternMatrix {
            rows: vec![vec![3, 7, 7]],
        };

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.lookup(&matrix, 0, 7).map(|p| p.matrix_row), Some(1));
        assert!(grid.lookup(&matrix, 0, 9).is_none());
        assert!(grid.lookup(&matrix, 1, 3).is_none());
        assert_eq!(grid.get(0, 2).map(|p| p.index), Some(7));
    }
}
