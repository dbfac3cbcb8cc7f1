//! Instrument, macro and wavetable decoding

use crate::cursor::ByteCursor;
use crate::error::{DmfError, Result};
use crate::format::FormatContext;
use crate::module::{ArpeggioMode, Instrument, Macro, MacroKind, Wavetable};
use crate::{MACRO_ENTRY_LEN, STANDARD_INSTRUMENT, WAVE_ENTRY_LEN};

/// Loop position value meaning "does not loop"
const NO_LOOP: u8 = 0xFF;

/// Decode the count-prefixed instrument table
pub(crate) fn decode_instruments(
    cursor: &mut ByteCursor<'_>,
    format: &FormatContext,
) -> Result<Vec<Instrument>> {
    let count = cursor.read_u8()?;
    let mut instruments = Vec::with_capacity(count as usize);

    for index in 0..count {
        let offset = cursor.position();
        let instrument = decode_instrument(cursor, format, index).map_err(|e| match e {
            DmfError::OutOfBounds { offset, .. } => DmfError::TruncatedInstrument { index, offset },
            other => other,
        })?;
        tracing::trace!("Instrument {} '{}' at 0x{:06X}", index, instrument.name, offset);
        instruments.push(instrument);
    }

    tracing::debug!("{} instruments", instruments.len());
    Ok(instruments)
}

fn decode_instrument(
    cursor: &mut ByteCursor<'_>,
    format: &FormatContext,
    index: u8,
) -> Result<Instrument> {
    let offset = cursor.position();
    let name = cursor.read_pstring()?;

    let kind = cursor.read_u8()?;
    if kind != STANDARD_INSTRUMENT {
        return Err(DmfError::UnsupportedInstrumentKind { index, kind });
    }

    let volume = if format.profile_caps.has_volume_macro {
        Some(decode_macro(cursor, MacroKind::Volume)?)
    } else {
        None
    };

    let arpeggio = decode_macro(cursor, MacroKind::Arpeggio)?;
    let arpeggio_mode = ArpeggioMode::from_u8(cursor.read_u8()?);
    let duty_noise = decode_macro(cursor, MacroKind::DutyNoise)?;
    let wavetable = decode_macro(cursor, MacroKind::Wavetable)?;

    cursor.skip(format.profile_caps.instrument_trailer_len)?;

    Ok(Instrument {
        name,
        offset,
        volume,
        arpeggio,
        arpeggio_mode,
        duty_noise,
        wavetable,
    })
}

/// Decode one macro body: count, values and (only when non-empty) loop position
///
/// Kind-specific trailer bytes such as the arpeggio mode are left to the caller.
pub(crate) fn decode_macro(cursor: &mut ByteCursor<'_>, kind: MacroKind) -> Result<Macro> {
    let offset = cursor.position();
    let count = cursor.read_u8()? as usize;

    if count == 0 {
        return Ok(Macro {
            kind,
            offset,
            values: Vec::new(),
            loop_position: None,
        });
    }

    let body = cursor.read_bytes(count * MACRO_ENTRY_LEN)?;
    let values = body
        .chunks_exact(MACRO_ENTRY_LEN)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let loop_position = match cursor.read_u8()? {
        NO_LOOP => None,
        pos => Some(pos),
    };

    Ok(Macro {
        kind,
        offset,
        values,
        loop_position,
    })
}

/// Decode the count-prefixed wavetable table
pub(crate) fn decode_wavetables(cursor: &mut ByteCursor<'_>) -> Result<Vec<Wavetable>> {
    let count = cursor.read_u8()?;
    let mut wavetables = Vec::with_capacity(count as usize);

    for index in 0..count {
        let offset = cursor.position();
        let size = cursor.read_u32_le()? as usize;
        let len = cursor.span(size, WAVE_ENTRY_LEN)?;
        let values = cursor
            .read_bytes(len)?
            .chunks_exact(WAVE_ENTRY_LEN)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        tracing::trace!("Wavetable {} at 0x{:06X}: {} values", index, offset, size);
        wavetables.push(Wavetable { offset, values });
    }

    tracing::debug!("{} wavetables", wavetables.len());
    Ok(wavetables)
}
