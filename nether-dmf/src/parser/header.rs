//! Song header and pattern matrix decoding

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::format::FormatContext;
use crate::module::{FrameMode, PatternMatrix, SongHeader};

/// Custom rate digits are stored in a fixed 3-byte field
const CUSTOM_RATE_DIGITS: usize = 3;

/// Decode name, author, highlight and the global timing block
pub(crate) fn decode_header(
    cursor: &mut ByteCursor<'_>,
    format: &FormatContext,
) -> Result<SongHeader> {
    let name = cursor.read_pstring()?;
    let author = cursor.read_pstring()?;

    // Row highlight A/B (editor cursor highlight)
    let highlight_a = cursor.read_u8()?;
    let highlight_b = cursor.read_u8()?;

    let base_time = cursor.read_u8()?;
    let tick_time_1 = cursor.read_u8()?;
    let tick_time_2 = cursor.read_u8()?;
    let frame_mode = FrameMode::from_u8(cursor.read_u8()?);
    let custom_flag = cursor.read_u8()?;
    let digits = cursor.read_bytes(CUSTOM_RATE_DIGITS)?;
    let custom_rate = (custom_flag != 0).then(|| parse_custom_rate(digits));

    let rows_in_pattern = if format.caps.wide_pattern_rows {
        cursor.read_u32_le()?
    } else {
        cursor.read_u8()? as u32
    };
    let rows_in_matrix = cursor.read_u8()?;

    let arpeggio_ticks = if format.caps.arpeggio_ticks {
        Some(cursor.read_u8()?)
    } else {
        None
    };

    tracing::debug!(
        "Song '{}' by '{}': {} rows/pattern, {} matrix rows",
        name,
        author,
        rows_in_pattern,
        rows_in_matrix
    );

    Ok(SongHeader {
        name,
        author,
        highlight_a,
        highlight_b,
        base_time,
        tick_time_1,
        tick_time_2,
        frame_mode,
        custom_rate,
        rows_in_pattern,
        rows_in_matrix,
        arpeggio_ticks,
    })
}

/// Parse up to three ASCII decimal digits, stopping at a zero byte
fn parse_custom_rate(digits: &[u8]) -> u16 {
    let mut value = 0u16;
    for &digit in digits {
        if digit == 0 {
            break;
        }
        if !digit.is_ascii_digit() {
            tracing::warn!("Non-digit 0x{:02X} in custom rate, ignoring the rest", digit);
            break;
        }
        value = value * 10 + u16::from(digit - b'0');
    }
    value
}

/// Decode one row of pattern indices per channel
pub(crate) fn decode_matrix(
    cursor: &mut ByteCursor<'_>,
    format: &FormatContext,
    header: &SongHeader,
) -> Result<PatternMatrix> {
    let row_len = header.rows_in_matrix as usize;
    let mut rows = Vec::with_capacity(format.channel_count);
    for _ in 0..format.channel_count {
        rows.push(cursor.read_bytes(row_len)?.to_vec());
    }
    Ok(PatternMatrix { rows })
}
