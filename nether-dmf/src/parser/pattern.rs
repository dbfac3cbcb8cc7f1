//! Pattern block delimiting
//!
//! Cells are not interpreted here, only measured and copied out. Semantic
//! decoding lives in [`crate::module::PatternCell`].

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::format::FormatContext;
use crate::module::{cell_width, ChannelPatterns, Pattern, PatternGrid, PatternMatrix, SongHeader};
use crate::MAX_EFFECT_COLUMNS;

/// Decode every channel's effect column count and pattern blocks
pub(crate) fn decode_patterns(
    cursor: &mut ByteCursor<'_>,
    format: &FormatContext,
    header: &SongHeader,
    matrix: &PatternMatrix,
) -> Result<PatternGrid> {
    let rows = header.rows_in_pattern;
    let mut channels = Vec::with_capacity(format.channel_count);

    for channel in 0..format.channel_count {
        let effect_columns = cursor.read_u8()?;
        if effect_columns > MAX_EFFECT_COLUMNS {
            tracing::warn!(
                "Channel {} has {} effect columns (expected at most {})",
                channel,
                effect_columns,
                MAX_EFFECT_COLUMNS
            );
        }

        let block_len = cursor.span(rows as usize, cell_width(effect_columns))?;
        let mut patterns = Vec::with_capacity(header.rows_in_matrix as usize);

        for matrix_row in 0..header.rows_in_matrix as usize {
            let offset = cursor.position();
            let data = cursor.read_bytes(block_len)?.to_vec();
            patterns.push(Pattern {
                channel,
                matrix_row,
                index: matrix.get(channel, matrix_row).unwrap_or_default(),
                offset,
                rows,
                effect_columns,
                data,
            });
        }

        tracing::trace!(
            "Channel {}: {} effect columns, {} patterns",
            channel,
            effect_columns,
            patterns.len()
        );
        channels.push(ChannelPatterns {
            effect_columns,
            patterns,
        });
    }

    Ok(PatternGrid { channels })
}
