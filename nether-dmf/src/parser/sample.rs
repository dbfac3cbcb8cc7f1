//! Sample table decoding

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::format::VersionCaps;
use crate::module::{Sample, SampleRate};
use crate::{IMPLICIT_SAMPLE_BITS, SAMPLE_POINT_LEN};

/// Decode the count-prefixed sample table
pub(crate) fn decode_samples(
    cursor: &mut ByteCursor<'_>,
    caps: &VersionCaps,
) -> Result<Vec<Sample>> {
    let count = cursor.read_u8()?;
    if count == 0 {
        tracing::debug!("No samples");
        return Ok(Vec::new());
    }

    let mut samples = Vec::with_capacity(count as usize);
    for index in 0..count {
        let sample = decode_sample(cursor, caps)?;
        if let SampleRate::Reserved(code) = sample.rate {
            tracing::warn!(
                "Sample {} uses reserved rate code {} at 0x{:06X}",
                index,
                code,
                sample.offset
            );
        }
        tracing::trace!(
            "Sample {} at 0x{:06X}: {} points, {:?}",
            index,
            sample.offset,
            sample.len(),
            sample.rate
        );
        samples.push(sample);
    }

    tracing::debug!("{} samples", samples.len());
    Ok(samples)
}

fn decode_sample(cursor: &mut ByteCursor<'_>, caps: &VersionCaps) -> Result<Sample> {
    let offset = cursor.position();
    let size = cursor.read_u32_le()? as usize;

    let name = if caps.sample_names {
        Some(cursor.read_pstring()?)
    } else {
        None
    };

    let rate_code = cursor.read_u8()?;
    let pitch = cursor.read_u8()?;
    let amplitude = cursor.read_u8()?;

    let bits = if caps.sample_bits {
        cursor.read_u8()?
    } else {
        IMPLICIT_SAMPLE_BITS
    };

    let len = cursor.span(size, SAMPLE_POINT_LEN)?;
    let data = cursor
        .read_bytes(len)?
        .chunks_exact(SAMPLE_POINT_LEN)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();

    Ok(Sample {
        offset,
        name,
        rate_code,
        rate: SampleRate::from_code(rate_code),
        pitch,
        amplitude,
        bits,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DmfError;
    use crate::format::FormatVersion;

    fn sample_bytes(caps: &VersionCaps, name: &str, rate: u8, points: &[i16]) -> Vec<u8> {
        let mut out = (points.len() as u32).to_le_bytes().to_vec();
        if caps.sample_names {
            out.push(name.len() as u8);
            out.extend_from_slice(name.as_bytes());
        }
        out.extend_from_slice(&[rate, 5, 50]);
        if caps.sample_bits {
            out.push(8);
        }
        for p in points {
            out.extend_from_slice(&p.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_zero_samples() {
        let caps = FormatVersion::V24.caps();
        let data = [0u8, 0xEE];
        let mut cursor = ByteCursor::new(&data);
        let samples = decode_samples(&mut cursor, &caps).unwrap();
        assert!(samples.is_empty());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_v24_sample() {
        let caps = FormatVersion::V24.caps();
        let mut data = vec![1];
        data.extend(sample_bytes(&caps, "kick", 2, &[0, 1000, -1000]));

        let mut cursor = ByteCursor::new(&data);
        let samples = decode_samples(&mut cursor, &caps).unwrap();
        let kick = &samples[0];

        assert_eq!(kick.offset, 1);
        assert_eq!(kick.name.as_deref(), Some("kick"));
        assert_eq!(kick.rate, SampleRate::Hz(11025));
        assert_eq!(kick.pitch, 5);
        assert_eq!(kick.amplitude, 50);
        assert_eq!(kick.bits, 8);
        assert_eq!(kick.data, vec![0, 1000, -1000]);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_v21_sample_has_implicit_bits() {
        let caps = FormatVersion::V21.caps();
        let mut data = vec![2];
        data.extend(sample_bytes(&caps, "", 1, &[7]));
        data.extend(sample_bytes(&caps, "", 3, &[]));

        let mut cursor = ByteCursor::new(&data);
        let samples = decode_samples(&mut cursor, &caps).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].name, None);
        assert_eq!(samples[0].bits, 16);
        assert_eq!(samples[0].data, vec![7]);
        assert!(samples[1].is_empty());
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_v22_sample_has_bits_but_no_name() {
        let caps = FormatVersion::V22.caps();
        let mut data = vec![1];
        data.extend(sample_bytes(&caps, "", 4, &[1, 2]));

        let mut cursor = ByteCursor::new(&data);
        let samples = decode_samples(&mut cursor, &caps).unwrap();
        assert_eq!(samples[0].name, None);
        assert_eq!(samples[0].bits, 8);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_reserved_rate_keeps_decoding() {
        let caps = FormatVersion::V24.caps();
        let mut data = vec![2];
        data.extend(sample_bytes(&caps, "a", 6, &[1]));
        data.extend(sample_bytes(&caps, "b", 0, &[2]));

        let mut cursor = ByteCursor::new(&data);
        let samples = decode_samples(&mut cursor, &caps).unwrap();
        assert_eq!(samples[0].rate, SampleRate::Reserved(6));
        assert_eq!(samples[1].rate, SampleRate::Reserved(0));
        assert_eq!(samples[1].data, vec![2]);
    }

    #[test]
    fn test_truncated_payload() {
        let caps = FormatVersion::V24.caps();
        let mut data = vec![1];
        data.extend(sample_bytes(&caps, "s", 1, &[1, 2, 3]));
        data.pop();

        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            decode_samples(&mut cursor, &caps),
            Err(DmfError::OutOfBounds { requested: 6, remaining: 5, .. })
        ));
    }
}
