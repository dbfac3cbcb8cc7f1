//! Format revision and system identification
//!
//! Everything that differs between DMF revisions or between target systems is
//! resolved here, once, into [`VersionCaps`] and [`ProfileCaps`]. Later stages
//! consult those tables and never branch on the raw version byte again.

use crate::cursor::ByteCursor;
use crate::error::{DmfError, Result};
use crate::DMF_MAGIC;

/// DMF format revisions this decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatVersion {
    /// 0x13 (DefleMask 0.11)
    V19,
    /// 0x15 (DefleMask 11.1)
    V21,
    /// 0x16
    V22,
    /// 0x18 (DefleMask 0.12.0)
    V24,
}

impl FormatVersion {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x13 => Some(Self::V19),
            0x15 => Some(Self::V21),
            0x16 => Some(Self::V22),
            0x18 => Some(Self::V24),
            _ => None,
        }
    }

    pub const fn byte(self) -> u8 {
        match self {
            Self::V19 => 0x13,
            Self::V21 => 0x15,
            Self::V22 => 0x16,
            Self::V24 => 0x18,
        }
    }

    /// Field layout switches for this revision
    pub const fn caps(self) -> VersionCaps {
        match self {
            Self::V19 => VersionCaps::new(false, true, false, false, true, false),
            Self::V21 => VersionCaps::new(false, false, false, false, true, false),
            Self::V22 => VersionCaps::new(false, false, false, true, true, false),
            Self::V24 => VersionCaps::new(true, false, true, true, true, true),
        }
    }
}

/// Per-revision layout of the variable parts of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionCaps {
    /// Rows-in-pattern is a u32 LE rather than a single byte
    pub wide_pattern_rows: bool,

    /// Header carries the legacy arpeggio tick speed byte (removed in 11.1)
    pub arpeggio_ticks: bool,

    /// Each sample record starts with a name string
    pub sample_names: bool,

    /// Each sample record carries an explicit bit depth byte
    pub sample_bits: bool,

    /// A single end byte follows the sample table
    pub end_byte: bool,

    /// The end byte must be zero
    pub end_byte_must_be_zero: bool,
}

impl VersionCaps {
    pub const fn new(
        wide_pattern_rows: bool,
        arpeggio_ticks: bool,
        sample_names: bool,
        sample_bits: bool,
        end_byte: bool,
        end_byte_must_be_zero: bool,
    ) -> Self {
        Self {
            wide_pattern_rows,
            arpeggio_ticks,
            sample_names,
            sample_bits,
            end_byte,
            end_byte_must_be_zero,
        }
    }
}

/// Sound systems a DMF can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareProfile {
    Genesis,
    GenesisExtCh3,
    Sms,
    GameBoy,
    PcEngine,
    Nes,
    C64Sid8580,
    C64Sid6581,
    Ym2151,
}

impl HardwareProfile {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x02 => Some(Self::Genesis),
            0x12 => Some(Self::GenesisExtCh3),
            0x03 => Some(Self::Sms),
            0x04 => Some(Self::GameBoy),
            0x05 => Some(Self::PcEngine),
            0x06 => Some(Self::Nes),
            0x07 => Some(Self::C64Sid8580),
            0x17 => Some(Self::C64Sid6581),
            0x08 => Some(Self::Ym2151),
            _ => None,
        }
    }

    pub const fn byte(self) -> u8 {
        match self {
            Self::Genesis => 0x02,
            Self::GenesisExtCh3 => 0x12,
            Self::Sms => 0x03,
            Self::GameBoy => 0x04,
            Self::PcEngine => 0x05,
            Self::Nes => 0x06,
            Self::C64Sid8580 => 0x07,
            Self::C64Sid6581 => 0x17,
            Self::Ym2151 => 0x08,
        }
    }

    /// Channel count and instrument shape for this system
    pub const fn caps(self) -> ProfileCaps {
        match self {
            Self::Genesis => ProfileCaps::new(10, true, 0),
            Self::GenesisExtCh3 => ProfileCaps::new(13, true, 0),
            Self::Sms => ProfileCaps::new(4, true, 0),
            Self::GameBoy => ProfileCaps::new(4, false, 4),
            Self::PcEngine => ProfileCaps::new(6, true, 0),
            Self::Nes => ProfileCaps::new(5, true, 0),
            Self::C64Sid8580 | Self::C64Sid6581 => ProfileCaps::new(3, true, 19),
            Self::Ym2151 => ProfileCaps::new(13, true, 0),
        }
    }

    #[inline]
    pub const fn channel_count(self) -> usize {
        self.caps().channel_count
    }
}

/// Per-system layout facts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileCaps {
    pub channel_count: usize,

    /// Instruments carry a volume macro (the Game Boy uses its hardware envelope instead)
    pub has_volume_macro: bool,

    /// System-specific bytes after the four macros of each instrument
    pub instrument_trailer_len: usize,
}

impl ProfileCaps {
    pub const fn new(
        channel_count: usize,
        has_volume_macro: bool,
        instrument_trailer_len: usize,
    ) -> Self {
        Self {
            channel_count,
            has_volume_macro,
            instrument_trailer_len,
        }
    }
}

/// The only system this decoder accepts
pub const TARGET_PROFILE: HardwareProfile = HardwareProfile::PcEngine;

/// Version and system of a module, with their layout tables resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatContext {
    pub version: FormatVersion,
    pub profile: HardwareProfile,
    pub caps: VersionCaps,
    pub profile_caps: ProfileCaps,
    pub channel_count: usize,
}

impl FormatContext {
    pub const fn new(version: FormatVersion, profile: HardwareProfile) -> Self {
        let profile_caps = profile.caps();
        Self {
            version,
            profile,
            caps: version.caps(),
            profile_caps,
            channel_count: profile_caps.channel_count,
        }
    }
}

/// Check the signature and read the version and system bytes
pub fn identify(cursor: &mut ByteCursor<'_>) -> Result<FormatContext> {
    if cursor.read_bytes(DMF_MAGIC.len())? != DMF_MAGIC {
        return Err(DmfError::BadMagic);
    }

    let version_byte = cursor.read_u8()?;
    let version =
        FormatVersion::from_byte(version_byte).ok_or(DmfError::UnsupportedVersion(version_byte))?;

    let system_byte = cursor.read_u8()?;
    let profile = match HardwareProfile::from_byte(system_byte) {
        Some(profile) if profile == TARGET_PROFILE => profile,
        _ => return Err(DmfError::UnsupportedProfile(system_byte)),
    };

    let format = FormatContext::new(version, profile);
    tracing::debug!(
        "DMF version {} ({:?}), system {:?}, {} channels",
        version_byte,
        version,
        profile,
        format.channel_count
    );
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: u8, system: u8) -> Vec<u8> {
        let mut data = DMF_MAGIC.to_vec();
        data.push(version);
        data.push(system);
        data
    }

    #[test]
    fn test_identify_pc_engine() {
        let data = header(24, 0x05);
        let mut cursor = ByteCursor::new(&data);
        let format = identify(&mut cursor).unwrap();

        assert_eq!(format.version, FormatVersion::V24);
        assert_eq!(format.profile, HardwareProfile::PcEngine);
        assert_eq!(format.channel_count, 6);
        assert!(format.caps.end_byte_must_be_zero);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_identify_bad_magic() {
        let mut data = header(24, 0x05);
        data[0] = b'!';
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(identify(&mut cursor), Err(DmfError::BadMagic)));
    }

    #[test]
    fn test_identify_short_magic() {
        let data = b".DelekDef";
        let mut cursor = ByteCursor::new(data);
        assert!(matches!(
            identify(&mut cursor),
            Err(DmfError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_identify_unsupported_version() {
        for version in [0u8, 18, 20, 23, 25, 255] {
            let data = header(version, 0x05);
            let mut cursor = ByteCursor::new(&data);
            assert!(matches!(
                identify(&mut cursor),
                Err(DmfError::UnsupportedVersion(v)) if v == version
            ));
        }
    }

    #[test]
    fn test_identify_rejects_other_systems() {
        for system in [0x02u8, 0x12, 0x03, 0x04, 0x06, 0x07, 0x17, 0x08, 0x00, 0x42] {
            let data = header(24, system);
            let mut cursor = ByteCursor::new(&data);
            assert!(matches!(
                identify(&mut cursor),
                Err(DmfError::UnsupportedProfile(s)) if s == system
            ));
        }
    }

    #[test]
    fn test_version_caps_table() {
        let v19 = FormatVersion::V19.caps();
        assert!(v19.arpeggio_ticks);
        assert!(!v19.sample_bits);

        let v21 = FormatVersion::V21.caps();
        assert!(!v21.arpeggio_ticks);
        assert!(!v21.sample_bits);

        let v22 = FormatVersion::V22.caps();
        assert!(v22.sample_bits);
        assert!(!v22.sample_names);
        assert!(!v22.wide_pattern_rows);

        let v24 = FormatVersion::V24.caps();
        assert!(v24.wide_pattern_rows);
        assert!(v24.sample_names);
        assert!(v24.sample_bits);
        assert!(v24.end_byte_must_be_zero);

        for caps in [v19, v21, v22, v24] {
            assert!(caps.end_byte);
        }
        assert!(!v21.end_byte_must_be_zero);
    }

    #[test]
    fn test_byte_round_trip() {
        for version in [
            FormatVersion::V19,
            FormatVersion::V21,
            FormatVersion::V22,
            FormatVersion::V24,
        ] {
            assert_eq!(FormatVersion::from_byte(version.byte()), Some(version));
        }
        for byte in [0x02u8, 0x12, 0x03, 0x04, 0x05, 0x06, 0x07, 0x17, 0x08] {
            assert_eq!(HardwareProfile::from_byte(byte).map(HardwareProfile::byte), Some(byte));
        }
        assert_eq!(
            HardwareProfile::from_byte(0x17).map(HardwareProfile::channel_count),
            Some(3)
        );
        assert_eq!(HardwareProfile::GameBoy.caps().instrument_trailer_len, 4);
        assert!(!HardwareProfile::GameBoy.caps().has_volume_macro);
        assert_eq!(HardwareProfile::Genesis.channel_count(), 10);
    }
}
