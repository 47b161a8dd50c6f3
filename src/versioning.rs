//! Engine release identifiers
//!
//! A [`VersionId`] is the `(major, minor, revision, extra)` tuple libVLC
//! publishes in its headers. Ordering follows the packed `LIBVLC_VERSION_INT`
//! key (`major << 24 | minor << 16 | revision << 8 | extra`), so comparing two
//! ids is the same as comparing their packed integers.

use crate::core::engine::Engine;
use crate::error::{Result, VlcError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Engine version as a 4-tuple of 8-bit components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionId {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    pub extra: u8,
}

impl VersionId {
    pub const fn new(major: u8, minor: u8, revision: u8, extra: u8) -> Self {
        VersionId {
            major,
            minor,
            revision,
            extra,
        }
    }

    /// Build a version from wider integers, rejecting any component above 255
    ///
    /// # Examples
    ///
    /// ```
    /// use vlc_bridge::VersionId;
    ///
    /// assert!(VersionId::try_new(3, 0, 20, 0).is_ok());
    /// assert!(VersionId::try_new(3, 0, 256, 0).is_err());
    /// ```
    pub fn try_new(major: u32, minor: u32, revision: u32, extra: u32) -> Result<Self> {
        Ok(VersionId {
            major: component("major", major)?,
            minor: component("minor", minor)?,
            revision: component("revision", revision)?,
            extra: component("extra", extra)?,
        })
    }

    /// Version the engine binding `E` was compiled against
    pub fn current<E: Engine>() -> Self {
        E::HEADER_VERSION
    }

    /// Packed 32-bit key, most significant component first
    pub const fn packed(&self) -> u32 {
        (self.major as u32) << 24
            | (self.minor as u32) << 16
            | (self.revision as u32) << 8
            | self.extra as u32
    }

    pub const fn from_packed(key: u32) -> Self {
        VersionId {
            major: (key >> 24) as u8,
            minor: (key >> 16) as u8,
            revision: (key >> 8) as u8,
            extra: key as u8,
        }
    }
}

fn component(name: &'static str, value: u32) -> Result<u8> {
    u8::try_from(value).map_err(|_| VlcError::VersionComponentOutOfRange {
        component: name,
        value,
    })
}

impl Ord for VersionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.packed().cmp(&other.packed())
    }
}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.revision, self.extra
        )
    }
}

/// Parses engine version strings
///
/// Accepts the leading dotted numeric run of strings like `"3.0.20 Vetinari"`,
/// `"4.0.0-dev Otto Chriek"` or `"3.0"`. Missing components default to 0;
/// more than four components is an error.
impl FromStr for VersionId {
    type Err = VlcError;

    fn from_str(s: &str) -> Result<Self> {
        let head = s
            .trim()
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .next()
            .unwrap_or("")
            .trim_end_matches('.');

        if head.is_empty() {
            return Err(VlcError::InvalidVersion(s.to_string()));
        }

        let mut parts = [0u32; 4];
        for (idx, piece) in head.split('.').enumerate() {
            if idx >= parts.len() {
                return Err(VlcError::InvalidVersion(s.to_string()));
            }
            parts[idx] = piece
                .parse()
                .map_err(|_| VlcError::InvalidVersion(s.to_string()))?;
        }

        VersionId::try_new(parts[0], parts[1], parts[2], parts[3])
    }
}
