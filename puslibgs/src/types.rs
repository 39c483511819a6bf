//! Type definitions shared between ground and space software

use std::cmp::Ordering;
use std::fmt;
use std::mem::size_of;

use serde::{Deserialize, Serialize};

use crate::error::{PusError, PusResult};

/// Largest application process identifier representable in a space packet
pub const MAX_APID: u16 = 0x7FF;

/// Application process identifier, the routing destination of a telecommand
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Apid(pub u16);

impl Apid {
    /// Create an APID, rejecting values which do not fit into 11 bits
    pub fn new(value: u16) -> PusResult<Self> {
        if value > MAX_APID {
            return Err(PusError::InvalidApid(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl Ord for Apid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Apid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Apid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// Unique identifier of a device or subsystem behind an APID
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UniqueId(pub u32);

impl UniqueId {
    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// Operating modes understood by the flight software mode service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    Off,
    On,
    Normal,
}

impl Mode {
    pub fn to_u32(&self) -> u32 {
        match self {
            Mode::Off => 0,
            Mode::On => 1,
            Mode::Normal => 2,
        }
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Mode::Off),
            1 => Some(Mode::On),
            2 => Some(Mode::Normal),
            _ => None,
        }
    }

    /// Parse the lower case selector used in command paths
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "off" => Some(Mode::Off),
            "on" => Some(Mode::On),
            "normal" => Some(Mode::Normal),
            _ => None,
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            Mode::Off => "off",
            Mode::On => "on",
            Mode::Normal => "normal",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Off => write!(f, "OFF"),
            Mode::On => write!(f, "ON"),
            Mode::Normal => write!(f, "NORMAL"),
        }
    }
}

/// Mode and submode pair. The submode is always transmitted, even when the
/// target does not use it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModeAndSubmode {
    pub mode: Mode,
    pub submode: u16,
}

impl ModeAndSubmode {
    pub const fn new_mode_only(mode: Mode) -> Self {
        Self { mode, submode: 0 }
    }

    pub const fn new(mode: Mode, submode: u16) -> Self {
        Self { mode, submode }
    }

    pub const fn raw_len() -> usize {
        size_of::<u32>() + size_of::<u16>()
    }

    pub fn to_be_bytes(&self) -> [u8; 6] {
        let mut buf = [0u8; 6];
        buf[0..4].copy_from_slice(&self.mode.to_u32().to_be_bytes());
        buf[4..6].copy_from_slice(&self.submode.to_be_bytes());
        buf
    }
}

/// A commandable device: a display name plus the addressing needed to reach it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub apid: Apid,
    pub unique_id: UniqueId,
}

impl Target {
    pub fn new(name: impl Into<String>, apid: Apid, unique_id: UniqueId) -> Self {
        Self {
            name: name.into(),
            apid,
            unique_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apid_range() {
        assert_eq!(Apid::new(0x7FF), Ok(Apid(0x7FF)));
        assert_eq!(Apid::new(0x800), Err(PusError::InvalidApid(0x800)));
    }

    #[test]
    fn test_mode_values() {
        assert_eq!(Mode::Off.to_u32(), 0);
        assert_eq!(Mode::On.to_u32(), 1);
        assert_eq!(Mode::Normal.to_u32(), 2);
        assert_eq!(Mode::from_u32(2), Some(Mode::Normal));
        assert_eq!(Mode::from_u32(3), None);
    }

    #[test]
    fn test_mode_selector() {
        for mode in [Mode::Off, Mode::On, Mode::Normal] {
            assert_eq!(Mode::from_selector(mode.selector()), Some(mode));
        }
        assert_eq!(Mode::from_selector("ON"), None);
    }

    #[test]
    fn test_mode_and_submode_bytes() {
        let ms = ModeAndSubmode::new(Mode::Normal, 0x0102);
        assert_eq!(ms.to_be_bytes(), [0, 0, 0, 2, 0x01, 0x02]);
        assert_eq!(ModeAndSubmode::raw_len(), 6);
        assert_eq!(ModeAndSubmode::new_mode_only(Mode::On).submode, 0);
    }
}
