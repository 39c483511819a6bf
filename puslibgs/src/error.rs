//! Error definitions for PUS packet handling

use thiserror::Error;

/// Errors raised while packing or unpacking PUS telecommands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PusError {
    #[error("APID {0:#x} does not fit into 11 bits")]
    InvalidApid(u16),

    #[error("Packet too large: {0} bytes")]
    PacketTooLarge(usize),

    #[error("Raw data too short: {found} bytes, expected at least {expected}")]
    RawDataTooShort { expected: usize, found: usize },

    #[error("Incorrect CRC16: {0:#06x}")]
    IncorrectCrc(u16),

    #[error("Unsupported PUS version: {0}")]
    UnsupportedVersion(u8),

    #[error("Packet is not a telecommand")]
    NotTelecommand,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Result type alias for PUS packet operations
pub type PusResult<T> = Result<T, PusError>;
