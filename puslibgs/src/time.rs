//! CCSDS Day Segmented (CDS) short time code
//!
//! Used for the release time of time-tagged telecommands. The layout is a
//! one byte preamble field followed by a 16 bit day counter since the CCSDS
//! epoch (1958-01-01) and a 32 bit millisecond of day counter.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PusError, PusResult};

/// Seconds between the CCSDS epoch and the Unix epoch
pub const CDS_EPOCH_DELTA_SECS: i64 = 378_691_200;

const MS_PER_DAY: i64 = 86_400_000;

/// Preamble field: CDS time code, CCSDS epoch, 16 bit days, no submillisecond field
const P_FIELD_CDS_SHORT: u8 = 0b0100_0000;

/// CDS short timestamp with millisecond resolution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CdsShortTime {
    days: u16,
    ms_of_day: u32,
}

impl CdsShortTime {
    /// Packed length including the preamble field
    pub const LEN: usize = 7;

    pub fn new(days: u16, ms_of_day: u32) -> Self {
        Self { days, ms_of_day }
    }

    pub fn from_datetime(time: &DateTime<Utc>) -> PusResult<Self> {
        let ms_since_epoch = time.timestamp_millis() + CDS_EPOCH_DELTA_SECS * 1000;
        if ms_since_epoch < 0 {
            return Err(PusError::InvalidTimestamp(format!(
                "{} is before the CCSDS epoch",
                time
            )));
        }
        let days = u16::try_from(ms_since_epoch / MS_PER_DAY).map_err(|_| {
            PusError::InvalidTimestamp(format!("{} overflows the CDS day counter", time))
        })?;
        Ok(Self {
            days,
            ms_of_day: (ms_since_epoch % MS_PER_DAY) as u32,
        })
    }

    pub fn days(&self) -> u16 {
        self.days
    }

    pub fn ms_of_day(&self) -> u32 {
        self.ms_of_day
    }

    pub fn to_datetime(&self) -> PusResult<DateTime<Utc>> {
        let ms_since_epoch = self.days as i64 * MS_PER_DAY + self.ms_of_day as i64;
        Utc.timestamp_millis_opt(ms_since_epoch - CDS_EPOCH_DELTA_SECS * 1000)
            .single()
            .ok_or_else(|| PusError::InvalidTimestamp(format!("{:?}", self)))
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        buf[0] = P_FIELD_CDS_SHORT;
        buf[1..3].copy_from_slice(&self.days.to_be_bytes());
        buf[3..7].copy_from_slice(&self.ms_of_day.to_be_bytes());
        buf
    }

    pub fn from_bytes(data: &[u8]) -> PusResult<Self> {
        if data.len() < Self::LEN {
            return Err(PusError::RawDataTooShort {
                expected: Self::LEN,
                found: data.len(),
            });
        }
        if data[0] != P_FIELD_CDS_SHORT {
            return Err(PusError::InvalidTimestamp(format!(
                "unexpected preamble field {:#04x}",
                data[0]
            )));
        }
        let ms_of_day = u32::from_be_bytes([data[3], data[4], data[5], data[6]]);
        if ms_of_day as i64 >= MS_PER_DAY {
            return Err(PusError::InvalidTimestamp(format!(
                "millisecond of day {} out of range",
                ms_of_day
            )));
        }
        Ok(Self {
            days: u16::from_be_bytes([data[1], data[2]]),
            ms_of_day,
        })
    }
}
