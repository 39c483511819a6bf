//! Telecommand definitions for PUSCmd
//!
//! Service and subservice numbers follow the flight software's PUS service
//! contract and must not be changed independently of it.

use serde::{Deserialize, Serialize};

use crate::time::CdsShortTime;
use crate::types::{Apid, ModeAndSubmode, UniqueId};

/// PUS services used by the ground station
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PusService {
    Housekeeping,
    Scheduling,
    Test,
    Mode,
}

impl PusService {
    pub fn to_u8(&self) -> u8 {
        match self {
            PusService::Housekeeping => 3,
            PusService::Scheduling => 11,
            PusService::Test => 17,
            PusService::Mode => 200,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            3 => Some(PusService::Housekeeping),
            11 => Some(PusService::Scheduling),
            17 => Some(PusService::Test),
            200 => Some(PusService::Mode),
            _ => None,
        }
    }
}

/// Service 17 subservices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TestSubservice {
    Ping,
    TriggerEvent,
}

impl TestSubservice {
    pub fn to_u8(&self) -> u8 {
        match self {
            TestSubservice::Ping => 1,
            TestSubservice::TriggerEvent => 128,
        }
    }
}

/// Service 200 subservices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModeSubservice {
    ModeCommand,
    ReadMode,
}

impl ModeSubservice {
    pub fn to_u8(&self) -> u8 {
        match self {
            ModeSubservice::ModeCommand => 1,
            ModeSubservice::ReadMode => 3,
        }
    }
}

/// Service 11 subservices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SchedSubservice {
    InsertActivity,
}

impl SchedSubservice {
    pub fn to_u8(&self) -> u8 {
        match self {
            SchedSubservice::InsertActivity => 4,
        }
    }
}

/// A telecommand ready to be queued: addressing plus opaque application data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedTelecommand {
    pub service: u8,
    pub subservice: u8,
    pub apid: Apid,
    pub app_data: Vec<u8>,
}

impl EncodedTelecommand {
    pub fn new(service: u8, subservice: u8, apid: Apid, app_data: Vec<u8>) -> Self {
        Self {
            service,
            subservice,
            apid,
            app_data,
        }
    }

    /// PING - verify the target is able to process commands
    pub fn ping(apid: Apid) -> Self {
        Self::new(
            PusService::Test.to_u8(),
            TestSubservice::Ping.to_u8(),
            apid,
            Vec::new(),
        )
    }

    /// Ask the test service to generate a test event
    pub fn trigger_event(apid: Apid) -> Self {
        Self::new(
            PusService::Test.to_u8(),
            TestSubservice::TriggerEvent.to_u8(),
            apid,
            Vec::new(),
        )
    }

    /// Request the current mode of a device
    pub fn read_mode(apid: Apid, unique_id: UniqueId) -> Self {
        Self::new(
            PusService::Mode.to_u8(),
            ModeSubservice::ReadMode.to_u8(),
            apid,
            unique_id.to_be_bytes().to_vec(),
        )
    }

    /// Wrap an already packed telecommand for release at `release_time` by
    /// the on-board scheduler
    pub fn time_tagged(apid: Apid, release_time: &CdsShortTime, raw_tc: &[u8]) -> Self {
        let mut app_data = Vec::with_capacity(CdsShortTime::LEN + raw_tc.len());
        app_data.extend_from_slice(&release_time.to_bytes());
        app_data.extend_from_slice(raw_tc);
        Self::new(
            PusService::Scheduling.to_u8(),
            SchedSubservice::InsertActivity.to_u8(),
            apid,
            app_data,
        )
    }

    pub fn service_kind(&self) -> Option<PusService> {
        PusService::from_u8(self.service)
    }
}

/// SET_MODE command payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModeCommand {
    pub unique_id: UniqueId,
    pub mode_submode: ModeAndSubmode,
}

impl ModeCommand {
    /// Length of the application data: unique id, mode and submode
    pub const APP_DATA_LEN: usize = 4 + ModeAndSubmode::raw_len();

    pub const fn new(unique_id: UniqueId, mode_submode: ModeAndSubmode) -> Self {
        Self {
            unique_id,
            mode_submode,
        }
    }

    /// Network byte order: unique id (u32), mode (u32), submode (u16)
    pub fn app_data(&self) -> Vec<u8> {
        let mut app_data = Vec::with_capacity(Self::APP_DATA_LEN);
        app_data.extend_from_slice(&self.unique_id.to_be_bytes());
        app_data.extend_from_slice(&self.mode_submode.to_be_bytes());
        app_data
    }

    pub fn to_telecommand(&self, apid: Apid) -> EncodedTelecommand {
        EncodedTelecommand::new(
            PusService::Mode.to_u8(),
            ModeSubservice::ModeCommand.to_u8(),
            apid,
            self.app_data(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    #[test]
    fn test_service_conversion() {
        assert_eq!(PusService::Mode.to_u8(), 200);
        assert_eq!(PusService::from_u8(17), Some(PusService::Test));
        assert_eq!(PusService::from_u8(99), None);
    }

    #[test]
    fn test_ping_and_event() {
        let ping = EncodedTelecommand::ping(Apid(2));
        assert_eq!((ping.service, ping.subservice), (17, 1));
        assert!(ping.app_data.is_empty());

        let event = EncodedTelecommand::trigger_event(Apid(2));
        assert_eq!((event.service, event.subservice), (17, 128));
        assert!(event.app_data.is_empty());
    }

    #[test]
    fn test_set_mode_app_data() {
        let cmd = ModeCommand::new(UniqueId(7), ModeAndSubmode::new_mode_only(Mode::On));
        let tc = cmd.to_telecommand(Apid(3));
        assert_eq!(tc.service, 200);
        assert_eq!(tc.subservice, 1);
        assert_eq!(tc.apid, Apid(3));
        assert_eq!(tc.app_data, vec![0, 0, 0, 7, 0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_set_mode_big_endian_fields() {
        let cmd = ModeCommand::new(
            UniqueId(0x0A0B0C0D),
            ModeAndSubmode::new(Mode::Normal, 0xBEEF),
        );
        assert_eq!(
            cmd.app_data(),
            vec![0x0A, 0x0B, 0x0C, 0x0D, 0, 0, 0, 2, 0xBE, 0xEF]
        );
    }

    #[test]
    fn test_read_mode() {
        let tc = EncodedTelecommand::read_mode(Apid(3), UniqueId(0x11223344));
        assert_eq!((tc.service, tc.subservice), (200, 3));
        assert_eq!(tc.app_data, vec![0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_telecommand_serialization() {
        let tc = EncodedTelecommand::trigger_event(Apid(2));
        let json = serde_json::to_string(&tc).unwrap();
        let deserialized: EncodedTelecommand = serde_json::from_str(&json).unwrap();
        assert_eq!(tc, deserialized);
    }
}
