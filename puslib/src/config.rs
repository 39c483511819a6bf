//! Configuration loading for the ground command client

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use puslibgs::{Apid, UniqueId, MAX_APID};
use serde::{Deserialize, Serialize};

use crate::error::{CmdError, CmdResult};

/// Configuration constants
pub mod constants {
    use std::time::Duration;

    /// APID of the on-board PUS scheduler
    pub const SCHED_APID: u16 = 1;

    /// APID of the generic PUS services (test service)
    pub const GENERIC_PUS_APID: u16 = 2;

    /// APID of the attitude control subsystem
    pub const ACS_APID: u16 = 3;

    /// Unique id of the first magnetometer within the ACS
    pub const MGM_0_UNIQUE_ID: u32 = 0;

    /// Release delay of the scheduled ping
    pub const SCHEDULE_OFFSET: Duration = Duration::from_secs(10);

    pub const DEFAULT_SOURCE_ID: u16 = 0;
}

/// Destination APIDs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApidConfig {
    pub sched: Apid,
    pub generic_pus: Apid,
    pub acs: Apid,
}

impl Default for ApidConfig {
    fn default() -> Self {
        Self {
            sched: Apid(constants::SCHED_APID),
            generic_pus: Apid(constants::GENERIC_PUS_APID),
            acs: Apid(constants::ACS_APID),
        }
    }
}

/// Client configuration file structure. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub apid: ApidConfig,
    pub mgm_0_unique_id: UniqueId,
    pub schedule_offset_secs: u64,
    pub source_id: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            apid: ApidConfig::default(),
            mgm_0_unique_id: UniqueId(constants::MGM_0_UNIQUE_ID),
            schedule_offset_secs: constants::SCHEDULE_OFFSET.as_secs(),
            source_id: constants::DEFAULT_SOURCE_ID,
        }
    }
}

impl ClientConfig {
    pub fn schedule_offset(&self) -> Duration {
        Duration::from_secs(self.schedule_offset_secs)
    }

    /// Check that all APIDs fit into a space packet header
    pub fn validate(&self) -> CmdResult<()> {
        let apids = [
            ("sched", self.apid.sched),
            ("generic_pus", self.apid.generic_pus),
            ("acs", self.apid.acs),
        ];
        for (name, apid) in apids {
            if apid.value() > MAX_APID {
                return Err(CmdError::Config(format!(
                    "apid.{} = {} exceeds {}",
                    name,
                    apid.value(),
                    MAX_APID
                )));
            }
        }
        Ok(())
    }
}

/// Load client configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> CmdResult<ClientConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: ClientConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
