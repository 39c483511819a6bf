//! Command encoding
//!
//! Turns a resolved command path into a telecommand plus the log message
//! shown to the operator when it is queued.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use puslibgs::{
    Apid, CdsShortTime, EncodedTelecommand, ModeAndSubmode, ModeCommand, PusError, PusService,
    PusTcPacket, Target,
};

use crate::error::{CmdError, CmdResult};
use crate::resolver::ResolvedPath;

/// The command executed when a path ends at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Service 17 ping
    Ping,
    /// Service 17 event trigger
    TriggerEvent,
    /// Ping released by the on-board scheduler `offset` from now
    SchedulePing { offset: Duration },
    /// Service 200 mode command to the node's target
    SetMode(ModeAndSubmode),
    /// Service 200 mode read of the node's target
    ReadMode,
    /// One shot housekeeping request, not supported yet
    OneShotHk,
}

/// Source of the current time for time-tagged commands
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A telecommand together with its operator log message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCommand {
    pub log_message: String,
    pub tc: EncodedTelecommand,
}

impl EncodedCommand {
    fn new(log_message: impl Into<String>, tc: EncodedTelecommand) -> Self {
        Self {
            log_message: log_message.into(),
            tc,
        }
    }
}

fn require_target<'a>(resolved: &ResolvedPath<'a>) -> CmdResult<&'a Target> {
    resolved
        .target()
        .ok_or_else(|| CmdError::MissingArgument("target".to_string()))
}

/// Builds telecommands for the actions attached to command tree nodes
pub struct CommandEncoder<C: Clock> {
    generic_pus_apid: Apid,
    sched_apid: Apid,
    clock: C,
}

impl<C: Clock> CommandEncoder<C> {
    pub fn new(generic_pus_apid: Apid, sched_apid: Apid, clock: C) -> Self {
        Self {
            generic_pus_apid,
            sched_apid,
            clock,
        }
    }

    /// Encode the command a resolved path ends at
    pub fn encode(&self, resolved: &ResolvedPath<'_>) -> CmdResult<EncodedCommand> {
        let leaf = resolved.leaf();
        let action = match leaf.action() {
            Some(action) => *action,
            None => {
                if let Some(argument) = leaf.argument() {
                    return Err(CmdError::MissingArgument(argument.to_string()));
                }
                if !leaf.is_leaf() {
                    return Err(CmdError::IncompletePath {
                        path: resolved.path(),
                        expected: leaf.children().iter().map(|c| c.name().to_string()).collect(),
                    });
                }
                return Err(CmdError::UnsupportedLeaf(resolved.path()));
            }
        };

        debug!("encoding {:?} for {}", action, resolved.path());

        match action {
            Action::Ping => Ok(self.ping()),
            Action::TriggerEvent => Ok(self.trigger_event()),
            Action::SchedulePing { offset } => self.scheduled_ping(offset),
            Action::SetMode(mode_submode) => Ok(self.set_mode(require_target(resolved)?, mode_submode)),
            Action::ReadMode => Ok(self.read_mode(require_target(resolved)?)),
            Action::OneShotHk => self.one_shot_hk_request(require_target(resolved)?),
        }
    }

    pub fn ping(&self) -> EncodedCommand {
        EncodedCommand::new(
            "Sending PUS ping telecommand",
            EncodedTelecommand::ping(self.generic_pus_apid),
        )
    }

    pub fn trigger_event(&self) -> EncodedCommand {
        EncodedCommand::new(
            "Triggering test event",
            EncodedTelecommand::trigger_event(self.generic_pus_apid),
        )
    }

    /// Wrap a ping into a time-tagged command released `offset` from now
    pub fn scheduled_ping(&self, offset: Duration) -> CmdResult<EncodedCommand> {
        let offset = chrono::Duration::from_std(offset)
            .map_err(|e| PusError::InvalidTimestamp(e.to_string()))?;
        let now = self.clock.now();
        let release = now.checked_add_signed(offset).ok_or_else(|| {
            PusError::InvalidTimestamp(format!("{} plus {:?} is out of range", now, offset))
        })?;
        let release_time = CdsShortTime::from_datetime(&release)?;
        let inner = PusTcPacket::new(EncodedTelecommand::ping(self.generic_pus_apid), 0, 0);
        let tc = EncodedTelecommand::time_tagged(self.sched_apid, &release_time, &inner.to_bytes()?);
        Ok(EncodedCommand::new("Sending PUS scheduled TC telecommand", tc))
    }

    pub fn set_mode(&self, target: &Target, mode_submode: ModeAndSubmode) -> EncodedCommand {
        EncodedCommand::new(
            format!("Sending Mode {} to {}", mode_submode.mode, target.name),
            ModeCommand::new(target.unique_id, mode_submode).to_telecommand(target.apid),
        )
    }

    pub fn read_mode(&self, target: &Target) -> EncodedCommand {
        EncodedCommand::new(
            format!("Reading mode of {}", target.name),
            EncodedTelecommand::read_mode(target.apid, target.unique_id),
        )
    }

    // TODO: pack the service 3 one shot report request once the flight side
    // housekeeping service exposes the MGM set id
    pub fn one_shot_hk_request(&self, target: &Target) -> CmdResult<EncodedCommand> {
        Err(CmdError::NotImplemented(format!(
            "service {} one shot HK request for {}",
            PusService::Housekeeping.to_u8(),
            target.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use puslibgs::{Mode, UniqueId};

    use crate::resolver::resolve;
    use crate::tree::CommandNode;

    fn tree() -> CommandNode {
        let mut root = CommandNode::root();
        let test = root.add_child(CommandNode::new("test", "")).unwrap();
        test.add_child(CommandNode::new("ping", "").with_action(Action::Ping)).unwrap();
        test.add_child(CommandNode::new("trigger_event", "").with_action(Action::TriggerEvent))
            .unwrap();
        test.add_child(CommandNode::new("dangling", "")).unwrap();
        root.add_child(CommandNode::new("sched", "").with_action(Action::SchedulePing {
            offset: Duration::from_secs(10),
        }))
        .unwrap();
        root.add_child(CommandNode::new("orphan_mode", "").with_action(Action::ReadMode))
            .unwrap();
        let dev = root
            .add_child(
                CommandNode::new("dev", "")
                    .with_target(Target::new("DEV 7", Apid(3), UniqueId(7))),
            )
            .unwrap();
        let set = dev
            .add_child(CommandNode::new("set_mode", "").with_argument("mode"))
            .unwrap();
        set.add_child(CommandNode::new("on", "").with_action(Action::SetMode(
            ModeAndSubmode::new_mode_only(Mode::On),
        )))
        .unwrap();
        dev.add_child(CommandNode::new("read_mode", "").with_action(Action::ReadMode))
            .unwrap();
        dev.add_child(CommandNode::new("hk", "").with_action(Action::OneShotHk))
            .unwrap();
        root
    }

    fn encoder_at(time: DateTime<Utc>) -> CommandEncoder<FixedClock> {
        CommandEncoder::new(Apid(2), Apid(1), FixedClock(time))
    }

    fn encode(path: &str) -> CmdResult<EncodedCommand> {
        let tree = tree();
        let resolved = resolve(&tree, path)?;
        encoder_at(Utc::now()).encode(&resolved)
    }

    #[test]
    fn test_ping_and_event() {
        let cmd = encode("/test/ping").unwrap();
        assert_eq!(cmd.tc, EncodedTelecommand::new(17, 1, Apid(2), Vec::new()));
        assert_eq!(cmd.log_message, "Sending PUS ping telecommand");

        let cmd = encode("/test/trigger_event").unwrap();
        assert_eq!(cmd.tc, EncodedTelecommand::new(17, 128, Apid(2), Vec::new()));
        assert_eq!(cmd.log_message, "Triggering test event");
    }

    #[test]
    fn test_set_mode() {
        let cmd = encode("/dev/set_mode/on").unwrap();
        assert_eq!(cmd.tc.service, 200);
        assert_eq!(cmd.tc.subservice, 1);
        assert_eq!(cmd.tc.apid, Apid(3));
        assert_eq!(cmd.tc.app_data, vec![0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(cmd.log_message, "Sending Mode ON to DEV 7");
    }

    #[test]
    fn test_read_mode() {
        let cmd = encode("/dev/read_mode").unwrap();
        assert_eq!((cmd.tc.service, cmd.tc.subservice), (200, 3));
        assert_eq!(cmd.tc.app_data, vec![0, 0, 0, 7]);
    }

    #[test]
    fn test_scheduled_ping() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 55).unwrap();
        let tree = tree();
        let resolved = resolve(&tree, "/sched").unwrap();
        let cmd = encoder_at(now).encode(&resolved).unwrap();

        assert_eq!((cmd.tc.service, cmd.tc.subservice), (11, 4));
        assert_eq!(cmd.tc.apid, Apid(1));
        let release = CdsShortTime::from_bytes(&cmd.tc.app_data).unwrap();
        assert_eq!(
            release.to_datetime().unwrap(),
            now + chrono::Duration::seconds(10)
        );

        let (inner, consumed) = PusTcPacket::from_bytes(&cmd.tc.app_data[CdsShortTime::LEN..]).unwrap();
        assert_eq!(consumed, cmd.tc.app_data.len() - CdsShortTime::LEN);
        assert_eq!(inner.tc, EncodedTelecommand::ping(Apid(2)));
    }

    #[test]
    fn test_scheduled_ping_offset_out_of_range() {
        let encoder = encoder_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        // Beyond the chrono date range, and beyond the duration range
        for secs in [10_000_000_000_000, 100_000_000_000_000_000] {
            assert!(matches!(
                encoder.scheduled_ping(Duration::from_secs(secs)),
                Err(CmdError::Pus(PusError::InvalidTimestamp(_)))
            ));
        }
        // Representable, but past the 16 bit CDS day counter
        assert!(matches!(
            encoder.scheduled_ping(Duration::from_secs(100_000 * 86_400)),
            Err(CmdError::Pus(PusError::InvalidTimestamp(_)))
        ));
    }

    #[test]
    fn test_missing_argument() {
        match encode("/dev/set_mode") {
            Err(CmdError::MissingArgument(arg)) => assert_eq!(arg, "mode"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_missing_target() {
        match encode("/orphan_mode") {
            Err(CmdError::MissingArgument(arg)) => assert_eq!(arg, "target"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_path() {
        match encode("/test") {
            Err(CmdError::IncompletePath { path, expected }) => {
                assert_eq!(path, "/test");
                assert_eq!(expected, vec!["ping", "trigger_event", "dangling"]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_leaf() {
        match encode("/test/dangling") {
            Err(CmdError::UnsupportedLeaf(path)) => assert_eq!(path, "/test/dangling"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_one_shot_hk_not_implemented() {
        assert!(matches!(encode("/dev/hk"), Err(CmdError::NotImplemented(_))));
    }
}
