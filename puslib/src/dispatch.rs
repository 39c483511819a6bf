//! Command dispatch
//!
//! Resolves an operator command path, encodes the command attached to it and
//! queues the log message followed by the telecommand.

use log::{debug, warn};
use puslibgs::{Mode, ModeAndSubmode, Target};

use crate::config::ClientConfig;
use crate::emitter::QueueEmitter;
use crate::encoder::{Action, Clock, CommandEncoder, SystemClock};
use crate::error::{CmdError, CmdResult};
use crate::resolver::resolve_prefix;
use crate::tree::CommandNode;

/// Build the ground station command tree
pub fn build_command_tree(config: &ClientConfig) -> CmdResult<CommandNode> {
    let mut root = CommandNode::root();

    let mut hk_node = CommandNode::new("hk", "Housekeeping Node").hide_children_for_print();
    hk_node.add_child(
        CommandNode::new("one_shot_hk", "Request One Shot HK set").with_action(Action::OneShotHk),
    )?;
    hk_node.add_child(CommandNode::new(
        "enable",
        "Enable periodic housekeeping data generation",
    ))?;
    hk_node.add_child(CommandNode::new(
        "disable",
        "Disable periodic housekeeping data generation",
    ))?;

    let mut mode_node = CommandNode::new("mode", "Mode Node").hide_children_for_print();
    let mut set_mode_node = CommandNode::new("set_mode", "Set Node")
        .hide_children_which_are_leaves()
        .with_argument("mode");
    for mode in [Mode::Off, Mode::On, Mode::Normal] {
        set_mode_node.add_child(
            CommandNode::new(mode.selector(), format!("Set {} Mode", mode))
                .with_action(Action::SetMode(ModeAndSubmode::new_mode_only(mode))),
        )?;
    }
    mode_node.add_child(set_mode_node)?;
    mode_node.add_child(CommandNode::new("read_mode", "Read Mode").with_action(Action::ReadMode))?;

    let test_node = CommandNode::new("test", "Test Node")
        .with_child(CommandNode::new("ping", "Send PUS ping TC").with_action(Action::Ping))?
        .with_child(
            CommandNode::new("trigger_event", "Send PUS test to trigger event")
                .with_action(Action::TriggerEvent),
        )?;
    root.add_child(test_node)?;

    let offset = config.schedule_offset();
    let scheduler_node = CommandNode::new("scheduler", "Scheduler Node").with_child(
        CommandNode::new(
            "schedule_ping_10_secs_ahead",
            format!("Schedule Ping to execute in {} seconds", offset.as_secs()),
        )
        .with_action(Action::SchedulePing { offset }),
    )?;
    root.add_child(scheduler_node)?;

    let mgm_node = CommandNode::new("mgms", "MGM devices node")
        .with_target(Target::new("MGM 0", config.apid.acs, config.mgm_0_unique_id))
        .with_child(mode_node)?
        .with_child(hk_node)?;
    let acs_node = CommandNode::new("acs", "ACS Subsystem Node")
        .with_argument("target")
        .with_child(mgm_node)?;
    root.add_child(acs_node)?;

    Ok(root)
}

/// Turns command paths into queued telecommands
///
/// The command tree is never modified after construction, so a dispatcher
/// can be shared by reference between callers.
pub struct Dispatcher<C: Clock = SystemClock> {
    tree: CommandNode,
    encoder: CommandEncoder<C>,
}

impl Dispatcher<SystemClock> {
    /// Dispatcher using the standard command tree and the wall clock
    pub fn from_config(config: &ClientConfig) -> CmdResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(tree: CommandNode, encoder: CommandEncoder<C>) -> Self {
        Self { tree, encoder }
    }

    pub fn with_clock(config: &ClientConfig, clock: C) -> CmdResult<Self> {
        config.validate()?;
        let tree = build_command_tree(config)?;
        let encoder = CommandEncoder::new(config.apid.generic_pus, config.apid.sched, clock);
        Ok(Self::new(tree, encoder))
    }

    pub fn tree(&self) -> &CommandNode {
        &self.tree
    }

    /// Queue the command addressed by `path`.
    ///
    /// On success the log message is queued first, then the telecommand. On
    /// failure nothing is queued. Segments following a leaf command are
    /// ignored.
    pub fn pack_pus_telecommands<Q: QueueEmitter + ?Sized>(
        &self,
        queue: &mut Q,
        path: &str,
    ) -> CmdResult<()> {
        let (resolved, rest) = resolve_prefix(&self.tree, path)?;
        if let Some(first) = rest.first() {
            let leaf = resolved.leaf();
            if leaf.action().is_none() || !leaf.is_leaf() {
                return Err(CmdError::UnknownSegment {
                    segment: first.clone(),
                    depth: resolved.depth(),
                });
            }
            warn!(
                "ignoring trailing segments {:?} after {}",
                rest,
                resolved.path()
            );
        }
        debug!("dispatching {}", resolved.path());

        let cmd = self.encoder.encode(&resolved)?;
        queue.add_log_cmd(&cmd.log_message);
        queue.add_pus_tc(cmd.tc);
        Ok(())
    }
}
