//! Queue emitter
//!
//! The dispatcher hands log messages and telecommands to a queue, which is
//! drained later by whatever transport the ground station uses.

use puslibgs::{EncodedTelecommand, PusTcPacket, MAX_SEQ_COUNT};
use serde::{Deserialize, Serialize};

use crate::error::CmdResult;

/// Sink for dispatched commands. Entries must be kept in submission order.
pub trait QueueEmitter {
    /// Queue a message for the operator
    fn add_log_cmd(&mut self, message: &str);

    /// Queue a telecommand for transmission
    fn add_pus_tc(&mut self, tc: EncodedTelecommand);
}

/// One queued item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueueEntry {
    Log(String),
    PusTc(EncodedTelecommand),
}

/// In-memory queue which packs telecommands with consecutive sequence counts
#[derive(Debug, Clone, Default)]
pub struct DefaultQueueHelper {
    entries: Vec<QueueEntry>,
    seq_count: u16,
    source_id: u16,
}

impl DefaultQueueHelper {
    pub fn new(source_id: u16) -> Self {
        Self {
            entries: Vec::new(),
            seq_count: 0,
            source_id,
        }
    }

    /// Start numbering packets at `seq_count`
    pub fn with_seq_count(mut self, seq_count: u16) -> Self {
        self.seq_count = seq_count & MAX_SEQ_COUNT;
        self
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued telecommands in submission order
    pub fn telecommands(&self) -> impl Iterator<Item = &EncodedTelecommand> {
        self.entries.iter().filter_map(|entry| match entry {
            QueueEntry::PusTc(tc) => Some(tc),
            QueueEntry::Log(_) => None,
        })
    }

    /// Pack all queued telecommands into raw packets. Sequence counts start
    /// at the configured value and wrap at 14 bits.
    pub fn packed(&self) -> CmdResult<Vec<Vec<u8>>> {
        let mut seq_count = self.seq_count;
        let mut packets = Vec::new();
        for tc in self.telecommands() {
            let packet = PusTcPacket::new(tc.clone(), seq_count, self.source_id);
            packets.push(packet.to_bytes()?);
            seq_count = (seq_count + 1) & MAX_SEQ_COUNT;
        }
        Ok(packets)
    }

    /// Remove and return everything queued so far
    pub fn drain(&mut self) -> Vec<QueueEntry> {
        std::mem::take(&mut self.entries)
    }
}

impl QueueEmitter for DefaultQueueHelper {
    fn add_log_cmd(&mut self, message: &str) {
        self.entries.push(QueueEntry::Log(message.to_string()));
    }

    fn add_pus_tc(&mut self, tc: EncodedTelecommand) {
        self.entries.push(QueueEntry::PusTc(tc));
    }
}
