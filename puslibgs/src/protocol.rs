//! Protocol definitions for PUSCmd
//!
//! Telecommands are packed as CCSDS space packets carrying a PUS-C
//! telecommand secondary header, followed by the application data and a
//! CRC16-CCITT-FALSE over the whole packet.

use crc::{Crc, CRC_16_IBM_3740};
use serde::{Deserialize, Serialize};

use crate::commands::EncodedTelecommand;
use crate::error::{PusError, PusResult};
use crate::types::{Apid, MAX_APID};

/// Space packet primary header length
pub const CCSDS_HEADER_LEN: usize = 6;

/// PUS-C telecommand secondary header length
pub const PUS_TC_SEC_HEADER_LEN: usize = 5;

/// Smallest possible telecommand: headers plus CRC, no application data
pub const PUS_TC_MIN_LEN_WITHOUT_APP_DATA: usize = CCSDS_HEADER_LEN + PUS_TC_SEC_HEADER_LEN + 2;

/// Maximum packet length representable by the data length field
pub const MAX_PACKET_SIZE: usize = u16::MAX as usize + CCSDS_HEADER_LEN + 1;

/// Sequence counts wrap at 14 bits
pub const MAX_SEQ_COUNT: u16 = 0x3FFF;

/// Request acceptance, start, progress and completion reports
pub const ACK_ALL: u8 = 0b1111;

const PUS_VERSION_C: u8 = 2;
const SEQ_FLAGS_UNSEGMENTED: u16 = 0b11;

/// CRC-16/CCITT-FALSE
pub const CRC_CCITT_FALSE: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Space packet primary header of a telecommand
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpHeader {
    pub apid: Apid,
    pub seq_count: u16,
    /// Packet data length minus one
    pub data_len: u16,
}

impl SpHeader {
    /// Header for an unsegmented telecommand
    pub fn tc_unseg(apid: Apid, seq_count: u16, data_len: u16) -> Self {
        Self {
            apid,
            seq_count: seq_count & MAX_SEQ_COUNT,
            data_len,
        }
    }

    /// Total packet length described by this header
    pub fn total_len(&self) -> usize {
        CCSDS_HEADER_LEN + self.data_len as usize + 1
    }

    pub fn to_bytes(&self) -> PusResult<[u8; CCSDS_HEADER_LEN]> {
        if self.apid.value() > MAX_APID {
            return Err(PusError::InvalidApid(self.apid.value()));
        }
        // version 0, type TC, secondary header present
        let packet_id: u16 = (1 << 12) | (1 << 11) | self.apid.value();
        let psc: u16 = (SEQ_FLAGS_UNSEGMENTED << 14) | (self.seq_count & MAX_SEQ_COUNT);
        let mut buf = [0u8; CCSDS_HEADER_LEN];
        buf[0..2].copy_from_slice(&packet_id.to_be_bytes());
        buf[2..4].copy_from_slice(&psc.to_be_bytes());
        buf[4..6].copy_from_slice(&self.data_len.to_be_bytes());
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> PusResult<Self> {
        if data.len() < CCSDS_HEADER_LEN {
            return Err(PusError::RawDataTooShort {
                expected: CCSDS_HEADER_LEN,
                found: data.len(),
            });
        }
        let packet_id = u16::from_be_bytes([data[0], data[1]]);
        let ccsds_version = (packet_id >> 13) as u8;
        if ccsds_version != 0 {
            return Err(PusError::UnsupportedVersion(ccsds_version));
        }
        if packet_id & (1 << 12) == 0 {
            return Err(PusError::NotTelecommand);
        }
        let psc = u16::from_be_bytes([data[2], data[3]]);
        Ok(Self {
            apid: Apid(packet_id & MAX_APID),
            seq_count: psc & MAX_SEQ_COUNT,
            data_len: u16::from_be_bytes([data[4], data[5]]),
        })
    }
}

/// A telecommand together with the packet level fields needed to put it on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PusTcPacket {
    pub seq_count: u16,
    pub source_id: u16,
    pub ack: u8,
    pub tc: EncodedTelecommand,
}

impl PusTcPacket {
    pub fn new(tc: EncodedTelecommand, seq_count: u16, source_id: u16) -> Self {
        Self {
            seq_count: seq_count & MAX_SEQ_COUNT,
            source_id,
            ack: ACK_ALL,
            tc,
        }
    }

    pub fn len_packed(&self) -> usize {
        PUS_TC_MIN_LEN_WITHOUT_APP_DATA + self.tc.app_data.len()
    }

    /// Serialize the packet, filling in the data length field and the CRC
    pub fn to_bytes(&self) -> PusResult<Vec<u8>> {
        let total_len = self.len_packed();
        if total_len > MAX_PACKET_SIZE {
            return Err(PusError::PacketTooLarge(total_len));
        }
        let sp_header = SpHeader::tc_unseg(
            self.tc.apid,
            self.seq_count,
            (total_len - CCSDS_HEADER_LEN - 1) as u16,
        );

        let mut buf = Vec::with_capacity(total_len);
        buf.extend_from_slice(&sp_header.to_bytes()?);
        buf.push((PUS_VERSION_C << 4) | (self.ack & 0b1111));
        buf.push(self.tc.service);
        buf.push(self.tc.subservice);
        buf.extend_from_slice(&self.source_id.to_be_bytes());
        buf.extend_from_slice(&self.tc.app_data);
        let crc16 = CRC_CCITT_FALSE.checksum(&buf);
        buf.extend_from_slice(&crc16.to_be_bytes());
        Ok(buf)
    }

    /// Deserialize a packet from the start of `data`, returning it with the
    /// number of bytes consumed
    pub fn from_bytes(data: &[u8]) -> PusResult<(Self, usize)> {
        if data.len() < PUS_TC_MIN_LEN_WITHOUT_APP_DATA {
            return Err(PusError::RawDataTooShort {
                expected: PUS_TC_MIN_LEN_WITHOUT_APP_DATA,
                found: data.len(),
            });
        }
        let sp_header = SpHeader::from_bytes(data)?;
        let total_len = sp_header.total_len();
        if total_len < PUS_TC_MIN_LEN_WITHOUT_APP_DATA || data.len() < total_len {
            return Err(PusError::RawDataTooShort {
                expected: total_len.max(PUS_TC_MIN_LEN_WITHOUT_APP_DATA),
                found: data.len(),
            });
        }
        let raw = &data[..total_len];
        if CRC_CCITT_FALSE.checksum(raw) != 0 {
            let crc16 = u16::from_be_bytes([raw[total_len - 2], raw[total_len - 1]]);
            return Err(PusError::IncorrectCrc(crc16));
        }

        let sec_header = &raw[CCSDS_HEADER_LEN..CCSDS_HEADER_LEN + PUS_TC_SEC_HEADER_LEN];
        let pus_version = sec_header[0] >> 4;
        if pus_version != PUS_VERSION_C {
            return Err(PusError::UnsupportedVersion(pus_version));
        }
        let tc = EncodedTelecommand::new(
            sec_header[1],
            sec_header[2],
            sp_header.apid,
            raw[CCSDS_HEADER_LEN + PUS_TC_SEC_HEADER_LEN..total_len - 2].to_vec(),
        );
        Ok((
            Self {
                seq_count: sp_header.seq_count,
                source_id: u16::from_be_bytes([sec_header[3], sec_header[4]]),
                ack: sec_header[0] & 0b1111,
                tc,
            },
            total_len,
        ))
    }
}
