//! PUSCmd Ground/Space Library (puslibgs)
//!
//! This library contains definitions shared between the ground command
//! construction layer (puslib) and the flight software it talks to: PUS
//! service numbers, the mode enumeration, the telecommand wire format and
//! the CDS time code used for time-tagged commands.

pub mod types;
pub mod commands;
pub mod protocol;
pub mod time;
pub mod error;

pub use types::*;
pub use commands::*;
pub use protocol::*;
pub use time::*;
pub use error::*;
