//! PUSCmd Ground Software Library (puslib)
//!
//! This library maps operator command paths such as
//! `/acs/mgms/mode/set_mode/on` onto PUS telecommands. Each node of the
//! command tree carries the command it stands for, so help output and
//! dispatching share a single definition.

pub mod config;
pub mod dispatch;
pub mod emitter;
pub mod encoder;
pub mod error;
pub mod resolver;
pub mod tree;

pub use config::*;
pub use dispatch::*;
pub use emitter::*;
pub use encoder::*;
pub use error::*;
pub use resolver::*;
pub use tree::*;
pub use puslibgs::*;
