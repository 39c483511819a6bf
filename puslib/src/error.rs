//! Error definitions for command resolution and encoding

use puslibgs::PusError;
use thiserror::Error;

/// PUSCmd error types
///
/// Every variant aborts only the dispatch that raised it. None of them leave
/// the command tree in a modified state.
#[derive(Error, Debug)]
pub enum CmdError {
    #[error("Empty command path")]
    EmptyPath,

    /// `depth` is the 0-based index of the segment within the path, so a
    /// first level node, which [`CommandNode::walk`](crate::tree::CommandNode::walk)
    /// yields at depth 1, is reported at depth 0.
    #[error("Unknown path segment '{segment}' at depth {depth}")]
    UnknownSegment { segment: String, depth: usize },

    #[error("Incomplete path {path}, expected one of: {}", .expected.join(", "))]
    IncompletePath { path: String, expected: Vec<String> },

    #[error("No command attached to {0}")]
    UnsupportedLeaf(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("PUS error: {0}")]
    Pus(#[from] PusError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for PUSCmd operations
pub type CmdResult<T> = Result<T, CmdError>;
