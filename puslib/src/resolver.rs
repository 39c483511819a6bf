//! Path resolution
//!
//! Command paths address nodes of the command tree with `/` separated
//! segments, e.g. `/acs/mgms/mode/set_mode/on`. Resolution never modifies
//! the tree.

use log::warn;
use puslibgs::Target;

use crate::error::{CmdError, CmdResult};
use crate::tree::CommandNode;

/// Split a command path into its segments.
///
/// Paths are expected to start with `/`, so the empty segment left of it is
/// dropped, as is the empty segment produced by a trailing `/`.
pub fn split_path(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').collect();
    if segments.first() == Some(&"") {
        segments.remove(0);
    }
    if segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}

/// A path matched against the command tree: the segments and the node each
/// of them selected, root excluded
#[derive(Debug, Clone)]
pub struct ResolvedPath<'a> {
    segments: Vec<String>,
    nodes: Vec<&'a CommandNode>,
}

impl<'a> ResolvedPath<'a> {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn nodes(&self) -> &[&'a CommandNode] {
        &self.nodes
    }

    /// Number of matched segments
    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    /// The node the path ends at
    pub fn leaf(&self) -> &'a CommandNode {
        // A ResolvedPath is only built from at least one matched segment
        self.nodes[self.nodes.len() - 1]
    }

    /// The target set closest to the leaf, if any
    pub fn target(&self) -> Option<&'a Target> {
        self.nodes.iter().rev().find_map(|node| node.target())
    }

    /// Canonical form of the path, `/a/b/c`
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Follow `segments` from `tree` for as long as they match, returning the
/// nodes selected on the way
fn match_segments<'a>(tree: &'a CommandNode, segments: &[&str]) -> Vec<&'a CommandNode> {
    let mut nodes = Vec::with_capacity(segments.len());
    let mut node = tree;
    for segment in segments {
        match node.child(segment) {
            Some(child) => {
                nodes.push(child);
                node = child;
            }
            None => break,
        }
    }
    nodes
}

fn split_non_empty(path: &str) -> CmdResult<Vec<&str>> {
    let segments = split_path(path);
    if segments.is_empty() {
        warn!("empty command path");
        return Err(CmdError::EmptyPath);
    }
    Ok(segments)
}

/// Resolve `path` against `tree`.
///
/// Every segment must name a child of the node selected by the previous
/// segment. The first one which does not fails with
/// [`CmdError::UnknownSegment`], reporting its 0-based index as the depth.
pub fn resolve<'a>(tree: &'a CommandNode, path: &str) -> CmdResult<ResolvedPath<'a>> {
    let segments = split_non_empty(path)?;
    let nodes = match_segments(tree, &segments);
    let matched = nodes.len();
    if matched < segments.len() {
        return Err(CmdError::UnknownSegment {
            segment: segments[matched].to_string(),
            depth: matched,
        });
    }
    Ok(ResolvedPath {
        segments: segments.iter().map(|s| s.to_string()).collect(),
        nodes,
    })
}

/// Resolve the longest prefix of `path` present in `tree`, returning it
/// together with the segments which could not be matched. Fails with
/// [`CmdError::UnknownSegment`] only if not even the first segment matches.
pub fn resolve_prefix<'a>(
    tree: &'a CommandNode,
    path: &str,
) -> CmdResult<(ResolvedPath<'a>, Vec<String>)> {
    let segments = split_non_empty(path)?;
    let nodes = match_segments(tree, &segments);
    let matched = nodes.len();
    if matched == 0 {
        return Err(CmdError::UnknownSegment {
            segment: segments[0].to_string(),
            depth: 0,
        });
    }
    let resolved = ResolvedPath {
        segments: segments[..matched].iter().map(|s| s.to_string()).collect(),
        nodes,
    };
    let rest = segments[matched..].iter().map(|s| s.to_string()).collect();
    Ok((resolved, rest))
}
