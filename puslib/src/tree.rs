//! Command tree
//!
//! An ordered hierarchy of named command nodes. Commands are attached to the
//! nodes themselves, so the tree used for help output and the tree used for
//! dispatching can never disagree.

use puslibgs::Target;

use crate::encoder::Action;
use crate::error::{CmdError, CmdResult};
use crate::resolver::split_path;

/// A node of the command tree
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    name: String,
    description: String,
    children: Vec<CommandNode>,
    hide_children_for_print: bool,
    hide_children_which_are_leaves: bool,
    action: Option<Action>,
    target: Option<Target>,
    argument: Option<String>,
}

impl CommandNode {
    /// Create an empty root node
    pub fn root() -> Self {
        Self::new("", "")
    }

    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            children: Vec::new(),
            hide_children_for_print: false,
            hide_children_which_are_leaves: false,
            action: None,
            target: None,
            argument: None,
        }
    }

    /// Do not list the children of this node in tree output
    pub fn hide_children_for_print(mut self) -> Self {
        self.hide_children_for_print = true;
        self
    }

    /// Only list the children of this node which have children themselves
    pub fn hide_children_which_are_leaves(mut self) -> Self {
        self.hide_children_which_are_leaves = true;
        self
    }

    /// Attach the command executed when a path ends at this node
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Address all commands below this node to `target`
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    /// Mark the children of this node as the values of a required argument
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Append a child, returning a reference to it. The node is left
    /// untouched if a child with the same name already exists.
    pub fn add_child(&mut self, child: CommandNode) -> CmdResult<&mut CommandNode> {
        if self.child(&child.name).is_some() {
            return Err(CmdError::DuplicateIdentifier(child.name));
        }
        self.children.push(child);
        let last = self.children.len() - 1;
        Ok(&mut self.children[last])
    }

    /// Builder form of [`add_child`](Self::add_child)
    pub fn with_child(mut self, child: CommandNode) -> CmdResult<Self> {
        self.add_child(child)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Depth first, pre-order traversal yielding each node with its depth.
    /// The node itself is yielded first at depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Check whether `path` names a node of this tree
    pub fn contains_path(&self, path: &str) -> bool {
        let segments = split_path(path);
        if segments.is_empty() {
            return false;
        }
        let mut node = self;
        for segment in segments {
            match node.child(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        true
    }

    /// Render the tree for operator help output, honouring the print hints.
    /// Hidden children are summarised by a single `...` entry.
    pub fn str_for_tree(&self, with_description: bool, max_depth: Option<usize>) -> String {
        let mut out = String::from("/");
        if with_description && !self.description.is_empty() {
            out.push_str(&format!(" [ {} ]", self.description));
        }
        out.push('\n');
        self.render_children(&mut out, "", with_description, 1, max_depth);
        out
    }

    fn printable_children(&self, depth: usize, max_depth: Option<usize>) -> (Vec<&CommandNode>, bool) {
        if self.children.is_empty() {
            return (Vec::new(), false);
        }
        if self.hide_children_for_print || max_depth.is_some_and(|max| depth > max) {
            return (Vec::new(), true);
        }
        if self.hide_children_which_are_leaves {
            let shown: Vec<&CommandNode> = self.children.iter().filter(|c| !c.is_leaf()).collect();
            let hidden = shown.len() < self.children.len();
            return (shown, hidden);
        }
        (self.children.iter().collect(), false)
    }

    fn render_children(
        &self,
        out: &mut String,
        prefix: &str,
        with_description: bool,
        depth: usize,
        max_depth: Option<usize>,
    ) {
        let (shown, hidden) = self.printable_children(depth, max_depth);
        let total = shown.len() + usize::from(hidden);
        for (idx, child) in shown.iter().enumerate() {
            let last = idx + 1 == total;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&child.name);
            if with_description && !child.description.is_empty() {
                out.push_str(&format!(" [ {} ]", child.description));
            }
            out.push('\n');
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            child.render_children(out, &child_prefix, with_description, depth + 1, max_depth);
        }
        if hidden {
            out.push_str(prefix);
            out.push_str("└── ...\n");
        }
    }
}

/// Iterator returned by [`CommandNode::walk`]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a CommandNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a CommandNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> CommandNode {
        let mut root = CommandNode::root();
        let test = root
            .add_child(CommandNode::new("test", "Test Node"))
            .unwrap();
        test.add_child(CommandNode::new("ping", "Send ping").with_action(Action::Ping))
            .unwrap();
        test.add_child(CommandNode::new("event", "Trigger event").with_action(Action::TriggerEvent))
            .unwrap();
        let dev = root.add_child(CommandNode::new("dev", "Device")).unwrap();
        let mode = dev
            .add_child(CommandNode::new("mode", "Mode Node").hide_children_for_print())
            .unwrap();
        mode.add_child(CommandNode::new("read", "Read")).unwrap();
        root
    }

    #[test]
    fn test_root_node() {
        let root = CommandNode::root();
        assert_eq!(root.name(), "");
        assert!(root.is_leaf());
    }

    #[test]
    fn test_insertion_order() {
        let root = sample_tree();
        let names: Vec<&str> = root.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["test", "dev"]);
        let test = root.child("test").unwrap();
        let names: Vec<&str> = test.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["ping", "event"]);
    }

    #[test]
    fn test_duplicate_identifier() {
        let mut root = sample_tree();
        let before = root.clone();
        let result = root.add_child(CommandNode::new("test", "Another test node"));
        assert!(matches!(result, Err(CmdError::DuplicateIdentifier(ref name)) if name == "test"));
        assert_eq!(root, before);
    }

    #[test]
    fn test_same_name_under_different_parents() {
        let mut root = CommandNode::root();
        root.add_child(CommandNode::new("a", "")).unwrap()
            .add_child(CommandNode::new("x", "")).unwrap();
        root.add_child(CommandNode::new("b", "")).unwrap()
            .add_child(CommandNode::new("x", "")).unwrap();
        assert!(root.contains_path("/a/x"));
        assert!(root.contains_path("/b/x"));
    }

    #[test]
    fn test_walk_pre_order() {
        let root = sample_tree();
        let visited: Vec<(usize, &str)> = root.walk().map(|(d, n)| (d, n.name())).collect();
        assert_eq!(
            visited,
            vec![
                (0, ""),
                (1, "test"),
                (2, "ping"),
                (2, "event"),
                (1, "dev"),
                (2, "mode"),
                (3, "read"),
            ]
        );
    }

    #[test]
    fn test_contains_path() {
        let root = sample_tree();
        assert!(root.contains_path("/test/ping"));
        assert!(root.contains_path("/dev/mode/"));
        assert!(!root.contains_path("/test/pong"));
        assert!(!root.contains_path("/"));
    }

    fn lines(lines: &[&str]) -> String {
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    #[test]
    fn test_str_for_tree() {
        let root = sample_tree();
        let expected = lines(&[
            "/",
            "├── test [ Test Node ]",
            "│   ├── ping [ Send ping ]",
            "│   └── event [ Trigger event ]",
            "└── dev [ Device ]",
            "    └── mode [ Mode Node ]",
            "        └── ...",
        ]);
        assert_eq!(root.str_for_tree(true, None), expected);
    }

    #[test]
    fn test_str_for_tree_hides_leaves() {
        let mut root = CommandNode::root();
        let set = root
            .add_child(CommandNode::new("set", "").hide_children_which_are_leaves())
            .unwrap();
        set.add_child(CommandNode::new("on", "")).unwrap();
        set.add_child(CommandNode::new("sub", "")).unwrap()
            .add_child(CommandNode::new("x", "")).unwrap();
        let expected = lines(&[
            "/",
            "└── set",
            "    ├── sub",
            "    │   └── x",
            "    └── ...",
        ]);
        assert_eq!(root.str_for_tree(false, None), expected);
    }

    #[test]
    fn test_str_for_tree_max_depth() {
        let root = sample_tree();
        let expected = lines(&[
            "/",
            "├── test",
            "│   └── ...",
            "└── dev",
            "    └── ...",
        ]);
        assert_eq!(root.str_for_tree(false, Some(1)), expected);
    }
}
