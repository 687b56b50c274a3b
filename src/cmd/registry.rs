/*!
registry.rs - the static command tree.

Every command the CLI knows about is declared here as data. Internal nodes
group children; leaves carry the literal argument vector the dispatcher
will execute. Adding a command means adding a node below, nothing else.

Tree (current):
  kcompose
    topic
      list   -> TOPIC_LIST_BINDING
*/

/// Argument vector bound to `topic list`.
#[cfg(not(feature = "provisioning"))]
pub const TOPIC_LIST_BINDING: &[&str] = &["echo", "topic list executed"];

/// Argument vector bound to `topic list` (provisioning build).
#[cfg(feature = "provisioning")]
pub const TOPIC_LIST_BINDING: &[&str] = &[
    "kcompose",
    "topic",
    "create",
    "input",
    "--replication-factor",
    "1",
    "--partitions",
    "3",
];

/// One entry in the command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    pub name: &'static str,
    pub usage: &'static str,
    pub kind: NodeKind,
}

/// Internal group or leaf. A node is always exactly one of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Ordered, non-empty list of subcommands.
    Group(Vec<CommandNode>),
    /// Literal argument vector; element 0 is the program.
    Leaf(&'static [&'static str]),
}

impl CommandNode {
    pub fn group(name: &'static str, usage: &'static str, children: Vec<CommandNode>) -> Self {
        debug_assert!(!children.is_empty(), "group '{name}' has no children");
        Self {
            name,
            usage,
            kind: NodeKind::Group(children),
        }
    }

    pub fn leaf(name: &'static str, usage: &'static str, argv: &'static [&'static str]) -> Self {
        debug_assert!(!argv.is_empty(), "leaf '{name}' has an empty binding");
        Self {
            name,
            usage,
            kind: NodeKind::Leaf(argv),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Children of a group; empty for leaves.
    pub fn children(&self) -> &[CommandNode] {
        match &self.kind {
            NodeKind::Group(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    /// Bound argument vector of a leaf; `None` for groups.
    pub fn bound_args(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            NodeKind::Leaf(argv) => Some(argv),
            NodeKind::Group(_) => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children().iter().find(|c| c.name == name)
    }

    /// Walk the tree along `path` (names below this node).
    /// An empty path yields `self`; any unknown segment yields `None`.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        path.iter().try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    /// Every leaf below this node as `(path, bound argv)`, depth-first in
    /// declaration order.
    pub fn leaves(&self) -> Vec<(Vec<&'static str>, &'static [&'static str])> {
        let mut out = Vec::new();
        collect_leaves(self, &mut Vec::new(), &mut out);
        out
    }
}

fn collect_leaves(
    node: &CommandNode,
    prefix: &mut Vec<&'static str>,
    out: &mut Vec<(Vec<&'static str>, &'static [&'static str])>,
) {
    for child in node.children() {
        prefix.push(child.name);
        match child.kind {
            NodeKind::Leaf(argv) => out.push((prefix.clone(), argv)),
            NodeKind::Group(_) => collect_leaves(child, prefix, out),
        }
        prefix.pop();
    }
}

/* ---- Declarations ---- */

/// Build the root of the command tree.
pub fn build() -> CommandNode {
    CommandNode::group(
        "kcompose",
        "dispatch topic commands to external tools",
        vec![topic()],
    )
}

fn topic() -> CommandNode {
    CommandNode::group(
        "topic",
        "topic",
        vec![CommandNode::leaf("list", "list", TOPIC_LIST_BINDING)],
    )
}

/* ---- Tests ---- */
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_well_formed(node: &CommandNode) {
        match &node.kind {
            NodeKind::Group(children) => {
                assert!(!children.is_empty(), "group '{}' is empty", node.name);
                let names: HashSet<_> = children.iter().map(|c| c.name).collect();
                assert_eq!(
                    names.len(),
                    children.len(),
                    "duplicate sibling names under '{}'",
                    node.name
                );
                children.iter().for_each(assert_well_formed);
            }
            NodeKind::Leaf(argv) => {
                assert!(!argv.is_empty(), "leaf '{}' has no binding", node.name);
                assert!(!argv[0].is_empty(), "leaf '{}' has no program", node.name);
            }
        }
    }

    #[test]
    fn tree_is_well_formed() {
        assert_well_formed(&build());
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(build(), build());
    }

    #[test]
    fn find_topic_list() {
        let root = build();
        let list = root.find(&["topic", "list"]).unwrap();
        assert!(list.is_leaf());
        assert_eq!(list.bound_args(), Some(TOPIC_LIST_BINDING));
    }

    #[test]
    fn find_group_and_root() {
        let root = build();
        let topic = root.find(&["topic"]).unwrap();
        assert!(!topic.is_leaf());
        assert_eq!(topic.bound_args(), None);
        assert_eq!(root.find::<&str>(&[]).map(|n| n.name), Some("kcompose"));
    }

    #[test]
    fn find_unknown_segment() {
        let root = build();
        assert!(root.find(&["topic", "bogus"]).is_none());
        assert!(root.find(&["bogus"]).is_none());
        assert!(root.find(&["topic", "list", "deeper"]).is_none());
    }

    #[test]
    fn leaves_enumerates_paths() {
        let leaves = build().leaves();
        assert_eq!(leaves, vec![(vec!["topic", "list"], TOPIC_LIST_BINDING)]);
    }

    #[cfg(not(feature = "provisioning"))]
    #[test]
    fn default_binding_is_echo() {
        assert_eq!(TOPIC_LIST_BINDING, &["echo", "topic list executed"]);
    }

    #[cfg(feature = "provisioning")]
    #[test]
    fn provisioning_binding_tokens() {
        let expected =
            shell_words::split("kcompose topic create input --replication-factor 1 --partitions 3")
                .unwrap();
        assert_eq!(TOPIC_LIST_BINDING, expected.as_slice());
    }
}
