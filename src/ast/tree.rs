//! Arena-backed source tree with non-owning parent back-links.
//!
//! Ownership is strictly top-down: a node owns its children through the ids
//! embedded in its [`NodeKind`]. The parent link is an index set exactly once
//! when [`TreeBuilder::build`] seals the tree, and is only ever read upward.
//! Because linking walks down from the root and visits each node at most
//! once, the resulting parent chain is a forest: ascent from any node
//! terminates.

use super::node::NodeKind;

/// Handle to a node in a [`SourceTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    line: usize,
}

/// An immutable, parent-linked syntax tree for one source unit.
#[derive(Debug, Clone)]
pub struct SourceTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl SourceTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// 1-based source line of the node, 0 when unknown.
    pub fn line(&self, id: NodeId) -> usize {
        self.nodes[id.index()].line
    }

    /// All node ids in allocation order (children before their parents for
    /// builder-constructed trees, which makes iteration deterministic).
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// The chain of ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// The name of an identifier node, if `id` is one.
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Root of a member-access chain: follows `object` links until the
    /// expression is no longer a property access.
    pub fn leftmost_object(&self, id: NodeId) -> NodeId {
        match self.kind(id) {
            NodeKind::PropertyAccess { object, .. } => self.leftmost_object(*object),
            _ => id,
        }
    }

    /// Statement list of a node: `Program` and `Block` carry one, everything
    /// else answers empty.
    pub fn statements(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            NodeKind::Program { body } | NodeKind::Block { body } => body,
            _ => &[],
        }
    }

    /// Whether a binding pattern introduces the local name `name`.
    ///
    /// Plain identifiers match directly. Object patterns bind through their
    /// property values, so `{a: x}` binds `x` and not `a`; array patterns
    /// bind through elements; a rest element binds its argument. Nested
    /// patterns resolve recursively.
    pub fn binds_name(&self, pattern: NodeId, name: &str) -> bool {
        match self.kind(pattern) {
            NodeKind::Identifier { name: n } => n == name,
            NodeKind::ObjectPattern { properties } => properties
                .iter()
                .any(|&p| self.binds_name(p, name)),
            NodeKind::PatternProperty { value, .. } => self.binds_name(*value, name),
            NodeKind::ArrayPattern { elements } => elements
                .iter()
                .any(|&e| self.binds_name(e, name)),
            NodeKind::RestElement { argument } => self.binds_name(*argument, name),
            _ => false,
        }
    }
}

/// Iterator over a node's ancestor chain.
pub struct Ancestors<'a> {
    tree: &'a SourceTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Builds a [`SourceTree`] bottom-up.
///
/// Hosts allocate child nodes first and reference their ids from the parent
/// kind, then call [`TreeBuilder::build`] with the root. Linking skips nodes
/// it has already visited, so a malformed input that shares a node between
/// two parents cannot produce a cyclic parent chain.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with no source position.
    pub fn node(&mut self, kind: NodeKind) -> NodeId {
        self.node_at(0, kind)
    }

    /// Allocate a node at the given 1-based source line.
    pub fn node_at(&mut self, line: usize, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            line,
        });
        id
    }

    /// Seal the tree: set every parent back-link by one traversal from
    /// `root`.
    pub fn build(mut self, root: NodeId) -> SourceTree {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        visited[root.index()] = true;

        while let Some(id) = stack.pop() {
            for child in self.nodes[id.index()].kind.children() {
                if !visited[child.index()] {
                    visited[child.index()] = true;
                    self.nodes[child.index()].parent = Some(id);
                    stack.push(child);
                }
            }
        }

        SourceTree {
            nodes: self.nodes,
            root,
        }
    }
}
