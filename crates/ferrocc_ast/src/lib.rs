//! Arena-indexed AST for the ferrocc C front-end.
//!
//! A [`Arena`] owns every [`Node`] in a translation unit; nodes refer to
//! each other by [`NodeId`] rather than by pointer, so there is no
//! ownership tree to walk on drop and no `destroyed` flag to check before
//! using a reference — the arena itself outlives every `NodeId` derived
//! from it (see DESIGN.md for why this replaces the pointer-owned tree the
//! AST is otherwise modeled on).

mod kind;
mod payload;
pub mod print;
pub mod visit;

pub use kind::NodeKind;
pub use payload::{DeclFlags, Payload};

use ferrocc_diag::SourceLocation;
use smallvec::SmallVec;

/// Index of a [`Node`] within an [`Arena`]. `0` is never issued to a real
/// node — it is reserved as `NodeId::DANGLING`, the children-list sentinel
/// produced while a node's data payload is still being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const DANGLING: NodeId = NodeId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Inline capacity for [`Node::children`]. Four covers every fixed-arity
/// node (`IfStmt`'s cond/then/else, `ForStmt`'s init/cond/inc/body); only
/// `CompoundStmt`, `ParamList`, call argument lists and the like spill to
/// the heap.
pub type Children = SmallVec<[NodeId; 4]>;

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub location: SourceLocation,
    pub children: Children,
    pub payload: Payload,
}

impl Node {
    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }
}

/// Owns every node of one translation unit. Nodes are appended and never
/// removed; a `NodeId` handed out by `push` stays valid for the arena's
/// whole lifetime.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Appends a node with no children yet and returns its id. Callers
    /// build a node's children with [`Arena::add_child`] after the node
    /// (and, transitively, its subtrees) exist, since a child's `NodeId`
    /// must be known before it can be pushed onto the parent's list.
    pub fn push(&mut self, kind: NodeKind, location: SourceLocation, payload: Payload) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            location,
            children: Children::new(),
            payload,
        });
        id
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A parsed translation unit: the arena plus the id of its
/// `NodeKind::TranslationUnit` root.
#[derive(Debug)]
pub struct Ast {
    pub arena: Arena,
    pub root: NodeId,
}

impl Ast {
    pub fn get(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(0, 1, 1, 0)
    }

    #[test]
    fn push_then_add_child_links_nodes() {
        let mut arena = Arena::new();
        let lit = arena.push(
            NodeKind::IntegerLiteral,
            loc(),
            Payload::Integer {
                value: 1,
                is_unsigned: false,
                long_count: 0,
            },
        );
        let stmt = arena.push(NodeKind::ReturnStmt, loc(), Payload::None);
        arena.add_child(stmt, lit);

        assert_eq!(arena.get(stmt).children.as_slice(), &[lit]);
        assert_eq!(arena.get(stmt).child(0), Some(lit));
        assert_eq!(arena.get(stmt).child(1), None);
    }

    #[test]
    fn node_ids_are_stable_after_further_pushes() {
        let mut arena = Arena::new();
        let first = arena.push(NodeKind::NullStmt, loc(), Payload::None);
        for _ in 0..16 {
            arena.push(NodeKind::NullStmt, loc(), Payload::None);
        }
        assert_eq!(arena.get(first).kind, NodeKind::NullStmt);
        assert_eq!(arena.len(), 17);
    }
}
