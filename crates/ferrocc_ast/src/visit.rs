//! A walking [`Visitor`] over an [`crate::Ast`]. Every method has a default
//! body that just recurses into children, so implementors override only the
//! node kinds they care about — the same shape as `ferrocc_syntax`'s table
//! lookups, one default per category rather than one per of the ~115 kinds.

use crate::{Arena, NodeId, NodeKind};

pub trait Visitor {
    /// Called for every node before its kind-specific hook. Returning
    /// `false` skips the node's children (and its kind-specific hook).
    fn enter(&mut self, _arena: &Arena, _id: NodeId) -> bool {
        true
    }

    fn leave(&mut self, _arena: &Arena, _id: NodeId) {}
}

/// Visits `id` and its full subtree in pre-order, depth-first.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, arena: &Arena, id: NodeId) {
    if !visitor.enter(arena, id) {
        return;
    }
    let children = arena.get(id).children.clone();
    for child in children {
        walk(visitor, arena, child);
    }
    visitor.leave(arena, id);
}

/// Visits only the direct children of `id`, non-recursively.
pub fn walk_children<V: Visitor + ?Sized>(visitor: &mut V, arena: &Arena, id: NodeId) {
    let children = arena.get(id).children.clone();
    for child in children {
        walk(visitor, arena, child);
    }
}

/// Collects every node of a given kind reachable from `root`, in document
/// order. Used by `ferrocc_driver`'s `--debug-ast` dump and by tests that
/// need to find "the one `IfStmt` in this function" without hand-rolling a
/// recursive search.
pub fn collect_kind(arena: &Arena, root: NodeId, kind: NodeKind) -> Vec<NodeId> {
    struct Collector<'a> {
        kind: NodeKind,
        found: Vec<NodeId>,
        _marker: std::marker::PhantomData<&'a ()>,
    }

    impl Visitor for Collector<'_> {
        fn enter(&mut self, arena: &Arena, id: NodeId) -> bool {
            if arena.get(id).kind == self.kind {
                self.found.push(id);
            }
            true
        }
    }

    let mut collector = Collector {
        kind,
        found: Vec::new(),
        _marker: std::marker::PhantomData,
    };
    walk(&mut collector, arena, root);
    collector.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;
    use ferrocc_diag::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation::new(0, 1, 1, 0)
    }

    #[test]
    fn collect_kind_finds_nested_nodes_in_order() {
        let mut arena = Arena::new();
        let a = arena.push(NodeKind::NullStmt, loc(), Payload::None);
        let b = arena.push(NodeKind::NullStmt, loc(), Payload::None);
        let compound = arena.push(NodeKind::CompoundStmt, loc(), Payload::None);
        arena.add_child(compound, a);
        arena.add_child(compound, b);

        let found = collect_kind(&arena, compound, NodeKind::NullStmt);
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn enter_returning_false_skips_subtree() {
        struct StopAtCompound {
            visited: Vec<NodeId>,
        }
        impl Visitor for StopAtCompound {
            fn enter(&mut self, arena: &Arena, id: NodeId) -> bool {
                self.visited.push(id);
                arena.get(id).kind != NodeKind::CompoundStmt
            }
        }

        let mut arena = Arena::new();
        let inner = arena.push(NodeKind::NullStmt, loc(), Payload::None);
        let compound = arena.push(NodeKind::CompoundStmt, loc(), Payload::None);
        arena.add_child(compound, inner);

        let mut visitor = StopAtCompound { visited: Vec::new() };
        walk(&mut visitor, &arena, compound);
        assert_eq!(visitor.visited, vec![compound]);
    }
}
