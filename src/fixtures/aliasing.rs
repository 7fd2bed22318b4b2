//! Fixtures that mutate a shared node graph
//!
//! Arguments are nullable references into the caller's [`NodeGraph`].
//! Writes land in place, so a caller holding an alias of a mutated node
//! observes the write. Faults are returned after any writes that preceded
//! them; nothing is rolled back.

use crate::error::Result;
use crate::node::{NodeGraph, NodeId};
use tracing::trace;

/// Re-reads `b.x` after running [`mutate_chain`] on `a`
///
/// Returns 0 if `b.x` is zero on entry. Otherwise the chain from `a` is
/// mutated, and if that zeroed `b.x` through an alias (with `b` a
/// different node than `a`), returns `b.y`. Returns 2 in every other case.
pub fn alias_mutation(
    graph: &mut NodeGraph,
    a: Option<NodeId>,
    b: Option<NodeId>,
) -> Result<i32> {
    trace!(?a, ?b, "alias_mutation");

    if graph.deref(b, "b")?.x == 0 {
        return Ok(0);
    }
    mutate_chain(graph, a)?;

    let b_node = graph.deref(b, "b")?;
    if b_node.x == 0 && a != b {
        return Ok(b_node.y);
    }
    Ok(2)
}

/// Walks the link chain from `a` while `y` is non-zero
///
/// For each visited node, zeroes `link.x` before descending and sets
/// `link.y` to 1337 on the way back out. A cycle whose nodes all have a
/// non-zero `y` never terminates.
pub fn mutate_chain(graph: &mut NodeGraph, a: Option<NodeId>) -> Result<()> {
    let node = *graph.deref(a, "a")?;
    if node.y == 0 {
        return Ok(());
    }

    trace!(?a, link = ?node.link, "mutate_chain descending");
    graph.deref_mut(node.link, "a.link")?.x = 0;
    mutate_chain(graph, node.link)?;
    finalize_chain(graph, a)
}

/// Sets `a.link.y` to 1337
pub fn finalize_chain(graph: &mut NodeGraph, a: Option<NodeId>) -> Result<()> {
    let link = graph.deref(a, "a")?.link;
    graph.deref_mut(link, "a.link")?.y = 1337;
    Ok(())
}
