//! Upstream scope resolution
//!
//! For a given node, computes which nodes' outputs it may legally
//! reference. Visibility follows two relations at once:
//!
//! - **Edges**: everything strictly before the node in its own execution
//!   chain is visible, nearest predecessor first.
//! - **Containment**: nodes nested inside a container additionally see
//!   everything visible to the container itself, appended after the local
//!   chain. Sibling branches and a container's internals stay invisible
//!   from outside.
//!
//! A single visited set, seeded with the target and shared between the
//! edge walk and the parent climb, bounds the work by the node count.
//! Cycles, self-edges, and self-referencing containers terminate with
//! whatever partial chain was collected; a missing target yields an empty
//! chain. Malformed topology is never an error here, the diagnostics pass
//! in [`crate::validation`] reports it.

use std::collections::HashSet;

use crate::snapshot::GraphSnapshot;
use crate::types::{NodeId, WorkflowNode};

/// Resolve the IDs of all nodes whose outputs are visible to `target`
///
/// The result is ordered nearest-first within each nesting level, with the
/// enclosing container's own chain appended after the local one, and is
/// free of duplicates. The target itself is never included, and neither
/// are the enclosing containers.
///
/// When a node has several incoming edges only the first one (in edge
/// input order) is followed; the rest are ignored.
pub fn upstream_ids(snapshot: &GraphSnapshot<'_>, target: &str) -> Vec<NodeId> {
    let Some(start) = snapshot.node(target) else {
        return Vec::new();
    };

    let mut chain: Vec<NodeId> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(start.id.as_str());

    // Walk one nesting level at a time, climbing through enclosing
    // containers instead of recursing so deep nesting can't overflow
    // the stack.
    let mut level: Option<&WorkflowNode> = Some(start);
    while let Some(node) = level {
        let mut current = node.id.as_str();
        while let Some(edge) = snapshot.first_edge_into(current) {
            let source = edge.source.as_str();
            if !visited.insert(source) {
                // Revisit means a cycle; keep the partial chain.
                break;
            }
            chain.push(source.to_string());
            current = source;
        }

        level = node
            .parent_id
            .as_deref()
            .and_then(|parent_id| snapshot.node(parent_id))
            .filter(|parent| visited.insert(parent.id.as_str()));
    }

    chain
}

/// Resolve the nodes whose outputs are visible to `target`
///
/// Same ordering guarantees as [`upstream_ids`], with the nodes themselves
/// looked up from the snapshot.
pub fn upstream_nodes<'a>(snapshot: &GraphSnapshot<'a>, target: &str) -> Vec<&'a WorkflowNode> {
    upstream_ids(snapshot, target)
        .iter()
        .filter_map(|id| snapshot.node(id))
        .collect()
}
