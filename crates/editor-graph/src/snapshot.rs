//! Prebuilt lookup index over a graph snapshot
//!
//! Scope resolution walks incoming edges repeatedly; scanning the edge list
//! per step makes that quadratic on large graphs. A [`GraphSnapshot`] builds
//! the node and incoming-edge indexes once and is reused for every query
//! against the same nodes and edges. Snapshots are never mutated; rebuild
//! after any graph change.

use std::collections::HashMap;

use crate::types::{Workflow, WorkflowEdge, WorkflowNode};

/// Index over one immutable view of a graph
#[derive(Debug)]
pub struct GraphSnapshot<'a> {
    nodes: HashMap<&'a str, &'a WorkflowNode>,
    /// Incoming edges per target, in edge input order
    incoming: HashMap<&'a str, Vec<&'a WorkflowEdge>>,
}

impl<'a> GraphSnapshot<'a> {
    /// Build the index over the given nodes and edges
    pub fn new(nodes: &'a [WorkflowNode], edges: &'a [WorkflowEdge]) -> Self {
        let node_map: HashMap<&'a str, &'a WorkflowNode> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let mut incoming: HashMap<&'a str, Vec<&'a WorkflowEdge>> = HashMap::new();
        for edge in edges {
            incoming.entry(edge.target.as_str()).or_default().push(edge);
        }

        Self {
            nodes: node_map,
            incoming,
        }
    }

    /// Build the index over a whole workflow
    pub fn from_workflow(workflow: &'a Workflow) -> Self {
        Self::new(&workflow.nodes, &workflow.edges)
    }

    /// Look up a node by ID
    pub fn node(&self, id: &str) -> Option<&'a WorkflowNode> {
        self.nodes.get(id).copied()
    }

    /// Whether a node with this ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All edges into a node, in edge input order
    pub fn edges_into(&self, id: &str) -> &[&'a WorkflowEdge] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first edge into a node, if any
    pub fn first_edge_into(&self, id: &str) -> Option<&'a WorkflowEdge> {
        self.edges_into(id).first().copied()
    }

    /// Resolve a node's containment parent
    ///
    /// Returns `None` for top-level nodes and for parent references that
    /// don't resolve to an existing node.
    pub fn parent_of(&self, id: &str) -> Option<&'a WorkflowNode> {
        let node = self.node(id)?;
        let parent_id = node.parent_id.as_deref()?;
        self.node(parent_id)
    }

    /// Number of nodes in the snapshot
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
