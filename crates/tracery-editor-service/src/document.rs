//! Workflow document mutation and change tracking.
//!
//! This module owns the editable workflow state. Every mutation goes
//! through [`WorkflowDocument`], which bumps a revision counter and emits
//! an [`EditorEvent`] so hosts can refresh views without polling. Reads
//! hand out [`GraphSnapshot`]s over the current node and edge sets, which
//! is what the scope resolver and binding tables consume.

use std::sync::Arc;

use editor_graph::snapshot::GraphSnapshot;
use editor_graph::types::{EdgeId, NodeId, NodePayload, Workflow, WorkflowEdge, WorkflowNode};
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::events::{EditorEvent, EventSink, NullEventSink};

/// An editable workflow with revision tracking and change events.
///
/// The revision starts at 0 and increments on every successful mutation.
/// Failed mutations leave both the workflow and the revision untouched, so
/// the revision doubles as a cheap cache key for derived state such as
/// resolved scopes and binding tables.
pub struct WorkflowDocument {
    workflow: Workflow,
    revision: u64,
    events: Arc<dyn EventSink>,
}

impl WorkflowDocument {
    /// Create a document that discards change events.
    pub fn new(workflow: Workflow) -> Self {
        Self::with_events(workflow, Arc::new(NullEventSink))
    }

    /// Create a document that reports changes to the given sink.
    pub fn with_events(workflow: Workflow, events: Arc<dyn EventSink>) -> Self {
        Self {
            workflow,
            revision: 0,
            events,
        }
    }

    // =========================================================================
    // Document access
    // =========================================================================

    /// The current workflow state.
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// The current revision, incremented on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Build a lookup snapshot over the current node and edge sets.
    ///
    /// The snapshot borrows from the document and is valid until the next
    /// mutation.
    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot::new(&self.workflow.nodes, &self.workflow.edges)
    }

    fn emit(&self, event: EditorEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Failed to send editor event: {}", e);
        }
    }

    // =========================================================================
    // Node operations
    // =========================================================================

    /// Add a node to the document.
    pub fn add_node(&mut self, node: WorkflowNode) -> Result<()> {
        if self.workflow.find_node(&node.id).is_some() {
            return Err(ServiceError::DuplicateId(node.id));
        }

        let node_id = node.id.clone();
        self.workflow.nodes.push(node);
        self.revision += 1;
        log::debug!("Added node '{}' (revision {})", node_id, self.revision);
        self.emit(EditorEvent::NodeAdded {
            workflow_id: self.workflow.id.clone(),
            node_id,
            revision: self.revision,
        });
        Ok(())
    }

    /// Create a node with a generated id and add it to the document.
    ///
    /// Returns the generated node id.
    pub fn insert_node(
        &mut self,
        payload: NodePayload,
        position: (f64, f64),
        parent_id: Option<String>,
    ) -> Result<NodeId> {
        let id = format!("node-{}", Uuid::new_v4());
        let mut node = WorkflowNode::new(id.clone(), payload, position);
        if let Some(parent_id) = parent_id {
            node = node.with_parent(parent_id);
        }
        self.add_node(node)?;
        Ok(id)
    }

    /// Replace a node's configuration payload.
    pub fn update_node_data(&mut self, node_id: &str, payload: NodePayload) -> Result<()> {
        let node = self
            .workflow
            .find_node_mut(node_id)
            .ok_or_else(|| ServiceError::NodeNotFound(node_id.to_string()))?;
        node.payload = payload;

        self.revision += 1;
        log::debug!("Updated node '{}' (revision {})", node_id, self.revision);
        self.emit(EditorEvent::NodeUpdated {
            workflow_id: self.workflow.id.clone(),
            node_id: node_id.to_string(),
            revision: self.revision,
        });
        Ok(())
    }

    /// Remove a node along with every edge touching it.
    ///
    /// Children of a removed container move to the top level. Returns the
    /// removed node.
    pub fn remove_node(&mut self, node_id: &str) -> Result<WorkflowNode> {
        let index = self
            .workflow
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| ServiceError::NodeNotFound(node_id.to_string()))?;

        let node = self.workflow.nodes.remove(index);
        self.workflow
            .edges
            .retain(|e| e.source != node_id && e.target != node_id);
        for child in self.workflow.nodes.iter_mut() {
            if child.parent_id.as_deref() == Some(node_id) {
                child.parent_id = None;
            }
        }

        self.revision += 1;
        log::debug!("Removed node '{}' (revision {})", node_id, self.revision);
        self.emit(EditorEvent::NodeRemoved {
            workflow_id: self.workflow.id.clone(),
            node_id: node_id.to_string(),
            revision: self.revision,
        });
        Ok(node)
    }

    // =========================================================================
    // Edge operations
    // =========================================================================

    /// Add an edge to the document.
    ///
    /// Both endpoints must resolve to existing nodes.
    pub fn add_edge(&mut self, edge: WorkflowEdge) -> Result<()> {
        if self.workflow.edges.iter().any(|e| e.id == edge.id) {
            return Err(ServiceError::DuplicateId(edge.id));
        }
        if self.workflow.find_node(&edge.source).is_none() {
            return Err(ServiceError::NodeNotFound(edge.source));
        }
        if self.workflow.find_node(&edge.target).is_none() {
            return Err(ServiceError::NodeNotFound(edge.target));
        }

        let edge_id = edge.id.clone();
        self.workflow.edges.push(edge);
        self.revision += 1;
        log::debug!("Added edge '{}' (revision {})", edge_id, self.revision);
        self.emit(EditorEvent::EdgeAdded {
            workflow_id: self.workflow.id.clone(),
            edge_id,
            revision: self.revision,
        });
        Ok(())
    }

    /// Connect two nodes with a generated edge id.
    ///
    /// Returns the generated edge id.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<EdgeId> {
        let id = format!("edge-{}", Uuid::new_v4());
        self.add_edge(WorkflowEdge::new(id.clone(), source, target))?;
        Ok(id)
    }

    /// Remove an edge, returning it.
    pub fn remove_edge(&mut self, edge_id: &str) -> Result<WorkflowEdge> {
        let index = self
            .workflow
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or_else(|| ServiceError::EdgeNotFound(edge_id.to_string()))?;

        let edge = self.workflow.edges.remove(index);
        self.revision += 1;
        log::debug!("Removed edge '{}' (revision {})", edge_id, self.revision);
        self.emit(EditorEvent::EdgeRemoved {
            workflow_id: self.workflow.id.clone(),
            edge_id: edge_id.to_string(),
            revision: self.revision,
        });
        Ok(edge)
    }

    // =========================================================================
    // Whole-document operations
    // =========================================================================

    /// Swap in a different workflow, e.g. after loading from disk.
    pub fn replace(&mut self, workflow: Workflow) {
        self.workflow = workflow;
        self.revision += 1;
        log::info!(
            "Replaced workflow '{}' (revision {})",
            self.workflow.id,
            self.revision
        );
        self.emit(EditorEvent::WorkflowReplaced {
            workflow_id: self.workflow.id.clone(),
            revision: self.revision,
        });
    }
}

/// A document shared across threads behind a read-write lock.
pub type SharedDocument = Arc<parking_lot::RwLock<WorkflowDocument>>;

/// Wrap a document for shared access.
pub fn shared(document: WorkflowDocument) -> SharedDocument {
    Arc::new(parking_lot::RwLock::new(document))
}
