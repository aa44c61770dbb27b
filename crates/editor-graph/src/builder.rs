//! Fluent workflow construction
//!
//! # Example
//!
//! ```ignore
//! use editor_graph::WorkflowBuilder;
//!
//! let workflow = WorkflowBuilder::new("wf-1", "Invoice sweep")
//!     .add_task("login", "Login", (0.0, 0.0))
//!     .add_task("extract", "Extract", (0.0, 200.0))
//!     .add_loop("each", "Each Invoice", (0.0, 400.0))
//!     .add_download("fetch", "Fetch PDF", (20.0, 420.0))
//!     .child_of("each")
//!     .add_edge("login", "extract")
//!     .add_edge("extract", "each")
//!     .build();
//! ```

use crate::types::{
    CodeBlockData, DownloadData, LoopData, NodePayload, TaskData, Workflow, WorkflowEdge,
    WorkflowNode,
};

/// Builds a [`Workflow`] incrementally
///
/// Edge ids are generated automatically unless supplied via
/// [`WorkflowBuilder::add_edge_with_id`]. Structural checks are deferred
/// to [`validate_workflow`](crate::validate_workflow) so partially built
/// and deliberately broken workflows can be constructed.
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    id: String,
    title: String,
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    edge_counter: u32,
}

impl WorkflowBuilder {
    /// Start building a workflow with the given id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_counter: 0,
        }
    }

    /// Add a node with an explicit payload
    pub fn add_node(mut self, id: impl Into<String>, payload: NodePayload, position: (f64, f64)) -> Self {
        self.nodes.push(WorkflowNode::new(id, payload, position));
        self
    }

    /// Add a task node with default configuration
    pub fn add_task(self, id: impl Into<String>, label: impl Into<String>, position: (f64, f64)) -> Self {
        self.add_node(id, NodePayload::Task(TaskData::with_label(label)), position)
    }

    /// Add a code block node with the default script body
    pub fn add_code_block(self, id: impl Into<String>, label: impl Into<String>, position: (f64, f64)) -> Self {
        self.add_node(id, NodePayload::CodeBlock(CodeBlockData::with_label(label)), position)
    }

    /// Add a download node
    pub fn add_download(self, id: impl Into<String>, label: impl Into<String>, position: (f64, f64)) -> Self {
        self.add_node(id, NodePayload::Download(DownloadData::with_label(label)), position)
    }

    /// Add a loop container node
    pub fn add_loop(self, id: impl Into<String>, label: impl Into<String>, position: (f64, f64)) -> Self {
        self.add_node(id, NodePayload::Loop(LoopData::with_label(label)), position)
    }

    /// Add a node-adder placeholder
    pub fn add_node_adder(self, id: impl Into<String>, position: (f64, f64)) -> Self {
        self.add_node(id, NodePayload::NodeAdder, position)
    }

    /// Nest the most recently added node inside a container
    ///
    /// Must be called immediately after the `add_*` call for the node it
    /// applies to.
    pub fn child_of(mut self, parent_id: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.parent_id = Some(parent_id.into());
        }
        self
    }

    /// Set the editable flag on the most recently added node
    pub fn editable(mut self, editable: bool) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.payload.set_editable(editable);
        }
        self
    }

    /// Replace the payload of the most recently added node
    pub fn with_payload(mut self, payload: NodePayload) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.payload = payload;
        }
        self
    }

    /// Connect two nodes with an auto-generated edge id
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        let id = format!("edge-{}", self.edge_counter);
        self.edges.push(WorkflowEdge::new(id, source, target));
        self
    }

    /// Connect two nodes with an explicit edge id
    pub fn add_edge_with_id(
        mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edges.push(WorkflowEdge::new(id, source, target));
        self
    }

    /// Finish building and return the workflow
    pub fn build(self) -> Workflow {
        Workflow {
            id: self.id,
            title: self.title,
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
