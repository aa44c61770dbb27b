//! Core types for editor workflow graphs
//!
//! These types define the structure of a workflow as the editor sees it:
//! nodes with typed payloads, directed edges expressing execution order,
//! and container nesting via parent references.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Placeholder token for the managed download directory.
///
/// The backend substitutes the real path at run time; the editor only
/// ever sees the token.
pub const DOWNLOAD_DIRECTORY_TOKEN: &str = "TRACERY_DOWNLOAD_DIRECTORY";

/// Configuration fields of a task node
///
/// Optional JSON sub-values (`data_schema`, `error_code_mapping`) are kept
/// as raw JSON text with a sentinel convention: the string `"null"` means
/// the field is disabled, `"{}"` is the initial content when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    /// Human-readable label; also the seed for the node's output key
    pub label: String,
    /// Whether the editor surface may mutate this node
    pub editable: bool,
    /// Starting URL for the task
    pub url: String,
    /// What the task should accomplish
    pub navigation_goal: String,
    /// What data the task should extract
    pub data_extraction_goal: String,
    /// JSON schema for extracted data (sentinel convention)
    pub data_schema: String,
    /// Custom error messages keyed by error code (sentinel convention)
    pub error_code_mapping: String,
    /// Maximum retry attempts per step
    #[serde(default)]
    pub max_retries: Option<u32>,
    /// Override for the maximum number of steps
    #[serde(default)]
    pub max_steps_override: Option<u32>,
    /// Whether file downloads are permitted
    pub allow_downloads: bool,
    /// Suffix appended to downloaded file names
    #[serde(default)]
    pub download_suffix: Option<String>,
    /// URL polled for TOTP verification codes
    #[serde(default)]
    pub totp_verification_url: Option<String>,
    /// Identifier forwarded with TOTP requests
    #[serde(default)]
    pub totp_identifier: Option<String>,
    /// Parameter keys currently bound to this node
    #[serde(default)]
    pub parameter_keys: Vec<String>,
}

impl TaskData {
    /// Sentinel marking an optional JSON field as disabled
    pub const JSON_DISABLED: &'static str = "null";
    /// Initial content when an optional JSON field is enabled
    pub const JSON_EMPTY: &'static str = "{}";

    /// Create task data with a label and default values
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Whether the extraction schema is enabled
    pub fn data_schema_enabled(&self) -> bool {
        self.data_schema != Self::JSON_DISABLED
    }

    /// Whether custom error messages are enabled
    pub fn error_code_mapping_enabled(&self) -> bool {
        self.error_code_mapping != Self::JSON_DISABLED
    }
}

impl Default for TaskData {
    fn default() -> Self {
        Self {
            label: String::new(),
            editable: true,
            url: String::new(),
            navigation_goal: String::new(),
            data_extraction_goal: String::new(),
            data_schema: Self::JSON_DISABLED.to_string(),
            error_code_mapping: Self::JSON_DISABLED.to_string(),
            max_retries: None,
            max_steps_override: None,
            allow_downloads: false,
            download_suffix: None,
            totp_verification_url: None,
            totp_identifier: None,
            parameter_keys: Vec::new(),
        }
    }
}

/// Configuration fields of a code block node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlockData {
    pub label: String,
    pub editable: bool,
    /// Script body; its final `result` value becomes the block output
    pub code: String,
}

impl CodeBlockData {
    /// Create code block data with a label and the default script body
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

impl Default for CodeBlockData {
    fn default() -> Self {
        Self {
            label: String::new(),
            editable: true,
            code: "# To assign a value to the output of this block,\n\
                   # assign the value to the variable 'result'\n\
                   # The final value of 'result' will be used as the output of this block\n\n\
                   result = 5"
                .to_string(),
        }
    }
}

/// Configuration fields of a download node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadData {
    pub label: String,
    pub editable: bool,
    /// Source location; defaults to the managed download directory token
    pub url: String,
}

impl DownloadData {
    /// Create download data with a label and default values
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

impl Default for DownloadData {
    fn default() -> Self {
        Self {
            label: String::new(),
            editable: true,
            url: DOWNLOAD_DIRECTORY_TOKEN.to_string(),
        }
    }
}

/// Configuration fields of a loop container node
///
/// Loop nodes are the only container kind: other nodes nest inside them
/// via [`WorkflowNode::parent_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopData {
    pub label: String,
    pub editable: bool,
    /// Parameter key whose value is iterated over
    pub loop_value: String,
}

impl LoopData {
    /// Create loop data with a label and default values
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

impl Default for LoopData {
    fn default() -> Self {
        Self {
            label: String::new(),
            editable: true,
            loop_value: String::new(),
        }
    }
}

/// Typed payload of a node, tagged by node kind
///
/// Serializes in the editor's wire shape: a `type` tag next to a `data`
/// object, e.g. `{"type": "task", "data": {...}}`. The `nodeAdder` kind is
/// a placeholder the canvas renders as an "add block here" affordance; it
/// carries no data and never contributes parameter keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum NodePayload {
    Task(TaskData),
    CodeBlock(CodeBlockData),
    Download(DownloadData),
    Loop(LoopData),
    NodeAdder,
}

impl NodePayload {
    /// The serialized kind tag for this payload
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Task(_) => "task",
            Self::CodeBlock(_) => "codeBlock",
            Self::Download(_) => "download",
            Self::Loop(_) => "loop",
            Self::NodeAdder => "nodeAdder",
        }
    }

    /// The node's label, if this kind carries one
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Task(data) => Some(&data.label),
            Self::CodeBlock(data) => Some(&data.label),
            Self::Download(data) => Some(&data.label),
            Self::Loop(data) => Some(&data.label),
            Self::NodeAdder => None,
        }
    }

    /// Whether the editor surface may mutate this node
    pub fn editable(&self) -> bool {
        match self {
            Self::Task(data) => data.editable,
            Self::CodeBlock(data) => data.editable,
            Self::Download(data) => data.editable,
            Self::Loop(data) => data.editable,
            Self::NodeAdder => false,
        }
    }

    /// Set the editable flag (no-op for placeholder nodes)
    pub fn set_editable(&mut self, editable: bool) {
        match self {
            Self::Task(data) => data.editable = editable,
            Self::CodeBlock(data) => data.editable = editable,
            Self::Download(data) => data.editable = editable,
            Self::Loop(data) => data.editable = editable,
            Self::NodeAdder => {}
        }
    }

    /// Whether this is the "add block here" pseudo-node
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::NodeAdder)
    }

    /// Whether other nodes can nest inside this one
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Loop(_))
    }
}

/// An edge connecting two nodes
///
/// The target executes after the source; the source's outputs are visible
/// to the target during scope resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID (runs first)
    pub source: NodeId,
    /// Target node ID (runs after the source)
    pub target: NodeId,
}

impl WorkflowEdge {
    /// Create a new edge
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A node instance in a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Enclosing container node, if nested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Position on the canvas (x, y)
    pub position: (f64, f64),
    /// Kind-specific configuration
    #[serde(flatten)]
    pub payload: NodePayload,
}

impl WorkflowNode {
    /// Create a top-level node
    pub fn new(id: impl Into<String>, payload: NodePayload, position: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            position,
            payload,
        }
    }

    /// Nest this node inside a container
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// The node's label, if its kind carries one
    pub fn label(&self) -> Option<&str> {
        self.payload.label()
    }

    /// Whether this is the "add block here" pseudo-node
    pub fn is_placeholder(&self) -> bool {
        self.payload.is_placeholder()
    }

    /// Whether other nodes can nest inside this one
    pub fn is_container(&self) -> bool {
        self.payload.is_container()
    }
}

/// A complete workflow as edited on the canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Unique identifier for this workflow
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Nodes in the workflow
    pub nodes: Vec<WorkflowNode>,
    /// Edges connecting nodes
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    /// Create a new empty workflow
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a WorkflowEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a WorkflowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// Resolve a node's containment parent
    ///
    /// Returns `None` for top-level nodes and for parent references that
    /// don't resolve to an existing node.
    pub fn parent_of(&self, node_id: &str) -> Option<&WorkflowNode> {
        let node = self.find_node(node_id)?;
        let parent_id = node.parent_id.as_deref()?;
        self.find_node(parent_id)
    }
}
