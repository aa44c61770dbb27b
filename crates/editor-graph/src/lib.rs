//! Editor Graph - workflow graph model and scope resolution for Tracery
//!
//! This crate provides the data model and the pure analysis passes behind
//! the visual workflow editor:
//!
//! - Typed nodes, edges, and container nesting (`types`)
//! - A prebuilt per-snapshot lookup index (`snapshot`)
//! - Upstream scope resolution along edges and containers (`scope`)
//! - Output-parameter key derivation and binding tables (`params`)
//! - Whole-graph diagnostics (`validation`)
//! - A fluent builder for programmatic graph construction (`builder`)
//!
//! Everything here is synchronous and side-effect free: graphs go in,
//! chains, keys, and diagnostics come out. Mutation and I/O live in the
//! service layer.
//!
//! # Example
//!
//! ```ignore
//! use editor_graph::builder::WorkflowBuilder;
//! use editor_graph::scope::upstream_ids;
//! use editor_graph::snapshot::GraphSnapshot;
//!
//! let workflow = WorkflowBuilder::new("wf-1", "My Workflow")
//!     .add_task("extract", "Extract", (0.0, 0.0))
//!     .add_task("submit", "Submit", (0.0, 200.0))
//!     .add_edge("extract", "submit")
//!     .build();
//!
//! let snapshot = GraphSnapshot::new(&workflow.nodes, &workflow.edges);
//! assert_eq!(upstream_ids(&snapshot, "submit"), vec!["extract"]);
//! ```

pub mod builder;
pub mod error;
pub mod params;
pub mod scope;
pub mod snapshot;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::WorkflowBuilder;
pub use error::{GraphError, Result};
pub use params::{
    available_output_keys, output_parameter_key, Binding, BindingConflict, BindingSource,
    BindingTable, WorkflowParameter, WorkflowParameterType,
};
pub use scope::{upstream_ids, upstream_nodes};
pub use snapshot::GraphSnapshot;
pub use types::{
    CodeBlockData, DownloadData, EdgeId, LoopData, NodeId, NodePayload, TaskData, Workflow,
    WorkflowEdge, WorkflowNode, DOWNLOAD_DIRECTORY_TOKEN,
};
pub use validation::{validate_workflow, ValidationError};
