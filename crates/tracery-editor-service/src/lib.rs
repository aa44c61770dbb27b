//! Tracery Editor Service - application services for the workflow editor
//!
//! This crate sits between the pure graph model in `editor-graph` and a
//! concrete host (desktop shell, web server). It owns the mutable editor
//! state and the backend integration:
//!
//! - Revision-tracked document mutation with change events (`document`)
//! - Node configuration panels with basic/advanced projections (`config`)
//! - Step status aggregation for run review (`steps`)
//! - Backend HTTP client for task runs and step listings (`client`)
//!
//! Everything async is confined to `client`; the document and panel
//! layers are synchronous and host-agnostic.
//!
//! # Example
//!
//! ```ignore
//! use editor_graph::WorkflowBuilder;
//! use tracery_editor_service::{NodeConfigStore, WorkflowDocument};
//!
//! let workflow = WorkflowBuilder::new("wf-1", "My Workflow")
//!     .add_task("extract", "Extract", (0.0, 0.0))
//!     .build();
//! let mut document = WorkflowDocument::new(workflow);
//!
//! let mut panel = NodeConfigStore::mount(&document, "extract")?;
//! panel.apply(
//!     tracery_editor_service::TaskFieldEdit::Url("https://example.com".into()),
//!     &mut document,
//! )?;
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod steps;

// Re-export key types
pub use client::{
    CreateTaskRequest, CreatedTask, HttpStepBackend, PageRequest, StepBackend, TaskFormValues,
    DEFAULT_PAGE_SIZE,
};
pub use config::{DisplayMode, NodeConfigStore, TaskField, TaskFieldEdit};
pub use document::{shared, SharedDocument, WorkflowDocument};
pub use error::{Result, ServiceError};
pub use events::{EditorEvent, EventError, EventSink, NullEventSink, VecEventSink};
pub use steps::{
    aggregate_steps, latest_attempts_only, StepDisplayEntry, StepMarker, StepRecord, StepStatus,
};
