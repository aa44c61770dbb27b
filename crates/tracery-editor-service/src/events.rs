//! Event types for streaming editor changes
//!
//! Events are sent from the document layer to the frontend (or any
//! consumer) so canvases and panels can react to graph mutations without
//! polling. Every event carries the document revision it produced.

use serde::{Deserialize, Serialize};

/// Trait for sending editor events
///
/// This abstracts over the transport mechanism (IPC channel, mpsc, etc.)
/// allowing the document layer to be used in different hosts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: EditorEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted as the workflow document changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// A node was added to the document
    #[serde(rename_all = "camelCase")]
    NodeAdded {
        workflow_id: String,
        node_id: String,
        revision: u64,
    },

    /// A node's configuration changed
    #[serde(rename_all = "camelCase")]
    NodeUpdated {
        workflow_id: String,
        node_id: String,
        revision: u64,
    },

    /// A node was removed, along with its edges
    #[serde(rename_all = "camelCase")]
    NodeRemoved {
        workflow_id: String,
        node_id: String,
        revision: u64,
    },

    /// An edge was added
    #[serde(rename_all = "camelCase")]
    EdgeAdded {
        workflow_id: String,
        edge_id: String,
        revision: u64,
    },

    /// An edge was removed
    #[serde(rename_all = "camelCase")]
    EdgeRemoved {
        workflow_id: String,
        edge_id: String,
        revision: u64,
    },

    /// The whole workflow was swapped out
    #[serde(rename_all = "camelCase")]
    WorkflowReplaced { workflow_id: String, revision: u64 },
}

impl EditorEvent {
    /// The document revision this event was emitted at
    pub fn revision(&self) -> u64 {
        match self {
            Self::NodeAdded { revision, .. }
            | Self::NodeUpdated { revision, .. }
            | Self::NodeRemoved { revision, .. }
            | Self::EdgeAdded { revision, .. }
            | Self::EdgeRemoved { revision, .. }
            | Self::WorkflowReplaced { revision, .. } => *revision,
        }
    }
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: EditorEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<EditorEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: EditorEvent) -> Result<(), EventError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();

        sink.send(EditorEvent::NodeAdded {
            workflow_id: "wf-1".to_string(),
            node_id: "node-1".to_string(),
            revision: 1,
        })
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);

        match &events[0] {
            EditorEvent::NodeAdded { node_id, revision, .. } => {
                assert_eq!(node_id, "node-1");
                assert_eq!(*revision, 1);
            }
            _ => panic!("Expected NodeAdded event"),
        }
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        // Should not panic
        sink.send(EditorEvent::WorkflowReplaced {
            workflow_id: "wf-1".to_string(),
            revision: 1,
        })
        .unwrap();
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = EditorEvent::EdgeAdded {
            workflow_id: "wf-1".to_string(),
            edge_id: "edge-1".to_string(),
            revision: 3,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "edgeAdded");
        assert_eq!(json["workflowId"], "wf-1");
        assert_eq!(json["edgeId"], "edge-1");
        assert_eq!(json["revision"], 3);
    }

    #[test]
    fn test_event_revision_accessor() {
        let event = EditorEvent::NodeRemoved {
            workflow_id: "wf-1".to_string(),
            node_id: "node-1".to_string(),
            revision: 7,
        };
        assert_eq!(event.revision(), 7);
    }
}
