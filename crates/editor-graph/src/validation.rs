//! Workflow validation
//!
//! Structural checks run before a workflow is saved or executed. The
//! resolver tolerates broken structure at lookup time; validation is where
//! those problems become visible to the user. All checks run and every
//! problem found is collected, rather than stopping at the first.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::params::output_parameter_key;
use crate::types::Workflow;

/// A structural problem found in a workflow
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The edge set contains a cycle
    CycleDetected,
    /// An edge references a node that does not exist
    UnknownNode { edge_id: String, node_id: String },
    /// An edge connects a node to itself
    SelfEdge { edge_id: String, node_id: String },
    /// A node names a parent that does not exist
    DanglingParent { node_id: String, parent_id: String },
    /// A node names itself as its parent
    SelfContainment { node_id: String },
    /// A node's parent is not a container kind
    ParentNotContainer { node_id: String, parent_id: String },
    /// A node has more than one incoming edge
    MultipleIncomingEdges { node_id: String, count: usize },
    /// A non-placeholder node has an empty label
    EmptyLabel { node_id: String },
    /// Two or more nodes produce the same output key
    DuplicateParameterKey { key: String, node_ids: Vec<String> },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleDetected => write!(f, "Workflow contains a cycle"),
            Self::UnknownNode { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
            Self::SelfEdge { edge_id, node_id } => {
                write!(f, "Edge '{}' connects node '{}' to itself", edge_id, node_id)
            }
            Self::DanglingParent { node_id, parent_id } => {
                write!(f, "Node '{}' references unknown parent '{}'", node_id, parent_id)
            }
            Self::SelfContainment { node_id } => {
                write!(f, "Node '{}' is its own parent", node_id)
            }
            Self::ParentNotContainer { node_id, parent_id } => {
                write!(f, "Node '{}' has non-container parent '{}'", node_id, parent_id)
            }
            Self::MultipleIncomingEdges { node_id, count } => {
                write!(f, "Node '{}' has {} incoming edges, only the first is followed", node_id, count)
            }
            Self::EmptyLabel { node_id } => {
                write!(f, "Node '{}' has an empty label", node_id)
            }
            Self::DuplicateParameterKey { key, node_ids } => {
                write!(f, "Output key '{}' is produced by nodes: {}", key, node_ids.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a workflow, collecting every problem found
pub fn validate_workflow(workflow: &Workflow) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_edge_references(workflow, &mut errors);
    detect_cycles(workflow, &mut errors);
    validate_containment(workflow, &mut errors);
    validate_incoming_degree(workflow, &mut errors);
    validate_labels(workflow, &mut errors);
    validate_binding_keys(workflow, &mut errors);
    errors
}

fn validate_edge_references(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &workflow.edges {
        if !node_ids.contains(edge.source.as_str()) {
            errors.push(ValidationError::UnknownNode {
                edge_id: edge.id.clone(),
                node_id: edge.source.clone(),
            });
        }
        if !node_ids.contains(edge.target.as_str()) {
            errors.push(ValidationError::UnknownNode {
                edge_id: edge.id.clone(),
                node_id: edge.target.clone(),
            });
        }
        if edge.source == edge.target {
            errors.push(ValidationError::SelfEdge {
                edge_id: edge.id.clone(),
                node_id: edge.source.clone(),
            });
        }
    }
}

/// Kahn's algorithm over the edge set
fn detect_cycles(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();
    // Self-edges and edges with missing endpoints are reported separately.
    let edges: Vec<(&str, &str)> = workflow
        .edges
        .iter()
        .filter(|e| {
            e.source != e.target
                && node_ids.contains(e.source.as_str())
                && node_ids.contains(e.target.as_str())
        })
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();

    let mut in_degree: HashMap<&str, usize> =
        workflow.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
    for &(_, target) in &edges {
        if let Some(degree) = in_degree.get_mut(target) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut visited = 0usize;
    while let Some(current) = queue.pop_front() {
        visited += 1;
        for &(source, target) in &edges {
            if source == current {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    if visited < workflow.nodes.len() {
        errors.push(ValidationError::CycleDetected);
    }
}

fn validate_containment(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    for node in &workflow.nodes {
        let Some(parent_id) = node.parent_id.as_deref() else {
            continue;
        };
        if parent_id == node.id {
            errors.push(ValidationError::SelfContainment {
                node_id: node.id.clone(),
            });
            continue;
        }
        match workflow.find_node(parent_id) {
            None => errors.push(ValidationError::DanglingParent {
                node_id: node.id.clone(),
                parent_id: parent_id.to_string(),
            }),
            Some(parent) if !parent.is_container() => {
                errors.push(ValidationError::ParentNotContainer {
                    node_id: node.id.clone(),
                    parent_id: parent_id.to_string(),
                });
            }
            Some(_) => {}
        }
    }
}

fn validate_incoming_degree(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    for node in &workflow.nodes {
        let count = workflow.incoming_edges(&node.id).count();
        if count > 1 {
            errors.push(ValidationError::MultipleIncomingEdges {
                node_id: node.id.clone(),
                count,
            });
        }
    }
}

fn validate_labels(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    for node in &workflow.nodes {
        if node.is_placeholder() {
            continue;
        }
        if node.label().is_some_and(str::is_empty) {
            errors.push(ValidationError::EmptyLabel {
                node_id: node.id.clone(),
            });
        }
    }
}

fn validate_binding_keys(workflow: &Workflow, errors: &mut Vec<ValidationError>) {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, Vec<String>> = HashMap::new();
    for node in &workflow.nodes {
        if node.is_placeholder() {
            continue;
        }
        let Some(label) = node.label() else {
            continue;
        };
        if label.is_empty() {
            continue;
        }
        let key = output_parameter_key(label);
        let node_ids = by_key.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        node_ids.push(node.id.clone());
    }

    for key in order {
        let node_ids = &by_key[&key];
        if node_ids.len() > 1 {
            errors.push(ValidationError::DuplicateParameterKey {
                key,
                node_ids: node_ids.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::types::{NodePayload, TaskData, WorkflowNode};

    fn make_valid_workflow() -> Workflow {
        WorkflowBuilder::new("wf", "Test")
            .add_task("a", "First", (0.0, 0.0))
            .add_task("b", "Second", (0.0, 200.0))
            .add_loop("loop", "Collect", (0.0, 400.0))
            .add_task("inner", "Inner", (20.0, 420.0))
            .child_of("loop")
            .add_edge("a", "b")
            .add_edge("b", "loop")
            .build()
    }

    #[test]
    fn test_valid_workflow_has_no_errors() {
        let errors = validate_workflow(&make_valid_workflow());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_unknown_edge_endpoint() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "First", (0.0, 0.0))
            .add_edge("a", "ghost")
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::UnknownNode {
            edge_id: "edge-1".to_string(),
            node_id: "ghost".to_string(),
        }));
    }

    #[test]
    fn test_self_edge_reported() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "First", (0.0, 0.0))
            .add_edge("a", "a")
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::SelfEdge {
            edge_id: "edge-1".to_string(),
            node_id: "a".to_string(),
        }));
        // A self-edge is not also reported as a cycle.
        assert!(!errors.contains(&ValidationError::CycleDetected));
    }

    #[test]
    fn test_cycle_detected() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "First", (0.0, 0.0))
            .add_task("b", "Second", (0.0, 200.0))
            .add_task("c", "Third", (0.0, 400.0))
            .add_edge("a", "b")
            .add_edge("b", "c")
            .add_edge("c", "a")
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::CycleDetected));
    }

    #[test]
    fn test_dangling_parent() {
        let mut workflow = Workflow::new("wf", "Test");
        workflow.nodes.push(
            WorkflowNode::new("a", NodePayload::Task(TaskData::with_label("First")), (0.0, 0.0))
                .with_parent("ghost"),
        );

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::DanglingParent {
            node_id: "a".to_string(),
            parent_id: "ghost".to_string(),
        }));
    }

    #[test]
    fn test_self_containment() {
        let mut workflow = Workflow::new("wf", "Test");
        workflow.nodes.push(
            WorkflowNode::new("a", NodePayload::Task(TaskData::with_label("First")), (0.0, 0.0))
                .with_parent("a"),
        );

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::SelfContainment {
            node_id: "a".to_string(),
        }));
    }

    #[test]
    fn test_parent_must_be_container() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "First", (0.0, 0.0))
            .add_task("b", "Second", (20.0, 20.0))
            .child_of("a")
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::ParentNotContainer {
            node_id: "b".to_string(),
            parent_id: "a".to_string(),
        }));
    }

    #[test]
    fn test_multiple_incoming_edges() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "First", (0.0, 0.0))
            .add_task("b", "Second", (200.0, 0.0))
            .add_task("c", "Third", (100.0, 200.0))
            .add_edge("a", "c")
            .add_edge("b", "c")
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::MultipleIncomingEdges {
            node_id: "c".to_string(),
            count: 2,
        }));
    }

    #[test]
    fn test_empty_label() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "", (0.0, 0.0))
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::EmptyLabel {
            node_id: "a".to_string(),
        }));
    }

    #[test]
    fn test_placeholder_label_not_required() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_node_adder("adder", (0.0, 0.0))
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_duplicate_parameter_key() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "Extract", (0.0, 0.0))
            .add_task("b", "Extract", (0.0, 200.0))
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::DuplicateParameterKey {
            key: "Extract_output".to_string(),
            node_ids: vec!["a".to_string(), "b".to_string()],
        }));
    }

    #[test]
    fn test_collects_multiple_errors() {
        let workflow = WorkflowBuilder::new("wf", "Test")
            .add_task("a", "", (0.0, 0.0))
            .add_task("b", "Second", (0.0, 200.0))
            .add_edge("a", "b")
            .add_edge("b", "a")
            .add_edge("a", "ghost")
            .build();

        let errors = validate_workflow(&workflow);
        assert!(errors.contains(&ValidationError::CycleDetected));
        assert!(errors.contains(&ValidationError::EmptyLabel {
            node_id: "a".to_string(),
        }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::UnknownNode { .. })));
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_error_display() {
        let error = ValidationError::UnknownNode {
            edge_id: "edge-1".to_string(),
            node_id: "ghost".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Edge 'edge-1' references unknown node 'ghost'"
        );

        let error = ValidationError::DuplicateParameterKey {
            key: "Extract_output".to_string(),
            node_ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Output key 'Extract_output' is produced by nodes: a, b"
        );
    }
}
