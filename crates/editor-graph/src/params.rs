//! Parameter keys and binding tables
//!
//! Every labeled node exposes one output under a key derived from its
//! label. The set of keys a node may bind is the workflow-level parameter
//! declarations followed by the output keys of its upstream scope, with
//! placeholder nodes excluded. [`BindingTable`] materializes that set as
//! an explicit symbol table so the editor can show where each key comes
//! from, spot colliding keys, and tell stale bindings apart from live
//! ones.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::scope::upstream_nodes;
use crate::snapshot::GraphSnapshot;
use crate::types::NodeId;

/// Suffix appended to a node label to form its output key
pub const OUTPUT_KEY_SUFFIX: &str = "_output";

/// Derive the output parameter key for a node label
///
/// Total and deterministic: the same label always yields the same key.
/// Distinct labels yield distinct keys; duplicate labels collide, which
/// [`BindingTable::conflicts`] reports.
pub fn output_parameter_key(label: &str) -> String {
    format!("{}{}", label, OUTPUT_KEY_SUFFIX)
}

/// Output keys available to `target`, nearest-first
///
/// Placeholder nodes never contribute keys.
pub fn available_output_keys(snapshot: &GraphSnapshot<'_>, target: &str) -> Vec<String> {
    upstream_nodes(snapshot, target)
        .iter()
        .filter(|node| !node.is_placeholder())
        .filter_map(|node| node.label())
        .map(output_parameter_key)
        .collect()
}

/// Value type of a workflow-level parameter declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowParameterType {
    String,
    Integer,
    Float,
    Boolean,
    Json,
}

impl WorkflowParameterType {
    /// Convert a raw string value to a typed JSON value
    ///
    /// Booleans accept `true`/`1` (case-insensitive) as true and anything
    /// else as false; integers, floats, and JSON reject malformed input.
    pub fn convert_value(&self, raw: &str) -> Result<serde_json::Value> {
        match self {
            Self::String => Ok(serde_json::Value::String(raw.to_string())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(serde_json::Value::from)
                .map_err(|_| GraphError::conversion(raw, "integer")),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(serde_json::Value::from)
                .map_err(|_| GraphError::conversion(raw, "float")),
            Self::Boolean => {
                let truthy = matches!(raw.to_lowercase().as_str(), "true" | "1");
                Ok(serde_json::Value::Bool(truthy))
            }
            Self::Json => Ok(serde_json::from_str(raw)?),
        }
    }
}

/// A workflow-level parameter declaration
///
/// Declared outside the graph and visible to every node regardless of
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowParameter {
    /// Key the parameter is referenced by
    pub key: String,
    /// Declared value type
    pub value_type: WorkflowParameterType,
    /// Raw default value, converted on demand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl WorkflowParameter {
    /// Create a declaration without a default value
    pub fn new(key: impl Into<String>, value_type: WorkflowParameterType) -> Self {
        Self {
            key: key.into(),
            value_type,
            default_value: None,
        }
    }

    /// Set the raw default value
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// The typed default value, if one is declared
    pub fn typed_default(&self) -> Option<Result<serde_json::Value>> {
        self.default_value
            .as_deref()
            .map(|raw| self.value_type.convert_value(raw))
    }
}

/// Where a bindable key comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BindingSource {
    /// Declared at the workflow level
    #[serde(rename_all = "camelCase")]
    WorkflowParameter { value_type: WorkflowParameterType },
    /// Output of an upstream node
    #[serde(rename_all = "camelCase")]
    NodeOutput { node_id: NodeId },
}

/// One bindable key and its owning source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub key: String,
    pub source: BindingSource,
}

/// A key claimed by more than one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingConflict {
    pub key: String,
    pub sources: Vec<BindingSource>,
}

/// The symbol table of keys bindable by one node
///
/// Built per target node from the workflow parameter declarations and the
/// node's upstream scope. Declarations come first, then output keys
/// nearest-first, mirroring the order the parameter picker presents them.
/// Collisions are kept, not rejected: rejecting would make label edits
/// destructive, so the table reports them and the editor decides.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    /// Build the table for `target`
    pub fn build(
        snapshot: &GraphSnapshot<'_>,
        parameters: &[WorkflowParameter],
        target: &str,
    ) -> Self {
        let mut bindings = Vec::new();

        for parameter in parameters {
            bindings.push(Binding {
                key: parameter.key.clone(),
                source: BindingSource::WorkflowParameter {
                    value_type: parameter.value_type,
                },
            });
        }

        for node in upstream_nodes(snapshot, target) {
            if node.is_placeholder() {
                continue;
            }
            let Some(label) = node.label() else {
                continue;
            };
            bindings.push(Binding {
                key: output_parameter_key(label),
                source: BindingSource::NodeOutput {
                    node_id: node.id.clone(),
                },
            });
        }

        Self { bindings }
    }

    /// All bindings in presentation order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Unique keys in presentation order (first claimant wins)
    pub fn keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.bindings
            .iter()
            .filter(|binding| seen.insert(binding.key.as_str()))
            .map(|binding| binding.key.clone())
            .collect()
    }

    /// The source owning a key (first claimant when keys collide)
    pub fn source_of(&self, key: &str) -> Option<&BindingSource> {
        self.bindings
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| &binding.source)
    }

    /// Whether a key is currently bindable
    ///
    /// A node's stored bindings may go stale after a rewire; they are kept
    /// as-is, and this is the editor's hook for marking them.
    pub fn is_visible(&self, key: &str) -> bool {
        self.bindings.iter().any(|binding| binding.key == key)
    }

    /// Keys claimed by more than one source, in presentation order
    pub fn conflicts(&self) -> Vec<BindingConflict> {
        let mut order: Vec<&str> = Vec::new();
        let mut by_key: HashMap<&str, Vec<BindingSource>> = HashMap::new();
        for binding in &self.bindings {
            let sources = by_key.entry(binding.key.as_str()).or_insert_with(|| {
                order.push(binding.key.as_str());
                Vec::new()
            });
            sources.push(binding.source.clone());
        }

        let mut conflicts = Vec::new();
        for key in order {
            let sources = &by_key[key];
            if sources.len() > 1 {
                conflicts.push(BindingConflict {
                    key: key.to_string(),
                    sources: sources.clone(),
                });
            }
        }
        conflicts
    }

    /// Number of bindings, including colliding ones
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
