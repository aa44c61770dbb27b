//! Node configuration editing.
//!
//! The configuration panel shows one node in either basic or advanced
//! mode. Both modes edit the same working copy: the display mode only
//! selects which fields are rendered, never which values exist. Edits are
//! written through to the document immediately, keeping the panel and the
//! canvas node in step.

use editor_graph::types::{NodeId, NodePayload, TaskData};
use serde::{Deserialize, Serialize};

use crate::document::WorkflowDocument;
use crate::error::{Result, ServiceError};

/// Which projection of a task node's fields the panel renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    Basic,
    Advanced,
}

impl DisplayMode {
    /// The fields rendered in this mode.
    pub fn visible_fields(&self) -> &'static [TaskField] {
        match self {
            Self::Basic => BASIC_FIELDS,
            Self::Advanced => ADVANCED_FIELDS,
        }
    }
}

/// A renderable field of a task node's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Label,
    Url,
    NavigationGoal,
    ParameterKeys,
    DataExtractionGoal,
    DataSchema,
    MaxRetries,
    MaxStepsOverride,
    AllowDownloads,
    DownloadSuffix,
    ErrorCodeMapping,
    TotpVerificationUrl,
    TotpIdentifier,
}

/// Fields shown in basic mode.
pub const BASIC_FIELDS: &[TaskField] = &[
    TaskField::Label,
    TaskField::Url,
    TaskField::NavigationGoal,
    TaskField::ParameterKeys,
];

/// Fields shown in advanced mode.
pub const ADVANCED_FIELDS: &[TaskField] = &[
    TaskField::Label,
    TaskField::Url,
    TaskField::NavigationGoal,
    TaskField::ParameterKeys,
    TaskField::DataExtractionGoal,
    TaskField::DataSchema,
    TaskField::MaxRetries,
    TaskField::MaxStepsOverride,
    TaskField::AllowDownloads,
    TaskField::DownloadSuffix,
    TaskField::ErrorCodeMapping,
    TaskField::TotpVerificationUrl,
    TaskField::TotpIdentifier,
];

/// A single field edit, carrying the new value.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskFieldEdit {
    Label(String),
    Url(String),
    NavigationGoal(String),
    DataExtractionGoal(String),
    DataSchema(String),
    ErrorCodeMapping(String),
    MaxRetries(Option<u32>),
    MaxStepsOverride(Option<u32>),
    AllowDownloads(bool),
    DownloadSuffix(Option<String>),
    TotpVerificationUrl(Option<String>),
    TotpIdentifier(Option<String>),
    ParameterKeys(Vec<String>),
}

impl TaskFieldEdit {
    /// The field this edit writes to.
    pub fn field(&self) -> TaskField {
        match self {
            Self::Label(_) => TaskField::Label,
            Self::Url(_) => TaskField::Url,
            Self::NavigationGoal(_) => TaskField::NavigationGoal,
            Self::DataExtractionGoal(_) => TaskField::DataExtractionGoal,
            Self::DataSchema(_) => TaskField::DataSchema,
            Self::ErrorCodeMapping(_) => TaskField::ErrorCodeMapping,
            Self::MaxRetries(_) => TaskField::MaxRetries,
            Self::MaxStepsOverride(_) => TaskField::MaxStepsOverride,
            Self::AllowDownloads(_) => TaskField::AllowDownloads,
            Self::DownloadSuffix(_) => TaskField::DownloadSuffix,
            Self::TotpVerificationUrl(_) => TaskField::TotpVerificationUrl,
            Self::TotpIdentifier(_) => TaskField::TotpIdentifier,
            Self::ParameterKeys(_) => TaskField::ParameterKeys,
        }
    }
}

/// The configuration panel state for one task node.
///
/// Holds a working copy of the node's [`TaskData`]; every accepted edit
/// updates the working copy and writes it through to the document in the
/// same call. Edits to non-editable nodes are ignored and report `false`.
pub struct NodeConfigStore {
    node_id: NodeId,
    values: TaskData,
    mode: DisplayMode,
}

impl NodeConfigStore {
    /// Open the configuration panel for a task node.
    ///
    /// Starts in basic mode. Fails if the node does not exist or is not a
    /// task node.
    pub fn mount(document: &WorkflowDocument, node_id: &str) -> Result<Self> {
        let node = document
            .workflow()
            .find_node(node_id)
            .ok_or_else(|| ServiceError::NodeNotFound(node_id.to_string()))?;

        match &node.payload {
            NodePayload::Task(data) => Ok(Self {
                node_id: node.id.clone(),
                values: data.clone(),
                mode: DisplayMode::Basic,
            }),
            _ => Err(ServiceError::NotATaskNode(node_id.to_string())),
        }
    }

    /// The node this panel is editing.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// The current working copy of the node's configuration.
    pub fn values(&self) -> &TaskData {
        &self.values
    }

    /// The current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switch the display mode without touching any values.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// The fields rendered in the current mode.
    pub fn visible_fields(&self) -> &'static [TaskField] {
        self.mode.visible_fields()
    }

    /// Apply a field edit and write it through to the document.
    ///
    /// Returns `true` if the edit was applied, `false` if the node is not
    /// editable (the edit is silently dropped, matching the panel's
    /// read-only behavior).
    pub fn apply(&mut self, edit: TaskFieldEdit, document: &mut WorkflowDocument) -> Result<bool> {
        if !self.values.editable {
            log::debug!("Ignoring edit to non-editable node '{}'", self.node_id);
            return Ok(false);
        }

        match edit {
            TaskFieldEdit::Label(value) => self.values.label = value,
            TaskFieldEdit::Url(value) => self.values.url = value,
            TaskFieldEdit::NavigationGoal(value) => self.values.navigation_goal = value,
            TaskFieldEdit::DataExtractionGoal(value) => self.values.data_extraction_goal = value,
            TaskFieldEdit::DataSchema(value) => self.values.data_schema = value,
            TaskFieldEdit::ErrorCodeMapping(value) => self.values.error_code_mapping = value,
            TaskFieldEdit::MaxRetries(value) => self.values.max_retries = value,
            TaskFieldEdit::MaxStepsOverride(value) => self.values.max_steps_override = value,
            TaskFieldEdit::AllowDownloads(value) => self.values.allow_downloads = value,
            TaskFieldEdit::DownloadSuffix(value) => self.values.download_suffix = value,
            TaskFieldEdit::TotpVerificationUrl(value) => self.values.totp_verification_url = value,
            TaskFieldEdit::TotpIdentifier(value) => self.values.totp_identifier = value,
            TaskFieldEdit::ParameterKeys(value) => self.values.parameter_keys = value,
        }

        self.push(document)?;
        Ok(true)
    }

    /// Whether the extraction schema sub-field is enabled.
    pub fn data_schema_enabled(&self) -> bool {
        self.values.data_schema_enabled()
    }

    /// Toggle the extraction schema sub-field.
    ///
    /// Enabling resets the schema to empty JSON; disabling stores the
    /// disabled sentinel. Toggling to the current state is a no-op.
    pub fn set_data_schema_enabled(
        &mut self,
        enabled: bool,
        document: &mut WorkflowDocument,
    ) -> Result<bool> {
        if enabled == self.data_schema_enabled() {
            return Ok(false);
        }
        let value = if enabled {
            TaskData::JSON_EMPTY
        } else {
            TaskData::JSON_DISABLED
        };
        self.apply(TaskFieldEdit::DataSchema(value.to_string()), document)
    }

    /// Whether the custom error messages sub-field is enabled.
    pub fn error_code_mapping_enabled(&self) -> bool {
        self.values.error_code_mapping_enabled()
    }

    /// Toggle the custom error messages sub-field.
    pub fn set_error_code_mapping_enabled(
        &mut self,
        enabled: bool,
        document: &mut WorkflowDocument,
    ) -> Result<bool> {
        if enabled == self.error_code_mapping_enabled() {
            return Ok(false);
        }
        let value = if enabled {
            TaskData::JSON_EMPTY
        } else {
            TaskData::JSON_DISABLED
        };
        self.apply(TaskFieldEdit::ErrorCodeMapping(value.to_string()), document)
    }

    fn push(&self, document: &mut WorkflowDocument) -> Result<()> {
        document.update_node_data(&self.node_id, NodePayload::Task(self.values.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_graph::WorkflowBuilder;

    fn make_document() -> WorkflowDocument {
        let workflow = WorkflowBuilder::new("wf-1", "Test")
            .add_task("task", "Extract", (0.0, 0.0))
            .add_task("locked", "Locked", (0.0, 200.0))
            .editable(false)
            .add_loop("loop", "Each", (0.0, 400.0))
            .build();
        WorkflowDocument::new(workflow)
    }

    fn stored_task(document: &WorkflowDocument, node_id: &str) -> TaskData {
        match &document.workflow().find_node(node_id).unwrap().payload {
            NodePayload::Task(data) => data.clone(),
            other => panic!("expected task payload, got {:?}", other),
        }
    }

    #[test]
    fn test_mount_requires_task_node() {
        let document = make_document();

        assert!(NodeConfigStore::mount(&document, "task").is_ok());
        assert!(matches!(
            NodeConfigStore::mount(&document, "loop"),
            Err(ServiceError::NotATaskNode(_))
        ));
        assert!(matches!(
            NodeConfigStore::mount(&document, "ghost"),
            Err(ServiceError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_edit_updates_panel_and_document() {
        let mut document = make_document();
        let mut panel = NodeConfigStore::mount(&document, "task").unwrap();

        let applied = panel
            .apply(
                TaskFieldEdit::Url("https://example.com".to_string()),
                &mut document,
            )
            .unwrap();

        assert!(applied);
        assert_eq!(panel.values().url, "https://example.com");
        assert_eq!(stored_task(&document, "task").url, "https://example.com");
    }

    #[test]
    fn test_non_editable_node_ignores_edits() {
        let mut document = make_document();
        let mut panel = NodeConfigStore::mount(&document, "locked").unwrap();
        let revision = document.revision();

        let applied = panel
            .apply(TaskFieldEdit::Label("Renamed".to_string()), &mut document)
            .unwrap();

        assert!(!applied);
        assert_eq!(panel.values().label, "Locked");
        assert_eq!(stored_task(&document, "locked").label, "Locked");
        assert_eq!(document.revision(), revision);
    }

    #[test]
    fn test_mode_switch_preserves_values() {
        let mut document = make_document();
        let mut panel = NodeConfigStore::mount(&document, "task").unwrap();

        panel
            .apply(
                TaskFieldEdit::NavigationGoal("Find the invoice".to_string()),
                &mut document,
            )
            .unwrap();
        panel.set_mode(DisplayMode::Advanced);
        panel
            .apply(TaskFieldEdit::MaxRetries(Some(3)), &mut document)
            .unwrap();
        panel.set_mode(DisplayMode::Basic);

        // Values survive mode flips; only the rendered field set changes.
        assert_eq!(panel.values().navigation_goal, "Find the invoice");
        assert_eq!(panel.values().max_retries, Some(3));
        assert_eq!(panel.visible_fields(), BASIC_FIELDS);
    }

    #[test]
    fn test_edits_across_modes_last_write_wins() {
        let mut document = make_document();
        let mut panel = NodeConfigStore::mount(&document, "task").unwrap();

        panel
            .apply(TaskFieldEdit::Url("https://basic".to_string()), &mut document)
            .unwrap();
        panel.set_mode(DisplayMode::Advanced);
        panel
            .apply(TaskFieldEdit::Url("https://advanced".to_string()), &mut document)
            .unwrap();

        assert_eq!(stored_task(&document, "task").url, "https://advanced");
    }

    #[test]
    fn test_data_schema_toggle_round_trip() {
        let mut document = make_document();
        let mut panel = NodeConfigStore::mount(&document, "task").unwrap();
        assert!(!panel.data_schema_enabled());

        panel.set_data_schema_enabled(true, &mut document).unwrap();
        assert_eq!(panel.values().data_schema, TaskData::JSON_EMPTY);

        panel
            .apply(
                TaskFieldEdit::DataSchema("{\"title\": \"string\"}".to_string()),
                &mut document,
            )
            .unwrap();

        panel.set_data_schema_enabled(false, &mut document).unwrap();
        assert_eq!(panel.values().data_schema, TaskData::JSON_DISABLED);

        // Re-enabling starts from empty JSON, not the old content.
        panel.set_data_schema_enabled(true, &mut document).unwrap();
        assert_eq!(panel.values().data_schema, TaskData::JSON_EMPTY);
        assert_eq!(stored_task(&document, "task").data_schema, TaskData::JSON_EMPTY);
    }

    #[test]
    fn test_toggle_to_same_state_is_noop() {
        let mut document = make_document();
        let mut panel = NodeConfigStore::mount(&document, "task").unwrap();
        let revision = document.revision();

        let applied = panel.set_data_schema_enabled(false, &mut document).unwrap();

        assert!(!applied);
        assert_eq!(document.revision(), revision);
    }

    #[test]
    fn test_error_code_mapping_toggle() {
        let mut document = make_document();
        let mut panel = NodeConfigStore::mount(&document, "task").unwrap();

        panel
            .set_error_code_mapping_enabled(true, &mut document)
            .unwrap();
        assert_eq!(panel.values().error_code_mapping, TaskData::JSON_EMPTY);

        panel
            .set_error_code_mapping_enabled(false, &mut document)
            .unwrap();
        assert_eq!(panel.values().error_code_mapping, TaskData::JSON_DISABLED);
    }

    #[test]
    fn test_basic_fields_are_subset_of_advanced() {
        for field in BASIC_FIELDS {
            assert!(ADVANCED_FIELDS.contains(field));
        }
        assert!(ADVANCED_FIELDS.len() > BASIC_FIELDS.len());
    }
}
