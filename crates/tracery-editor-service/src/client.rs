//! Backend HTTP client for task runs.
//!
//! The editor talks to the automation backend for two things: submitting
//! a task node as a standalone run, and paging through the steps of a
//! finished run for review. [`StepBackend`] abstracts the transport so
//! tests and alternative hosts can substitute their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};
use crate::steps::StepRecord;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A one-based page request.
///
/// Serialized as query parameters; field names match the backend's
/// expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Create a page request, clamping both values to at least 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// The first page with the default page size.
    pub fn first() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Values collected by the run-task form.
///
/// Only the URL is required; everything else defaults on submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFormValues {
    pub url: String,
    pub webhook_callback_url: Option<String>,
    pub navigation_goal: Option<String>,
    pub data_extraction_goal: Option<String>,
    pub navigation_payload: Option<String>,
    pub extracted_information_schema: Option<String>,
}

/// The create-task payload in the backend's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub url: String,
    pub webhook_callback_url: String,
    pub navigation_goal: String,
    pub data_extraction_goal: String,
    pub proxy_location: String,
    pub navigation_payload: String,
    pub extracted_information_schema: String,
}

impl CreateTaskRequest {
    /// Translate form values into the wire format.
    ///
    /// Missing optional fields become empty strings rather than nulls, and
    /// the proxy location is pinned to `NONE`.
    pub fn from_form(form: &TaskFormValues) -> Self {
        Self {
            url: form.url.clone(),
            webhook_callback_url: form.webhook_callback_url.clone().unwrap_or_default(),
            navigation_goal: form.navigation_goal.clone().unwrap_or_default(),
            data_extraction_goal: form.data_extraction_goal.clone().unwrap_or_default(),
            proxy_location: "NONE".to_string(),
            navigation_payload: form.navigation_payload.clone().unwrap_or_default(),
            extracted_information_schema: form
                .extracted_information_schema
                .clone()
                .unwrap_or_default(),
        }
    }
}

/// The backend's acknowledgement of a created task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub task_id: String,
}

/// Trait for talking to the automation backend.
///
/// This abstracts over the transport so hosts can inject an HTTP client,
/// a mock, or an in-process backend.
#[async_trait]
pub trait StepBackend: Send + Sync {
    /// Fetch one page of steps for a task run.
    async fn list_steps(&self, task_id: &str, page: PageRequest) -> Result<Vec<StepRecord>>;

    /// Submit a task for standalone execution.
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask>;
}

/// [`StepBackend`] over HTTP using the backend's REST API.
pub struct HttpStepBackend {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpStepBackend {
    /// Create a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Attach an API key sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http_client.request(method, url);
        if let Some(ref api_key) = self.api_key {
            builder = builder.header("x-api-key", api_key);
        }
        builder
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::BackendStatus { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl StepBackend for HttpStepBackend {
    async fn list_steps(&self, task_id: &str, page: PageRequest) -> Result<Vec<StepRecord>> {
        let url = format!("{}/tasks/{}/steps", self.base_url, task_id);
        log::debug!("Fetching steps for task '{}' (page {})", task_id, page.page);

        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&page)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let steps = response.json().await?;
        Ok(steps)
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask> {
        let url = format!("{}/tasks", self.base_url);
        log::debug!("Creating task for '{}'", request.url);

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let created = response.json().await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{aggregate_steps, StepStatus};
    use chrono::Utc;

    #[test]
    fn test_page_request_clamps_to_one() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);

        let page = PageRequest::new(3, 25);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 25);
    }

    #[test]
    fn test_default_page_request() {
        let page = PageRequest::default();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_from_form_fills_defaults() {
        let form = TaskFormValues {
            url: "https://example.com".to_string(),
            navigation_goal: Some("Find the login form".to_string()),
            ..Default::default()
        };

        let request = CreateTaskRequest::from_form(&form);
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.navigation_goal, "Find the login form");
        assert_eq!(request.webhook_callback_url, "");
        assert_eq!(request.data_extraction_goal, "");
        assert_eq!(request.proxy_location, "NONE");
    }

    #[test]
    fn test_create_task_request_wire_shape() {
        let request = CreateTaskRequest::from_form(&TaskFormValues {
            url: "https://example.com".to_string(),
            ..Default::default()
        });

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["webhook_callback_url"], "");
        assert_eq!(json["proxy_location"], "NONE");
        assert!(json.get("webhookCallbackUrl").is_none());
    }

    /// In-memory backend serving a fixed step list.
    struct FixedBackend {
        steps: Vec<StepRecord>,
    }

    #[async_trait]
    impl StepBackend for FixedBackend {
        async fn list_steps(&self, _task_id: &str, page: PageRequest) -> Result<Vec<StepRecord>> {
            let start = ((page.page - 1) * page.page_size) as usize;
            Ok(self
                .steps
                .iter()
                .skip(start)
                .take(page.page_size as usize)
                .cloned()
                .collect())
        }

        async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask> {
            Ok(CreatedTask {
                task_id: format!("task-for-{}", request.url),
            })
        }
    }

    fn make_step(order: u32, retry_index: u32) -> StepRecord {
        StepRecord {
            step_id: format!("step-{}-{}", order, retry_index),
            order,
            retry_index,
            status: StepStatus::Completed,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_backend_pagination() {
        let backend = FixedBackend {
            steps: (0..5).map(|i| make_step(i, 0)).collect(),
        };

        let first = backend.list_steps("t-1", PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].order, 0);

        let last = backend.list_steps("t-1", PageRequest::new(3, 2)).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].order, 4);
    }

    #[tokio::test]
    async fn test_fetched_steps_feed_the_aggregator() {
        let backend = FixedBackend {
            steps: vec![make_step(1, 0), make_step(0, 0)],
        };

        let steps = backend.list_steps("t-1", PageRequest::first()).await.unwrap();
        let entries = aggregate_steps(steps);

        assert_eq!(entries[0].label, "Step 1");
        assert_eq!(entries[1].label, "Step 2");
    }

    #[tokio::test]
    async fn test_create_task_through_trait_object() {
        let backend: Box<dyn StepBackend> = Box::new(FixedBackend { steps: Vec::new() });

        let request = CreateTaskRequest::from_form(&TaskFormValues {
            url: "https://example.com".to_string(),
            ..Default::default()
        });
        let created = backend.create_task(&request).await.unwrap();

        assert_eq!(created.task_id, "task-for-https://example.com");
    }
}
