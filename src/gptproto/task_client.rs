use crate::{
    error::{PluginError, Result},
    models::{GenerationRequest, TaskHandle, TaskState, TaskStatus},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Model route for the Gemini text-to-image endpoint.
const SUBMIT_PATH: &str = "google/gemini-3-pro-image-preview/text-to-image";

/// The service has renamed its submit identifier across API versions; probe
/// these in priority order.
const TASK_HANDLE_FIELDS: [&str; 4] = ["result_id", "id", "prediction_id", "task_id"];

/// Same story for the result image location.
const RESULT_URL_FIELDS: [&str; 3] = ["output", "url", "image_url"];

/// Status spellings the service is known to emit for in-flight tasks. Anything
/// else that is not a terminal spelling still polls as running, but gets a
/// warning so an unlisted terminal state ("cancelled") shows up in logs
/// instead of silently burning the timeout.
const KNOWN_TRANSIENT_STATUSES: [&str; 6] =
    ["submitted", "queued", "pending", "starting", "processing", "running"];

/// The submit and fetch-result calls, behind a seam so the orchestrator and
/// tool can be driven against scripted fakes.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn submit_task(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<TaskHandle>;

    async fn fetch_result(&self, api_key: &str, handle: &TaskHandle) -> Result<TaskStatus>;
}

/// HTTP client for the GPTProto prediction API. Stateless per call; the
/// caller's credential is passed in rather than stored, and no call is ever
/// retried.
pub struct TaskClient {
    client: Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TaskApi for TaskClient {
    async fn submit_task(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<TaskHandle> {
        let url = format!("{}/{}", self.base_url, SUBMIT_PATH);
        log::debug!("Submitting generation task to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PluginError::SubmitFailure {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let handle = extract_task_handle(&body).ok_or(PluginError::MissingTaskHandle)?;
        log::info!("Task submitted, id: {}", handle);
        Ok(handle)
    }

    async fn fetch_result(&self, api_key: &str, handle: &TaskHandle) -> Result<TaskStatus> {
        let url = format!("{}/predictions/{}/result", self.base_url, handle);

        let response = self.client.get(&url).bearer_auth(api_key).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PluginError::PollFailure {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        parse_task_status(&body)
    }
}

/// Some API versions wrap the payload as `{"data": {...}, "code": 200}`.
fn unwrap_data(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if data.is_object() => data,
        _ => body,
    }
}

pub(crate) fn extract_task_handle(body: &Value) -> Option<TaskHandle> {
    let data = unwrap_data(body);
    for field in TASK_HANDLE_FIELDS {
        if let Some(id) = data.get(field).and_then(Value::as_str) {
            if !id.is_empty() {
                return Some(TaskHandle(id.to_string()));
            }
        }
    }
    None
}

pub(crate) fn extract_result_url(body: &Value) -> Option<String> {
    let data = unwrap_data(body);

    // Newer versions return an "outputs" array.
    if let Some(first) = data
        .get("outputs")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(Value::as_str)
    {
        return Some(first.to_string());
    }

    for field in RESULT_URL_FIELDS {
        match data.get(field) {
            Some(Value::String(url)) if !url.is_empty() => return Some(url.clone()),
            Some(Value::Array(items)) => {
                if let Some(url) = items.first().and_then(Value::as_str) {
                    return Some(url.to_string());
                }
            }
            _ => {}
        }
    }
    None
}

pub(crate) fn map_remote_state(status: &str) -> TaskState {
    match status.to_ascii_lowercase().as_str() {
        "succeeded" | "completed" | "success" => TaskState::Succeeded,
        "failed" | "error" => TaskState::Failed,
        _ => TaskState::Running,
    }
}

fn extract_error_detail(body: &Value) -> String {
    let data = unwrap_data(body);
    data.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .unwrap_or("Unknown error")
        .to_string()
}

pub(crate) fn parse_task_status(body: &Value) -> Result<TaskStatus> {
    let data = unwrap_data(body);
    let remote_status = data
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let state = map_remote_state(&remote_status);
    match state {
        TaskState::Succeeded => {
            let result_url = extract_result_url(body).ok_or(PluginError::MissingResultUrl)?;
            Ok(TaskStatus {
                state,
                remote_status,
                result_url: Some(result_url),
                error_detail: None,
            })
        }
        TaskState::Failed => Ok(TaskStatus {
            state,
            remote_status,
            result_url: None,
            error_detail: Some(extract_error_detail(body)),
        }),
        _ => {
            let lowered = remote_status.to_ascii_lowercase();
            if !KNOWN_TRANSIENT_STATUSES.contains(&lowered.as_str()) {
                log::warn!(
                    "Unrecognized task status {:?}, treating as still running",
                    remote_status
                );
            }
            Ok(TaskStatus {
                state: TaskState::Running,
                remote_status,
                result_url: None,
                error_detail: None,
            })
        }
    }
}
