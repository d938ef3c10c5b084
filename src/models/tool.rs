use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::image::{AspectRatio, ImageSize, OutputFormat};

/// Envelope the plugin host posts to `/api/dify/receive`.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginRequest {
    pub point: String,
    #[serde(default)]
    pub params: Option<PluginParams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginParams {
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_parameters: Option<ToolInvocationParams>,
    #[serde(default)]
    pub credentials: Option<ToolCredentials>,
}

/// Raw tool parameters as the host sends them; `prompt` presence is checked by
/// the tool, not by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInvocationParams {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub size: Option<ImageSize>,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolCredentials {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Payload returned to the host on a successful generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub image_url: String,
    pub status: String,
    pub prompt: String,
    pub size: ImageSize,
    pub aspect_ratio: AspectRatio,
    pub output_format: OutputFormat,
}

/// Flattened outcome of one tool invocation; the only shape the host ever
/// sees, success or not.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ToolOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(data: ToolOutput) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HostSuccess {
    pub result: Value,
}

#[derive(Debug, Serialize)]
pub struct HostError {
    pub error: String,
}
