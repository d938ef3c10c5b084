use crate::{
    config::GptProtoConfig,
    credentials,
    error::{PluginError, Result},
    gptproto::GptProtoClient,
    models::{GenerationRequest, ToolCredentials, ToolInvocationParams, ToolOutput, ToolResult},
};

pub const TOOL_NAME: &str = "text_to_image";

/// Bridges one host tool invocation onto the submit/poll client. This is the
/// only place the error taxonomy is flattened into a user-facing message.
pub struct TextToImageTool {
    client: GptProtoClient,
}

impl TextToImageTool {
    pub fn new(config: &GptProtoConfig) -> Self {
        Self {
            client: GptProtoClient::new(config),
        }
    }

    pub fn with_client(client: GptProtoClient) -> Self {
        Self { client }
    }

    pub async fn invoke(
        &self,
        params: &ToolInvocationParams,
        credentials: &ToolCredentials,
    ) -> ToolResult {
        match self.run(params, credentials).await {
            Ok(output) => ToolResult::ok(output),
            Err(error) => {
                log::error!("[{}] {}", TOOL_NAME, error);
                ToolResult::err(error.to_string())
            }
        }
    }

    async fn run(
        &self,
        params: &ToolInvocationParams,
        credentials: &ToolCredentials,
    ) -> Result<ToolOutput> {
        let api_key = credentials.api_key.as_deref().unwrap_or("");
        credentials::validate(api_key)?;

        let prompt = params.prompt.as_deref().unwrap_or("");
        if prompt.is_empty() {
            return Err(PluginError::MissingPrompt);
        }

        let request = GenerationRequest {
            prompt: prompt.to_string(),
            size: params.size.unwrap_or_default(),
            aspect_ratio: params.aspect_ratio.unwrap_or_default(),
            output_format: params.output_format.unwrap_or_default(),
        };

        let preview: String = prompt.chars().take(50).collect();
        log::info!("[{}] Generating image for prompt: {:?}", TOOL_NAME, preview);

        let status = self.client.generate_image(api_key, &request).await?;
        let image_url = status.result_url.ok_or(PluginError::MissingResultUrl)?;
        log::info!("[{}] Image generated successfully", TOOL_NAME);

        Ok(ToolOutput {
            image_url,
            status: status.remote_status,
            prompt: request.prompt,
            size: request.size,
            aspect_ratio: request.aspect_ratio,
            output_format: request.output_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gptproto::{testing::ScriptedApi, PollConfig};
    use serde_json::json;
    use std::sync::Arc;

    fn tool_with(api: Arc<ScriptedApi>) -> TextToImageTool {
        TextToImageTool::with_client(GptProtoClient::with_api(api, PollConfig::default()))
    }

    fn credentials() -> ToolCredentials {
        ToolCredentials {
            api_key: Some("sk-test".into()),
        }
    }

    #[tokio::test]
    async fn missing_prompt_rejected_before_any_network_call() {
        let api = Arc::new(ScriptedApi::new());
        let tool = tool_with(api.clone());

        for params in [
            ToolInvocationParams::default(),
            ToolInvocationParams {
                prompt: Some(String::new()),
                ..Default::default()
            },
        ] {
            let result = tool.invoke(&params, &credentials()).await;
            assert!(!result.success);
            assert_eq!(result.error.as_deref(), Some("Prompt is required"));
        }
        assert_eq!(api.network_calls(), 0);
    }

    #[tokio::test]
    async fn malformed_credential_rejected_before_any_network_call() {
        let api = Arc::new(ScriptedApi::new());
        let tool = tool_with(api.clone());
        let params = ToolInvocationParams {
            prompt: Some("a red fox".into()),
            ..Default::default()
        };

        for api_key in [None, Some(String::new()), Some("api-123".into())] {
            let result = tool.invoke(&params, &ToolCredentials { api_key }).await;
            assert!(!result.success);
            assert_eq!(
                result.error.as_deref(),
                Some("Invalid API Key. Must start with \"sk-\"")
            );
        }
        assert_eq!(api.network_calls(), 0);
    }

    #[tokio::test]
    async fn successful_generation_round_trips_the_envelope() {
        let api = Arc::new(
            ScriptedApi::new().with_polls(vec![Ok(ScriptedApi::succeeded("https://x/img.png"))]),
        );
        let tool = tool_with(api.clone());
        let params = ToolInvocationParams {
            prompt: Some("a red fox".into()),
            ..Default::default()
        };

        let result = tool.invoke(&params, &credentials()).await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": true,
                "data": {
                    "image_url": "https://x/img.png",
                    "status": "succeeded",
                    "prompt": "a red fox",
                    "size": "1K",
                    "aspect_ratio": "1:1",
                    "output_format": "png"
                }
            })
        );
        assert_eq!(api.submit_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn remote_failure_flattened_to_error_message() {
        let api = Arc::new(
            ScriptedApi::new().with_polls(vec![Ok(ScriptedApi::failed("quota exceeded"))]),
        );
        let tool = tool_with(api);
        let params = ToolInvocationParams {
            prompt: Some("a red fox".into()),
            ..Default::default()
        };

        let result = tool.invoke(&params, &credentials()).await;
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error.as_deref(), Some("Task failed: quota exceeded"));
    }
}
