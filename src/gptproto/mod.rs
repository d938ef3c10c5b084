pub mod poller;
pub mod task_client;

use crate::{config::GptProtoConfig, error::Result, models::GenerationRequest, models::TaskStatus};
use std::sync::Arc;

pub use poller::PollConfig;
pub use task_client::{TaskApi, TaskClient};

/// One-stop client for the GPTProto prediction API: the task endpoints plus
/// the poll settings that drive them.
#[derive(Clone)]
pub struct GptProtoClient {
    api: Arc<dyn TaskApi>,
    poll: PollConfig,
}

impl GptProtoClient {
    pub fn new(config: &GptProtoConfig) -> Self {
        Self {
            api: Arc::new(TaskClient::new(config.base_url())),
            poll: PollConfig::from(config),
        }
    }

    /// Swap in a different `TaskApi`; tests use this to run against scripted
    /// fakes.
    pub fn with_api(api: Arc<dyn TaskApi>, poll: PollConfig) -> Self {
        Self { api, poll }
    }

    pub fn tasks(&self) -> &Arc<dyn TaskApi> {
        &self.api
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Submit a generation job and poll it to a terminal state.
    pub async fn generate_image(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<TaskStatus> {
        poller::run_to_completion(self.api.as_ref(), api_key, request, &self.poll).await
    }
}
