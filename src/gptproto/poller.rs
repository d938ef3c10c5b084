use crate::{
    config::GptProtoConfig,
    error::{PluginError, Result},
    models::{GenerationRequest, TaskState, TaskStatus},
};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::task_client::TaskApi;

/// Poll cadence and total wall-clock budget for one task.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2_000),
            timeout: Duration::from_millis(300_000),
        }
    }
}

impl From<&GptProtoConfig> for PollConfig {
    fn from(config: &GptProtoConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            timeout: config.poll_timeout(),
        }
    }
}

/// Submits the task and polls until a terminal outcome. The timeout guard is
/// checked before each poll, so the budget is never overshot by more than one
/// interval. Each call owns its own timer; concurrent generations never share
/// state. Submit and poll errors terminate the loop immediately, unretried.
///
/// A caller that drops this future leaves the remote task orphaned; the
/// service expires those on its own.
pub async fn run_to_completion(
    api: &dyn TaskApi,
    api_key: &str,
    request: &GenerationRequest,
    config: &PollConfig,
) -> Result<TaskStatus> {
    let handle = api.submit_task(api_key, request).await?;
    let started = Instant::now();

    loop {
        if started.elapsed() > config.timeout {
            log::warn!(
                "Task {} still not terminal after {:?}, giving up",
                handle,
                config.timeout
            );
            return Err(PluginError::PollTimeout);
        }

        let status = api.fetch_result(api_key, &handle).await?;
        match status.state {
            TaskState::Succeeded => {
                log::info!("Task {} succeeded after {:?}", handle, started.elapsed());
                return Ok(status);
            }
            TaskState::Failed => {
                let detail = status
                    .error_detail
                    .unwrap_or_else(|| "Unknown error".to_string());
                return Err(PluginError::RemoteTaskFailed { detail });
            }
            _ => {
                log::debug!(
                    "Task {} reported {:?}, polling again in {:?}",
                    handle,
                    status.remote_status,
                    config.interval
                );
                sleep(config.interval).await;
            }
        }
    }
}
