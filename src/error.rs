use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid API Key. Must start with \"sk-\"")]
    InvalidCredentialFormat,

    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Failed to submit task: HTTP {status} - {body}")]
    SubmitFailure { status: u16, body: String },

    #[error("No task ID returned from submit response")]
    MissingTaskHandle,

    #[error("Failed to get result: HTTP {status} - {body}")]
    PollFailure { status: u16, body: String },

    #[error("Task succeeded but no image URL was returned")]
    MissingResultUrl,

    #[error("Task failed: {detail}")]
    RemoteTaskFailed { detail: String },

    #[error("Timeout waiting for result")]
    PollTimeout,

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PluginError>;
