//! Dify plugin bridge for GPTProto's Gemini text-to-image API.
//!
//! The heart of the crate is the async task orchestration in [`gptproto`]:
//! submit a generation job, poll `predictions/{id}/result` until a terminal
//! state, and normalize the field-name drift the remote API shows across
//! versions. [`tools`] adapts that onto the plugin host's tool-invocation
//! envelope, and [`server`] is the thin HTTP glue in front of it.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gptproto;
pub mod logger;
pub mod models;
pub mod server;
pub mod tools;

pub use config::{Config, GptProtoConfig};
pub use error::{PluginError, Result};
pub use gptproto::{GptProtoClient, PollConfig, TaskApi, TaskClient};
pub use models::{
    AspectRatio, GenerationRequest, ImageSize, OutputFormat, TaskHandle, TaskState, TaskStatus,
    ToolResult,
};
pub use tools::TextToImageTool;
