pub mod text_to_image;

pub use text_to_image::{TextToImageTool, TOOL_NAME};
