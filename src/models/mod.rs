pub mod image;
pub mod tool;

pub use image::*;
pub use tool::*;
