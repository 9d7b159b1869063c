pub mod client;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod prompt;
pub mod render;
pub mod server;
pub mod telemetry;
pub mod tone;

// Re-export common types
pub use error::CaptionError;
pub use generator::{CaptionGenerator, UploadedImage};
pub use tone::Tone;

/// Message returned to clients whenever a caption cannot be produced.
pub const FALLBACK_CAPTION: &str = "Something went wrong. Try again!";
