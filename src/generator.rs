use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};

use crate::error::CaptionError;

/// An image as received from the user, kept only for the duration of one request.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Sniffs the MIME type from the image content, if it is a format we recognise.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
}

/// Something that turns a prompt plus an image into caption text.
#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, image: &UploadedImage) -> Result<String, CaptionError>;
}
