//! Client side of the caption flow: pick an image and a tone, ask the server, show the result.

use anyhow::{bail, Context};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

use crate::generator::{sniff_mime_type, UploadedImage};
use crate::render::{render_caption, RenderedCaption};
use crate::server::types::CaptionResponse;
use crate::tone::Tone;
use crate::FALLBACK_CAPTION;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// The image currently picked by the user.
#[derive(Clone, Debug)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub image: UploadedImage,
}

impl SelectedImage {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}

/// Reads an image from disk, refusing anything that is not an image.
pub async fn load_image(path: &Path) -> anyhow::Result<SelectedImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mime_type = sniff_mime_type(&bytes)
        .or_else(|| {
            image::ImageFormat::from_path(path)
                .ok()
                .map(|format| format.to_mime_type())
        })
        .filter(|mime| mime.starts_with("image/"));

    let Some(mime_type) = mime_type else {
        bail!("{} is not an image", path.display());
    };

    Ok(SelectedImage {
        path: path.to_path_buf(),
        image: UploadedImage::new(bytes, mime_type),
    })
}

/// Talks to `POST /api/caption`.
#[derive(Clone, Debug)]
pub struct CaptionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CaptionClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/caption", server_url.trim_end_matches('/')),
        }
    }

    /// The server answers with the same JSON shape on success and failure, so the
    /// body is decoded whatever the status.
    pub async fn request_caption(
        &self,
        image: &SelectedImage,
        tone: Tone,
    ) -> anyhow::Result<String> {
        let part = Part::bytes(image.image.bytes.clone())
            .file_name(image.file_name())
            .mime_str(&image.image.mime_type)?;
        let form = Form::new()
            .part("image", part)
            .text("tone", tone.to_string());

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body: CaptionResponse = response
            .json()
            .await
            .with_context(|| format!("unreadable reply from server (HTTP {status})"))?;

        Ok(body.caption)
    }
}

/// Holds the loading flag up for as long as it lives, including when the
/// surrounding future is dropped mid-request.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// What the user has picked and what came back.
#[derive(Debug, Default)]
pub struct ClientState {
    image: Option<SelectedImage>,
    tone: Tone,
    caption: Option<String>,
    loading: bool,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current image; the previous one is dropped.
    pub async fn select_image(&mut self, path: &Path) -> anyhow::Result<&SelectedImage> {
        let selected = load_image(path).await?;
        Ok(&*self.image.insert(selected))
    }

    pub fn select_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Asks the server for a caption. Does nothing without an image or while a
    /// request is already running.
    pub async fn generate(&mut self, client: &CaptionClient) -> Option<&str> {
        if self.loading {
            return None;
        }
        let image = self.image.as_ref()?;

        let outcome = {
            let _loading = LoadingGuard::set(&mut self.loading);
            client.request_caption(image, self.tone).await
        };

        let caption = outcome.unwrap_or_else(|err| {
            tracing::warn!(error = %format!("{err:#}"), "caption request failed");
            FALLBACK_CAPTION.to_string()
        });

        self.caption.replace(caption);
        self.caption.as_deref()
    }

    /// The caption as it should be displayed for the selected tone.
    pub fn rendered(&self) -> Option<RenderedCaption> {
        self.caption
            .as_deref()
            .map(|caption| render_caption(caption, self.tone))
    }
}
