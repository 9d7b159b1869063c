use axum::extract::multipart::{Field, Multipart};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::CaptionError;
use crate::generator::{sniff_mime_type, UploadedImage};
use crate::tone::Tone;

/// An uploaded image parked in the scratch directory.
///
/// The file is removed when this value is dropped, whichever way the request ends.
pub struct ScratchUpload {
    file: NamedTempFile,
    declared_mime_type: Option<String>,
}

impl ScratchUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the bytes back from disk and settles on a MIME type.
    pub async fn load(&self) -> Result<UploadedImage, CaptionError> {
        let bytes = tokio::fs::read(self.path()).await?;

        let mime_type = self
            .declared_mime_type
            .clone()
            .or_else(|| sniff_mime_type(&bytes).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(UploadedImage::new(bytes, mime_type))
    }
}

/// Fields of a `POST /api/caption` form.
pub struct CaptionForm {
    pub image: ScratchUpload,
    pub tone: String,
}

impl CaptionForm {
    pub async fn read(mut multipart: Multipart, upload_dir: &Path) -> Result<Self, CaptionError> {
        let mut image = None;
        let mut tone = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("image") => image = Some(write_scratch(field, upload_dir).await?),
                Some("tone") => tone = Some(field.text().await?),
                other => tracing::debug!(field = ?other, "ignoring unexpected form field"),
            }
        }

        let image =
            image.ok_or_else(|| CaptionError::Validation("missing `image` field".to_string()))?;

        Ok(Self {
            image,
            tone: resolve_tone(tone),
        })
    }
}

/// An absent or empty tone means the default one; anything else is kept as sent.
pub fn resolve_tone(raw: Option<String>) -> String {
    match raw {
        Some(tone) if !tone.is_empty() => tone,
        _ => Tone::default().to_string(),
    }
}

async fn write_scratch(mut field: Field<'_>, upload_dir: &Path) -> Result<ScratchUpload, CaptionError> {
    let declared_mime_type = field
        .content_type()
        .map(str::to_string)
        .filter(|mime| !mime.is_empty() && mime != "application/octet-stream");

    let file = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(upload_dir)?;

    let mut out = tokio::fs::File::create(file.path()).await?;
    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len();
        out.write_all(&chunk).await?;
    }
    out.flush().await?;

    tracing::debug!(path = %file.path().display(), size, "stored upload in scratch directory");

    Ok(ScratchUpload {
        file,
        declared_mime_type,
    })
}
