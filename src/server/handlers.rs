use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Html,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::CaptionError;
use crate::prompt::caption_prompt;
use crate::server::types::{AppState, CaptionResponse};
use crate::server::upload::CaptionForm;

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../web/index.html"))
}

pub async fn create_caption(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CaptionResponse>, CaptionError> {
    let start = Instant::now();

    // 1. Park the upload in the scratch dir; it is removed when `form` drops
    let form = CaptionForm::read(multipart?, &state.upload_dir).await?;
    let image = form.image.load().await?;

    // 2. Ask the model
    let prompt = caption_prompt(&form.tone);
    tracing::info!(
        tone = %form.tone,
        mime_type = %image.mime_type,
        bytes = image.bytes.len(),
        "generating caption"
    );
    let caption = state.generator.generate(&prompt, &image).await?;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "✅ Caption ready"
    );

    Ok(Json(CaptionResponse {
        caption: caption.trim().to_string(),
    }))
}
