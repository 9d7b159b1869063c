pub mod types;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::GeminiConfig;
use crate::error::CaptionError;
use crate::generator::{CaptionGenerator, UploadedImage};
use types::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};

/// Caption generator backed by the Google Gemini `generateContent` API.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

pub fn build_request(prompt: &str, image: &UploadedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.to_base64(),
                    },
                },
            ],
        }],
    }
}

#[async_trait]
impl CaptionGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, image: &UploadedImage) -> Result<String, CaptionError> {
        let payload = build_request(prompt, image);

        tracing::debug!(
            model = %self.config.model,
            mime_type = %image.mime_type,
            bytes = image.bytes.len(),
            "📤 Sending request to Gemini"
        );

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", &self.config.api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let excerpt: String = body.chars().take(500).collect();
            return Err(CaptionError::Upstream(format!("HTTP {status}: {excerpt}")));
        }

        let result: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| CaptionError::Upstream(format!("unexpected response shape: {e}")))?;

        let caption = result.text().ok_or_else(|| {
            let reason = result
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            CaptionError::Upstream(format!("no caption text in response ({reason})"))
        })?;

        Ok(caption.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(HashMap<String, String>, Value)>>>;

    /// Serves a fake `generateContent` endpoint and returns its base URL.
    async fn fake_gemini(status: StatusCode, reply: Value, seen: Seen) -> String {
        let app = Router::new().route(
            "/v1beta/models/:model",
            post(
                move |Query(query): Query<HashMap<String, String>>, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    let seen = seen.clone();
                    async move {
                        seen.lock().unwrap().push((query, body));
                        (status, Json(reply))
                    }
                },
            ),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            base_url,
            timeout: None,
        })
        .unwrap()
    }

    fn jpeg() -> UploadedImage {
        UploadedImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg")
    }

    #[test]
    fn test_request_shape() {
        let value = serde_json::to_value(build_request("Be funny", &jpeg())).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "Be funny" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/4A==" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "world" }] } },
                { "content": { "role": "model", "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_text_missing_when_blocked() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_text() {
        let seen: Seen = Arc::default();
        let base_url = fake_gemini(
            StatusCode::OK,
            json!({ "candidates": [{ "content": { "parts": [{ "text": "\n  Beach please.  \n" }] } }] }),
            seen.clone(),
        )
        .await;

        let caption = client_for(base_url)
            .generate("Generate a funny caption", &jpeg())
            .await
            .unwrap();
        assert_eq!(caption, "Beach please.");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (query, body) = &seen[0];
        assert_eq!(query.get("key").map(String::as_str), Some("test-key"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Generate a funny caption");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/jpeg");
    }

    #[tokio::test]
    async fn test_generate_maps_error_status_to_upstream() {
        let base_url = fake_gemini(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "quota exceeded" } }),
            Arc::default(),
        )
        .await;

        let err = client_for(base_url).generate("p", &jpeg()).await.unwrap_err();
        match err {
            CaptionError::Upstream(detail) => {
                assert!(detail.contains("429"));
                assert!(detail.contains("quota exceeded"));
            }
            other => panic!("Expected Upstream, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_upstream_error() {
        let base_url = fake_gemini(StatusCode::OK, json!({}), Arc::default()).await;

        let err = client_for(base_url).generate("p", &jpeg()).await.unwrap_err();
        assert_eq!(err.kind(), "upstream");
        assert!(err.to_string().contains("no candidates"));
    }

    #[tokio::test]
    async fn test_generate_unreachable_is_upstream_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let err = client_for("http://127.0.0.1:9".to_string())
            .generate("p", &jpeg())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "upstream");
    }
}
