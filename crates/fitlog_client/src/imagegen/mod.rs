//! Muscle-growth image generation through a hosted generative model.

mod prompt;

pub use prompt::{BodyAttributes, DevelopmentBand, MuscleGrowth, build_prompt};

use crate::FitlogError;
use crate::config::ImageConfig;
use async_trait::async_trait;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

fn url_regex() -> Option<&'static Regex> {
    static URL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    URL_REGEX
        .get_or_init(|| Regex::new(r#"https?://[^\s"'<>)\]]+"#).ok())
        .as_ref()
}

#[async_trait]
pub trait ImageGenerator: Send + Sync + 'static {
    /// Render the body described by `body` at the given development levels and
    /// return a reference to the image (an http(s) URL or a `data:` URL).
    async fn generate_muscle_growth_image(
        &self,
        body: &BodyAttributes,
        growth: &MuscleGrowth,
        baseline_image_url: Option<&str>,
    ) -> Result<String, FitlogError>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// `generateContent` client for the Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiImageClient {
    base_url: String,
    model: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiImageClient {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: SecretString,
    ) -> Result<Self, FitlogError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FitlogError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &ImageConfig) -> Result<Self, FitlogError> {
        Self::new(&config.base_url, config.model.clone(), config.api_key.clone())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn request(&self, prompt: &str) -> Result<String, FitlogError> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        };
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(256).collect();
            return Err(FitlogError::Generation(format!(
                "status {}: {snippet}",
                status.as_u16()
            )));
        }
        let text = resp.text().await?;
        let json: JsonValue = serde_json::from_str(&text).map_err(|e| {
            FitlogError::Generation(format!("unreadable response: {e}"))
        })?;
        extract_image_reference(&json)
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate_muscle_growth_image(
        &self,
        body: &BodyAttributes,
        growth: &MuscleGrowth,
        baseline_image_url: Option<&str>,
    ) -> Result<String, FitlogError> {
        let prompt = build_prompt(body, growth, baseline_image_url);
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "requesting image");
        let result = self.request(&prompt).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(error) => {
                tracing::error!(model = %self.model, %error, "image generation failed");
                "error"
            }
        };
        metrics::counter!(
            "fitlog_image_generation_requests_total",
            "operation" => "generate_muscle_growth_image",
            "outcome" => outcome
        )
        .increment(1);
        result
    }
}

/// Pull an image reference out of a `generateContent` response.
///
/// Inline image data wins, then a file URI, then the first http(s) URL in any
/// text part.
pub fn extract_image_reference(response: &JsonValue) -> Result<String, FitlogError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for part in parts {
        let inline = part.get("inlineData").or_else(|| part.get("inline_data"));
        if let Some(inline) = inline
            && let Some(data) = inline.get("data").and_then(JsonValue::as_str)
        {
            let mime = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(JsonValue::as_str)
                .unwrap_or("image/png");
            return Ok(format!("data:{mime};base64,{data}"));
        }
    }

    for part in parts {
        if let Some(uri) = part.pointer("/fileData/fileUri").and_then(JsonValue::as_str) {
            return Ok(uri.to_string());
        }
    }

    for part in parts {
        if let Some(text) = part.get("text").and_then(JsonValue::as_str)
            && let Some(m) = url_regex().and_then(|re| re.find(text))
        {
            return Ok(m.as_str().to_string());
        }
    }

    Err(FitlogError::Generation(
        "response contained no image".to_string(),
    ))
}
