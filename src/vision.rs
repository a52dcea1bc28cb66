// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Vision model client for titles and category suggestions
//!
//! Every call is a single stateless user turn: a text part and, optionally,
//! one inline base64 image. No conversation history is kept.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::GenericImageView;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::{Result, ShotsortError};

/// An image ready to be sent inline with a prompt
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub mime: &'static str,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    /// Read an image, downscaling it to PNG when its longest side exceeds
    /// `max_dimension`. Images that fail to decode are sent as-is.
    pub fn from_path(path: &Path, max_dimension: u32) -> Result<Self> {
        let raw = std::fs::read(path)?;

        match Self::downscale(&raw, max_dimension) {
            Ok(Some(png)) => Ok(Self { mime: "image/png", data: png }),
            Ok(None) => Ok(Self { mime: mime_for(path), data: raw }),
            Err(e) => {
                debug!("Could not decode {:?} ({}), sending raw bytes", path, e);
                Ok(Self { mime: mime_for(path), data: raw })
            }
        }
    }

    fn downscale(raw: &[u8], max_dimension: u32) -> Result<Option<Vec<u8>>> {
        let img = image::load_from_memory(raw)?;
        let (width, height) = img.dimensions();
        if width <= max_dimension && height <= max_dimension {
            return Ok(None);
        }

        let img = img.resize(max_dimension, max_dimension, image::imageops::FilterType::Triangle);
        let mut buffer = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)?;
        Ok(Some(buffer))
    }

    /// `data:` URL carrying the base64-encoded image
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, general_purpose::STANDARD.encode(&self.data))
    }
}

/// MIME type guessed from a file extension
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

/// A model that answers one prompt, optionally about one image.
///
/// Returns `None` on any failure; callers treat that as "skip this item".
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn describe(&self, prompt: &str, image: Option<&ImageAttachment>) -> Option<String>;
}

/// Longest pause between two attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Pause before the attempt that follows failed attempt `attempt` (1-based)
fn retry_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs).min(MAX_RETRY_DELAY)
}

/// Client for OpenAI-compatible chat completion endpoints
pub struct OpenAiClient {
    client: Client,
    url: String,
    model: String,
    api_key: String,
    retries: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Debug, PartialEq)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn user_turn(prompt: &str, image: Option<&ImageAttachment>) -> ChatMessage {
    let mut content = vec![ContentPart::Text { text: prompt.to_string() }];
    if let Some(image) = image {
        content.push(ContentPart::ImageUrl {
            image_url: ImageUrl { url: image.data_url() },
        });
    }
    ChatMessage { role: "user", content }
}

impl OpenAiClient {
    /// Create a new client from engine settings
    pub fn new(config: &EngineConfig, api_key: String) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            retries: config.retries,
        })
    }

    /// Send one request and return the model's text
    pub async fn complete(&self, prompt: &str, image: Option<&ImageAttachment>) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![user_turn(prompt, image)],
        };

        debug!("Sending request: model={}, image={}", self.model, image.is_some());

        let response = self.client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ShotsortError::ServiceUnavailable(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response.json().await?;
        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ShotsortError::ServiceUnavailable("Empty response from model".to_string()))
    }

    /// `complete` with exponential backoff; zero retries means a single attempt.
    ///
    /// Every failed attempt is logged; the last failure is returned.
    pub async fn complete_with_retry(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<String> {
        let attempts = self.retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            match self.complete(prompt, image).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < attempts => {
                    let delay = retry_delay(attempt);
                    warn!(
                        "Model request attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!("Model request gave up after {} attempt(s)", attempt);
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl VisionModel for OpenAiClient {
    async fn describe(&self, prompt: &str, image: Option<&ImageAttachment>) -> Option<String> {
        match self.complete_with_retry(prompt, image).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Model request failed: {}", e);
                None
            }
        }
    }
}
