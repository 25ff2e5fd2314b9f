use std::time::Duration;

use base64::Engine as _;
use reqwest::blocking::Client;

use crate::{
    environment::{
        model::{EnvironmentAsset, EnvironmentCategory, EnvironmentMeta, EnvironmentRequest},
        source::EnvironmentSource,
    },
    foundation::error::{MockupError, MockupResult},
};

/// Connection settings for an OpenAI-compatible image generation endpoint.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Full URL of the images endpoint.
    pub endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Quality hint sent with each request.
    pub quality: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Extra attempts after a transport error or 5xx response.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub backoff_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/images/generations".to_owned(),
            model: "dall-e-3".to_owned(),
            quality: "hd".to_owned(),
            timeout_ms: 120_000,
            max_retries: 2,
            backoff_ms: 500,
        }
    }
}

#[derive(serde::Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: String,
    n: u32,
    size: String,
    quality: &'a str,
    response_format: &'static str,
}

#[derive(serde::Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(serde::Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

/// Background generator talking to a remote image service.
pub struct RemoteImageSource {
    client: Client,
    api_key: String,
    config: RemoteConfig,
}

impl RemoteImageSource {
    /// Build a client with the configured timeout.
    pub fn new(api_key: impl Into<String>, config: RemoteConfig) -> MockupResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| MockupError::environment_source(format!("http client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn attempt(&self, body: &GenerationBody<'_>) -> Result<Vec<u8>, Attempt> {
        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(|e| Attempt::Retry(format!("request failed: {e}")))?;
        let status = resp.status();
        if status.is_server_error() {
            return Err(Attempt::Retry(format!("server returned {status}")));
        }
        if !status.is_success() {
            return Err(Attempt::Fatal(format!("server returned {status}")));
        }
        let parsed: GenerationResponse = resp
            .json()
            .map_err(|e| Attempt::Fatal(format!("malformed response: {e}")))?;
        let image = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Attempt::Fatal("response contained no images".to_owned()))?;
        if let Some(revised) = image.revised_prompt.as_deref() {
            tracing::debug!(revised, "service revised the prompt");
        }
        let b64 = image
            .b64_json
            .ok_or_else(|| Attempt::Fatal("response image has no b64_json".to_owned()))?;
        base64::engine::general_purpose::STANDARD
            .decode(b64.as_bytes())
            .map_err(|e| Attempt::Fatal(format!("invalid base64 image: {e}")))
    }
}

enum Attempt {
    Retry(String),
    Fatal(String),
}

impl EnvironmentSource for RemoteImageSource {
    #[tracing::instrument(skip(self, request), fields(orientation = ?request.orientation()))]
    fn acquire(&self, request: &EnvironmentRequest) -> MockupResult<EnvironmentAsset> {
        let size = request.generation_size();
        let body = GenerationBody {
            model: &self.config.model,
            prompt: request.render_prompt(),
            n: 1,
            size: format!("{}x{}", size.width, size.height),
            quality: &self.config.quality,
            response_format: "b64_json",
        };

        let mut delay = Duration::from_millis(self.config.backoff_ms);
        let mut attempt = 0u32;
        let bytes = loop {
            match self.attempt(&body) {
                Ok(bytes) => break bytes,
                Err(Attempt::Retry(msg)) if attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %msg, "environment generation failed, retrying");
                    std::thread::sleep(delay);
                    delay = delay.saturating_mul(2);
                }
                Err(Attempt::Retry(msg) | Attempt::Fatal(msg)) => {
                    return Err(MockupError::environment_source(msg));
                }
            }
        };

        let category = request.category.unwrap_or(EnvironmentCategory::Custom);
        let name = request
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.chars().take(60).collect::<String>())
            .unwrap_or_else(|| format!("generated {category}"));
        Ok(EnvironmentAsset {
            bytes,
            meta: EnvironmentMeta {
                name,
                category,
                tags: vec!["generated".to_owned()],
                ..EnvironmentMeta::untitled(request.orientation())
            },
        })
    }
}
