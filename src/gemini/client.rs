use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::text::extract_text;
use super::types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const TEMPERATURE: f32 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 256;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey")]
    ApiKeyNotSet,

    #[error("API key rejected: {0}")]
    InvalidApiKey(String),

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("model not available: {0}")]
    ModelNotFound(String),

    #[error("empty response (the prompt may have been filtered by safety settings)")]
    EmptyResponse,

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GeminiError {
    /// Errors that will fail every later request in the same run as well.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            GeminiError::ApiKeyNotSet | GeminiError::InvalidApiKey(_) | GeminiError::QuotaExhausted(_)
        )
    }
}

/// Single-prompt text generation.
/// Implemented by `GeminiClient` for production; mock implementations used in tests.
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    fallback_model: Option<String>,
    base_url: String,
    initial_backoff: Duration,
}

impl GeminiClient {
    pub fn from_env(http: Client) -> Result<Self, GeminiError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| GeminiError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(GeminiError::ApiKeyNotSet);
        }
        let model = env::var("GEMINI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        // Set but empty disables the fallback.
        let fallback_model = match env::var("GEMINI_FALLBACK_MODEL") {
            Ok(m) => Some(m.trim().to_string()).filter(|m| !m.is_empty()),
            Err(_) => Some(DEFAULT_FALLBACK_MODEL.to_string()),
        }
        .filter(|m| *m != model);

        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            model,
            fallback_model,
            base_url: API_BASE.to_string(),
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str, fallback: Option<&str>) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
            fallback_model: fallback.map(str::to_string),
            base_url: base_url.to_string(),
            initial_backoff: Duration::from_millis(5),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, GeminiError> {
        let url = format!("{}/{}:generateContent", self.base_url, model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
                role: Some("user".to_string()),
            }],
            generation_config: Some(GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            }),
        };

        debug_assert!(
            url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key.0)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<GenerateContentResponse>(&text)
                && let Some(err) = &body.error
            {
                let classified = classify_api_error(err, status.as_u16());
                warn!(model, error = %classified, "Gemini API error");
                return Err(classified);
            }
            let end = text.floor_char_boundary(200);
            warn!(model, status = %status, "Gemini API error (no structured body)");
            return Err(classify_status(
                status.as_u16(),
                format!("HTTP {status}: {}", &text[..end]),
            ));
        }

        let body: GenerateContentResponse = response.json().await?;
        debug!(model, "gemini generation complete");

        if let Some(err) = &body.error {
            let classified = classify_api_error(err, status.as_u16());
            warn!(model, error = %classified, "Gemini API error in 200 response");
            return Err(classified);
        }

        extract_text(&body).ok_or(GeminiError::EmptyResponse)
    }

    async fn generate_with_retry(&self, model: &str, prompt: &str) -> Result<String, GeminiError> {
        let mut last_err = None;
        for attempt in 0..MAX_RETRIES {
            match self.generate_content(model, prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if is_retriable(&e) => {
                    last_err = Some(e);
                    if attempt + 1 < MAX_RETRIES {
                        let delay = jittered_backoff(self.initial_backoff, attempt);
                        debug!(
                            model,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            "retrying after transient error"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or(GeminiError::RateLimited))
    }
}

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        match self.generate_with_retry(&self.model, prompt).await {
            Err(e) if should_fall_back(&e) => match &self.fallback_model {
                Some(fallback) => {
                    warn!(
                        model = %self.model,
                        fallback = %fallback,
                        error = %e,
                        "primary model failed, trying fallback model"
                    );
                    self.generate_with_retry(fallback, prompt).await
                }
                None => Err(e),
            },
            other => other,
        }
    }
}

fn is_retriable(e: &GeminiError) -> bool {
    matches!(
        e,
        GeminiError::RateLimited
            | GeminiError::Api {
                code: 500..=599,
                ..
            }
    )
}

fn should_fall_back(e: &GeminiError) -> bool {
    matches!(e, GeminiError::ModelNotFound(_)) || is_retriable(e)
}

/// Equal jitter backoff: base/2 + rand(0, base/2).
fn jittered_backoff(initial: Duration, attempt: u32) -> Duration {
    let base = initial.as_millis() as u64 * 2u64.pow(attempt);
    let half = base / 2;
    Duration::from_millis(half + fastrand::u64(..half.max(1)))
}

fn classify_api_error(err: &ApiError, http_status: u16) -> GeminiError {
    let message = err
        .message
        .clone()
        .unwrap_or_else(|| "Unknown error".to_string());
    let code = err.code.unwrap_or(http_status);
    if code == 0 || (code == 200 && err.code.is_none()) {
        return GeminiError::Api {
            code: 0,
            message: format!("Unknown error (no status code): {message}"),
        };
    }
    classify_status(code, message)
}

fn classify_status(code: u16, message: String) -> GeminiError {
    let mentions_key = message.contains("API key") || message.contains("API_KEY");
    match code {
        429 => GeminiError::RateLimited,
        401 => GeminiError::InvalidApiKey(message),
        400 | 403 if mentions_key => GeminiError::InvalidApiKey(message),
        403 => GeminiError::QuotaExhausted(message),
        404 => GeminiError::ModelNotFound(message),
        code => GeminiError::Api { code, message },
    }
}
