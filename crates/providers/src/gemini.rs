//! Gemini gateway implementation.
//!
//! Speaks the generateContent wire format: POST to a fixed endpoint with the
//! API key as a query parameter, JSON body of ordered role/content pairs plus
//! generation parameters.
//!
//! Outcome classification, in order:
//! - missing key → `Configuration`, detected before any network call
//! - transport failure → `Connectivity`
//! - non-success status with a structured provider message → `Provider`,
//!   message passed through; without one → `Provider`, generic status-coded
//! - success body lacking the candidate/content shape → `MalformedResponse`
//! - success → all text fragments of the first candidate, joined and trimmed
//!
//! A single attempt per request. No retries.

use async_trait::async_trait;
use paperchat_core::error::GatewayError;
use paperchat_core::gateway::{Gateway, GenerationOptions};
use paperchat_core::prompt::{OutboundPrompt, PromptRole};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A Gemini generate-content client.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new client against the public Gemini endpoint.
    ///
    /// `api_key` may be absent — `generate` then short-circuits to a
    /// configuration error without touching the network.
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, model, api_key)
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
        }
    }

    /// Convert an assembled prompt into the wire content list.
    fn to_api_contents(prompt: &OutboundPrompt) -> Vec<ApiContent> {
        prompt
            .segments()
            .iter()
            .map(|segment| ApiContent {
                role: match segment.role {
                    PromptRole::User => "user".into(),
                    PromptRole::Model => "model".into(),
                },
                parts: vec![ApiPart::new(segment.text.clone())],
            })
            .collect()
    }

    /// Extract response text, or classify why the body is unusable.
    fn extract_text(body: ApiResponse) -> Result<String, GatewayError> {
        let candidate = body
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .ok_or_else(|| GatewayError::MalformedResponse("no candidates in body".into()))?;

        let parts = candidate
            .content
            .map(|c| c.parts)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GatewayError::MalformedResponse("candidate has no content parts".into()))?;

        let text = parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(GatewayError::MalformedResponse(
                "candidate parts carry no text".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl Gateway for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        prompt: &OutboundPrompt,
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GatewayError::Configuration(
                "no Gemini API key is set".into(),
            ));
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let body = ApiRequest {
            contents: Self::to_api_contents(prompt),
            generation_config: ApiGenerationConfig {
                max_output_tokens: options.max_output_tokens,
                temperature: options.temperature,
            },
        };

        debug!(model = %self.model, segments = prompt.len(), "Sending generate request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Connectivity(e.to_string()))?;

        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| GatewayError::Connectivity(e.to_string()))?;

        if !(200..300).contains(&status) {
            warn!(status, "Provider returned error");
            // The provider wraps failures as {"error": {"message": ...}} —
            // pass that message through when it parses, fall back to a
            // status-coded message when it doesn't.
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or_else(|| format!("API request failed with status code {status}"));
            return Err(GatewayError::Provider {
                status_code: status,
                message,
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&raw)
            .map_err(|e| GatewayError::MalformedResponse(format!("unparseable body: {e}")))?;

        Self::extract_text(parsed)
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<ApiContent>,
    generation_config: ApiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiContent {
    role: String,
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

impl ApiPart {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Option<Vec<ApiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidateContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}
