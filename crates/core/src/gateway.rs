//! Gateway trait — the abstraction over the generative-language provider.
//!
//! A Gateway knows how to serialize an assembled prompt into the provider's
//! wire format, issue a single call, and classify the outcome into success
//! text or a typed error. One attempt per request, no retries anywhere.
//!
//! The session loop calls `generate()` without knowing which backend is in
//! use — mock gateways implement this trait in tests.

use crate::error::GatewayError;
use crate::prompt::OutboundPrompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generation parameters for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum output length in tokens
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationOptions {
    /// Plain chat mode: longer responses allowed.
    pub fn chat() -> Self {
        Self {
            max_output_tokens: 512,
            temperature: 0.7,
        }
    }

    /// Document-grounded mode: shorter responses, same temperature.
    pub fn document() -> Self {
        Self {
            max_output_tokens: 300,
            temperature: 0.7,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::chat()
    }
}

/// The boundary component translating internal context into the external
/// generative-language provider's wire format.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// A human-readable name for this gateway (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send an assembled prompt and return the response text.
    ///
    /// A single synchronous-from-the-caller's-perspective attempt. Failures
    /// are classified into [`GatewayError`] kinds — never a raw fault.
    async fn generate(
        &self,
        prompt: &OutboundPrompt,
        options: &GenerationOptions,
    ) -> std::result::Result<String, GatewayError>;
}
