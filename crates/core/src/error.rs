//! Error types for the PaperChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. Every kind is
//! terminal-per-request but non-fatal-to-session: the session layer renders
//! each one as a normal assistant-role reply and the conversation continues.

use thiserror::Error;

/// The top-level error type for all PaperChat operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Gateway errors ---
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Metadata source errors ---
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures at the language-model gateway boundary.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API key not configured: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Connectivity(String),

    #[error("API request failed: {message} (status: {status_code})")]
    Provider { status_code: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// Failures when fetching metadata from a remote document index.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Nothing found for: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse feed: {0}")]
    Parse(String),
}
