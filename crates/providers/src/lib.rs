//! Gateway implementations for PaperChat.
//!
//! Currently one backend: Google's Gemini generate-content endpoint.
//! Everything speaks through the [`paperchat_core::Gateway`] trait, so the
//! session never depends on a concrete provider.

mod gemini;

pub use gemini::GeminiClient;
