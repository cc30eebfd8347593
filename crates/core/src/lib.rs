//! # PaperChat Core
//!
//! Domain types, traits, and error definitions for the PaperChat conversation
//! pipeline. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The gateway boundary is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping the language-model backend via configuration
//! - Easy testing with mock/stub gateways
//! - Clean dependency graph (all crates depend inward on core)

pub mod document;
pub mod error;
pub mod gateway;
pub mod paper;
pub mod persona;
pub mod prompt;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use document::DocumentContext;
pub use error::{Error, GatewayError, Result, SourceError};
pub use gateway::{Gateway, GenerationOptions};
pub use paper::PaperSummary;
pub use persona::Persona;
pub use prompt::{OutboundPrompt, PromptRole, PromptSegment};
pub use turn::{ChatTurn, Role};
