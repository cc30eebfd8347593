//! Conversation state and context assembly for PaperChat.
//!
//! The session is the single mutator of conversation state: every handler
//! takes `&mut self`, so a second submission cannot overlap an in-flight one
//! within a session by construction. All errors surface as normal
//! assistant-role replies — the conversation stays usable after any failure.

pub mod assembler;
pub mod session;
pub mod transcript;

pub use assembler::{HISTORY_WINDOW_FULL, HISTORY_WINDOW_MINIMAL, PromptAssembler};
pub use session::ChatSession;
pub use transcript::Transcript;
