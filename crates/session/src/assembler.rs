//! Context assembler — builds the exact payload handed to the gateway.
//!
//! Segment order for a request:
//!
//! 1. recent transcript turns, mapped to the provider's role vocabulary
//! 2. the document block, when a document context is active
//! 3. the persona instruction, when a non-neutral persona is active
//! 4. the literal new user message
//!
//! With no document and a neutral persona the payload degenerates to plain
//! history + message — no synthetic instruction text pollutes simple
//! conversations.
//!
//! Assembly is deterministic: identical inputs produce identical output.

use crate::transcript::Transcript;
use paperchat_core::document::DocumentContext;
use paperchat_core::gateway::GenerationOptions;
use paperchat_core::persona::Persona;
use paperchat_core::prompt::{OutboundPrompt, PromptRole, PromptSegment};
use paperchat_core::turn::Role;

/// History window for plain chat-style requests.
pub const HISTORY_WINDOW_FULL: usize = 6;

/// History window when a document block already grounds the prompt.
pub const HISTORY_WINDOW_MINIMAL: usize = 2;

/// The context assembler. Stateless — all inputs arrive per call.
pub struct PromptAssembler;

impl PromptAssembler {
    /// Build the outbound prompt and matching generation options for a new
    /// user message against the current session state.
    pub fn assemble(
        transcript: &Transcript,
        document: Option<&DocumentContext>,
        persona: Persona,
        user_message: &str,
    ) -> (OutboundPrompt, GenerationOptions) {
        let window = if document.is_some() {
            HISTORY_WINDOW_MINIMAL
        } else {
            HISTORY_WINDOW_FULL
        };

        let mut segments: Vec<PromptSegment> = transcript
            .recent(window)
            .into_iter()
            .map(|turn| PromptSegment {
                role: match turn.role {
                    Role::User => PromptRole::User,
                    Role::Assistant => PromptRole::Model,
                },
                text: turn.text.clone(),
            })
            .collect();

        if let Some(doc) = document {
            segments.push(PromptSegment::user(render_document_block(doc)));
        }

        if !persona.is_neutral() {
            segments.push(PromptSegment::user(render_persona_instruction(persona)));
        }

        segments.push(PromptSegment::user(user_message));

        let options = if document.is_some() {
            GenerationOptions::document()
        } else {
            GenerationOptions::chat()
        };

        (OutboundPrompt::new(segments), options)
    }
}

fn render_document_block(doc: &DocumentContext) -> String {
    let mut block = String::from("You are helping with questions about this document:\n");
    block.push_str(&format!("Title: {}\n", doc.title));
    if let Some(authors) = &doc.authors {
        block.push_str(&format!("Authors: {authors}\n"));
    }
    block.push_str(&format!("Source: {}\n", doc.source_id()));
    if !doc.body_text.is_empty() {
        block.push_str(&format!("Abstract: {}\n", doc.body_text));
    }
    block.push_str("Ground your answers in this document's content.");
    block
}

fn render_persona_instruction(persona: Persona) -> String {
    format!(
        "Respond as {}. Use analogies from that trade, keep any jargon \
         appropriate to it, and stay concise: two to three short paragraphs at most.",
        persona.descriptor()
    )
}
