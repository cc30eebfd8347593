//! Document context — metadata loaded from an external index.
//!
//! At most one instance is active per session (a singleton, not a collection).
//! Created by a successful metadata fetch, replaced wholesale by a new load,
//! explicitly cleared by user action. `body_text` holds abstract/metadata text
//! only, never full-document content.

use serde::{Deserialize, Serialize};

/// Metadata for the document currently grounding the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentContext {
    /// Where the document came from (abs URL, archive page URL)
    pub source_url: String,

    /// Document title
    pub title: String,

    /// Author list, joined with ", " — absent when the source offers none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,

    /// Abstract or summary text (never full-document content)
    pub body_text: String,
}

impl DocumentContext {
    /// A short source identifier for display: the last path segment of the URL.
    pub fn source_id(&self) -> &str {
        self.source_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.source_url)
    }
}
