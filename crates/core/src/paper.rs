//! Paper search results.
//!
//! Produced only by the paper search service, in upstream relevance order,
//! and consumed for immediate display — never retained in session state.

use serde::{Deserialize, Serialize};

/// One paper from a relevance-ranked search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperSummary {
    /// Paper title
    pub title: String,

    /// Author names, joined with ", "
    pub authors: String,

    /// Abstract text
    pub abstract_text: String,

    /// Bare identifier (e.g. "2301.01234")
    pub source_id: String,

    /// Canonical abstract page URL
    pub abs_url: String,

    /// Canonical PDF URL
    pub pdf_url: String,
}
