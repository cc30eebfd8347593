//! External metadata sources for PaperChat.
//!
//! Two independent fetchers and a search service, all best-effort and
//! single-attempt:
//!
//! - [`ArxivClient`] — fetches paper metadata from the arXiv Atom feed, by
//!   identifier or by free-text relevance search
//! - [`ArchiveClient`] — derives a document title from an arbitrary archive
//!   page, degrading to a URL-derived label rather than failing
//! - [`search_intent`] — scans a chat message for natural-language search
//!   trigger phrases

pub mod archive;
pub mod arxiv;
pub mod intent;

pub use archive::ArchiveClient;
pub use arxiv::{ArxivClient, arxiv_abs_url, arxiv_pdf_url, normalize_arxiv_id};
pub use intent::search_intent;
