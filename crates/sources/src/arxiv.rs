//! arXiv metadata client (Atom feed).
//!
//! Two flows against the same query endpoint:
//! - `fetch` — `id_list` lookup for one identifier, first entry only
//! - `search` — `search_query` relevance search, every entry parsed
//!
//! Parsing uses a quick-xml event reader because Atom namespaces make regex
//! parsing brittle. Zero entries from a search is `Ok(vec![])` ("no matches");
//! transport and parse failures are typed errors ("search failed") — the two
//! outcomes stay distinguishable for the caller.

use paperchat_core::document::DocumentContext;
use paperchat_core::error::SourceError;
use paperchat_core::paper::PaperSummary;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

const DEFAULT_QUERY_URL: &str = "https://export.arxiv.org/api/query";

/// Canonical abstract page URL for a bare identifier.
pub fn arxiv_abs_url(id: &str) -> String {
    format!("https://arxiv.org/abs/{}", id.trim())
}

/// Canonical PDF URL for a bare identifier.
pub fn arxiv_pdf_url(id: &str) -> String {
    format!("https://arxiv.org/pdf/{}.pdf", id.trim())
}

/// Normalize a URL or bare reference to a bare arXiv identifier.
///
/// Strips `/abs/` and `/pdf/` path prefixes and a trailing `.pdf`, so
/// `https://arxiv.org/pdf/2301.01234.pdf` and
/// `https://arxiv.org/abs/2301.01234` both yield `2301.01234`. Old-style
/// identifiers (`math.AG/0601001`) pass through unchanged.
pub fn normalize_arxiv_id(reference: &str) -> String {
    let r = reference.trim();
    let tail = if let Some(i) = r.find("/abs/") {
        &r[i + "/abs/".len()..]
    } else if let Some(i) = r.find("/pdf/") {
        &r[i + "/pdf/".len()..]
    } else {
        r
    };
    let tail = tail.trim().trim_matches('/');
    tail.strip_suffix(".pdf").unwrap_or(tail).trim().to_string()
}

/// Identifier from an entry's canonical `id` URL (`.../abs/<id>`).
fn arxiv_id_from_url(url: &str) -> Option<String> {
    let u = url.trim();
    let i = u.rfind("/abs/")?;
    let id = u[i + "/abs/".len()..].trim_matches('/').trim();
    (!id.is_empty()).then(|| id.to_string())
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Client for the arXiv Atom-feed query endpoint.
pub struct ArxivClient {
    query_url: String,
    client: reqwest::Client,
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivClient {
    /// Create a client against the public export endpoint.
    pub fn new() -> Self {
        Self::with_query_url(DEFAULT_QUERY_URL)
    }

    /// Create a client against a custom endpoint (mirrors, tests).
    pub fn with_query_url(query_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            query_url: query_url.into(),
            client,
        }
    }

    /// Fetch metadata for a single paper, by URL or bare identifier.
    pub async fn fetch(&self, reference: &str) -> Result<DocumentContext, SourceError> {
        let id = normalize_arxiv_id(reference);
        if id.is_empty() {
            return Err(SourceError::NotFound(reference.to_string()));
        }

        debug!(%id, "Fetching arXiv metadata");

        let body = self
            .query(&[("id_list", id.as_str()), ("max_results", "1")])
            .await?;

        let entry = parse_entries(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(id.clone()))?;

        let authors = entry.joined_authors();
        Ok(DocumentContext {
            source_url: arxiv_abs_url(&id),
            title: normalize_ws(&entry.title),
            authors,
            body_text: normalize_ws(&entry.summary),
        })
    }

    /// Relevance-ranked free-text search. Order is the upstream ranking.
    ///
    /// Zero matches is `Ok` with an empty list; a failed request is an `Err`.
    pub async fn search(
        &self,
        topic: &str,
        max_results: usize,
    ) -> Result<Vec<PaperSummary>, SourceError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Ok(Vec::new());
        }

        // Quote multi-word topics so they search as a phrase.
        let query = if topic.contains(' ') {
            format!("all:\"{}\"", topic.replace('"', ""))
        } else {
            format!("all:{topic}")
        };

        debug!(%topic, max_results, "Searching arXiv");

        let max = max_results.to_string();
        let body = self
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", max.as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ])
            .await?;

        let papers = parse_entries(&body)?
            .into_iter()
            .filter_map(|entry| {
                let id = arxiv_id_from_url(&entry.id_url)?;
                Some(PaperSummary {
                    title: normalize_ws(&entry.title),
                    authors: entry.joined_authors().unwrap_or_default(),
                    abstract_text: normalize_ws(&entry.summary),
                    abs_url: arxiv_abs_url(&id),
                    pdf_url: arxiv_pdf_url(&id),
                    source_id: id,
                })
            })
            .collect();

        Ok(papers)
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<String, SourceError> {
        let response = self
            .client
            .get(&self.query_url)
            .query(params)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Network(format!(
                "arXiv query returned status {}",
                response.status().as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))
    }
}

// --- Atom feed parsing ---

#[derive(Debug, Default)]
struct FeedEntry {
    id_url: String,
    title: String,
    summary: String,
    authors: Vec<String>,
}

impl FeedEntry {
    fn joined_authors(&self) -> Option<String> {
        let names: Vec<&str> = self
            .authors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect();
        (!names.is_empty()).then(|| names.join(", "))
    }
}

/// Parse every `entry` element of an Atom feed body.
fn parse_entries(xml: &str) -> Result<Vec<FeedEntry>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries: Vec<FeedEntry> = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut in_author = false;
    let mut leaf_tag = String::new();

    loop {
        match reader.read_event() {
            Err(e) => return Err(SourceError::Parse(e.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "entry" => {
                        current = Some(FeedEntry::default());
                        in_author = false;
                    }
                    "author" => in_author = current.is_some(),
                    _ => leaf_tag = name,
                }
            }
            Ok(Event::Text(t)) => {
                let Some(entry) = current.as_mut() else {
                    continue;
                };
                let text = t.unescape().map_err(|e| SourceError::Parse(e.to_string()))?;
                match leaf_tag.as_str() {
                    "title" => push_text(&mut entry.title, &text),
                    "summary" => push_text(&mut entry.summary, &text),
                    "id" => entry.id_url.push_str(text.trim()),
                    "name" if in_author => entry.authors.push(text.trim().to_string()),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "entry" => {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                    }
                    "author" => in_author = false,
                    _ => leaf_tag.clear(),
                }
            }
            Ok(_) => {}
        }
    }

    Ok(entries)
}

// Text nodes can arrive in fragments; rejoin them with a space.
fn push_text(target: &mut String, fragment: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(fragment.trim());
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:"quantum computing"</title>
  <entry>
    <id>http://arxiv.org/abs/2301.01234v1</id>
    <title>Quantum Computing
      Advances</title>
    <summary>  We survey recent advances
      in quantum computing.  </summary>
    <author><name>Alice Example</name></author>
    <author><name>Bob Sample</name></author>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <title>Attention Is All You Need</title>
    <summary>The dominant sequence transduction models.</summary>
    <author><name>Ashish Vaswani</name></author>
  </entry>
</feed>"#;

    #[test]
    fn normalization_strips_abs_and_pdf_forms() {
        assert_eq!(
            normalize_arxiv_id("https://arxiv.org/pdf/2301.01234.pdf"),
            "2301.01234"
        );
        assert_eq!(
            normalize_arxiv_id("https://arxiv.org/abs/2301.01234"),
            "2301.01234"
        );
        assert_eq!(normalize_arxiv_id("2301.01234"), "2301.01234");
    }

    #[test]
    fn normalization_keeps_old_style_ids() {
        assert_eq!(normalize_arxiv_id("math.AG/0601001"), "math.AG/0601001");
        assert_eq!(
            normalize_arxiv_id("http://arxiv.org/abs/cs/9901001v1"),
            "cs/9901001v1"
        );
    }

    #[test]
    fn canonical_urls_derive_from_id() {
        assert_eq!(arxiv_abs_url("2301.01234"), "https://arxiv.org/abs/2301.01234");
        assert_eq!(
            arxiv_pdf_url("2301.01234"),
            "https://arxiv.org/pdf/2301.01234.pdf"
        );
    }

    #[test]
    fn parse_all_entries_in_order() {
        let entries = parse_entries(FEED).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id_url, "http://arxiv.org/abs/2301.01234v1");
        assert_eq!(entries[1].title, "Attention Is All You Need");
    }

    #[test]
    fn entry_text_is_whitespace_normalized_downstream() {
        let entries = parse_entries(FEED).unwrap();
        assert_eq!(normalize_ws(&entries[0].title), "Quantum Computing Advances");
        assert_eq!(
            normalize_ws(&entries[0].summary),
            "We survey recent advances in quantum computing."
        );
    }

    #[test]
    fn authors_join_with_comma() {
        let entries = parse_entries(FEED).unwrap();
        assert_eq!(
            entries[0].joined_authors().as_deref(),
            Some("Alice Example, Bob Sample")
        );
    }

    #[test]
    fn feed_title_does_not_leak_into_entries() {
        let entries = parse_entries(FEED).unwrap();
        assert!(!entries[0].title.contains("ArXiv Query"));
    }

    #[test]
    fn empty_feed_parses_to_no_entries() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#;
        assert!(parse_entries(xml).unwrap().is_empty());
    }

    #[test]
    fn broken_xml_is_a_parse_error() {
        let err = parse_entries("<feed><entry><title>unclosed").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn id_from_entry_url_strips_abs_prefix() {
        assert_eq!(
            arxiv_id_from_url("http://arxiv.org/abs/2301.01234v1").as_deref(),
            Some("2301.01234v1")
        );
        assert!(arxiv_id_from_url("http://arxiv.org/other/1").is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let client = ArxivClient::with_query_url("http://127.0.0.1:1/api/query");
        let err = client.fetch("2301.01234").await.unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));

        let err = client.search("quantum", 5).await.unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));
    }

    #[tokio::test]
    async fn blank_reference_is_not_found() {
        let client = ArxivClient::with_query_url("http://127.0.0.1:1/api/query");
        let err = client.fetch("   ").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_topic_searches_to_empty() {
        let client = ArxivClient::with_query_url("http://127.0.0.1:1/api/query");
        assert!(client.search("  ", 5).await.unwrap().is_empty());
    }
}
