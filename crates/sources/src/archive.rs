//! Archive document fetcher — HTML scrape with heuristic fallback.
//!
//! Given a generic document URL, derive a human-readable title: fetch the
//! page and read its `<title>` element, trimming the decoration the Internet
//! Archive appends. When the page is unreachable or carries no usable title,
//! fall back to a label derived from the URL's final path segment. This
//! fetcher has no hard failure mode — only the title quality degrades.

use paperchat_core::document::DocumentContext;
use tracing::debug;

/// Title decorations trimmed from the tail, outermost first.
const TITLE_SUFFIXES: &[&str] = &[
    "Internet Archive",
    "Free Download, Borrow, and Streaming",
];

/// Client for arbitrary archive document pages.
pub struct ArchiveClient {
    client: reqwest::Client,
}

impl Default for ArchiveClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Fetch a document context for the URL. Always succeeds.
    pub async fn fetch_title(&self, url: &str) -> DocumentContext {
        let title = match self.page_title(url).await {
            Some(title) => title,
            None => {
                debug!(%url, "No usable page title, deriving from URL");
                title_from_url(url)
            }
        };

        DocumentContext {
            source_url: url.to_string(),
            title,
            authors: None,
            body_text: String::new(),
        }
    }

    async fn page_title(&self, url: &str) -> Option<String> {
        let response = self.client.get(url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body = response.text().await.ok()?;
        extract_title(&body)
    }
}

/// Pull the `<title>` element out of an HTML body and strip known suffixes.
fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_lowercase();
    let open = lower.find("<title")?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</title>")?;

    // Offsets are into the lowercased copy and can drift from `html` under
    // non-ASCII case folding.
    let raw = html.get(start..end).unwrap_or(&lower[start..end]);
    let mut title = normalize_ws(&decode_entities(raw));
    loop {
        let trimmed = trim_one_suffix(&title);
        if trimmed == title {
            break;
        }
        title = trimmed;
    }

    (!title.is_empty()).then_some(title)
}

fn trim_one_suffix(title: &str) -> String {
    for sep in [" : ", " | ", " - "] {
        if let Some((head, tail)) = title.rsplit_once(sep) {
            if TITLE_SUFFIXES.contains(&tail.trim()) {
                return head.trim().to_string();
            }
        }
    }
    title.to_string()
}

/// Derive a human-readable label from the URL's final path segment:
/// strip extension, replace separators with spaces.
fn title_from_url(url: &str) -> String {
    let trimmed = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');

    let after_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);

    // Last path segment, or the host when the URL has no path.
    let has_path = after_scheme.contains('/');
    let segment = after_scheme
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(after_scheme);

    let stem = match segment.rsplit_once('.') {
        // Only treat short trailing pieces of path segments as extensions;
        // a bare host keeps its dots.
        Some((stem, ext)) if has_path && !stem.is_empty() && ext.len() <= 5 => stem,
        _ => segment,
    };

    let label = normalize_ws(
        &stem
            .replace("%20", " ")
            .replace(['-', '_', '+'], " "),
    );

    if label.is_empty() {
        url.to_string()
    } else {
        label
    }
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}
