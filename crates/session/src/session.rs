//! The chat session — explicit command handlers over conversation state.
//!
//! One session owns one transcript, at most one document context, and one
//! active persona. Handlers are invoked by whatever front-end adapter owns
//! the UI; the session never depends on a particular event model.
//!
//! Every external failure is classified and rendered as a normal
//! assistant-role reply. Errors are conversational, not exceptional: the
//! session survives every one of them.

use crate::assembler::PromptAssembler;
use crate::transcript::Transcript;
use paperchat_config::AppConfig;
use paperchat_core::document::DocumentContext;
use paperchat_core::error::{GatewayError, SourceError};
use paperchat_core::gateway::Gateway;
use paperchat_core::paper::PaperSummary;
use paperchat_core::persona::Persona;
use paperchat_core::turn::ChatTurn;
use paperchat_sources::{ArchiveClient, ArxivClient, arxiv_pdf_url, search_intent};
use tracing::{debug, warn};

/// Default result cap for paper searches.
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// A single user's conversation session.
pub struct ChatSession {
    config: AppConfig,
    gateway: Box<dyn Gateway>,
    arxiv: ArxivClient,
    archive: ArchiveClient,
    transcript: Transcript,
    document: Option<DocumentContext>,
    persona: Persona,
}

impl ChatSession {
    /// Create a session with default metadata clients.
    pub fn new(config: AppConfig, gateway: Box<dyn Gateway>) -> Self {
        Self::with_clients(config, gateway, ArxivClient::new(), ArchiveClient::new())
    }

    /// Create a session with explicit metadata clients (tests, mirrors).
    pub fn with_clients(
        config: AppConfig,
        gateway: Box<dyn Gateway>,
        arxiv: ArxivClient,
        archive: ArchiveClient,
    ) -> Self {
        let transcript = Transcript::new(config.history_limit);
        Self {
            config,
            gateway,
            arxiv,
            archive,
            transcript,
            document: None,
            persona: Persona::default(),
        }
    }

    /// The opening assistant message for a fresh session.
    pub fn greeting(&self) -> String {
        if self.config.is_configured() {
            format!(
                "Connected to the {} model. What would you like to chat about?",
                self.config.model
            )
        } else {
            setup_message()
        }
    }

    /// Handle one submitted message: route to paper search on a matching
    /// trigger phrase, otherwise assemble context and call the gateway.
    /// The reply is already appended to the transcript when this returns.
    pub async fn handle_message(&mut self, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        if let Some(topic) = search_intent(text) {
            debug!(%topic, "Routing message to paper search");
            let reply = self.run_search(&topic).await;
            self.transcript.push(ChatTurn::user(text));
            self.transcript.push(ChatTurn::assistant(reply.as_str()));
            return reply;
        }

        let (prompt, options) =
            PromptAssembler::assemble(&self.transcript, self.document.as_ref(), self.persona, text);

        let reply = match self.gateway.generate(&prompt, &options).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Gateway call failed");
                gateway_error_reply(&err)
            }
        };

        self.transcript.push(ChatTurn::user(text));
        self.transcript.push(ChatTurn::assistant(reply.as_str()));
        reply
    }

    /// Load arXiv paper metadata as the active document context.
    /// Replaces any previous document wholesale.
    pub async fn load_arxiv(&mut self, reference: &str) -> String {
        let reply = match self.arxiv.fetch(reference).await {
            Ok(doc) => {
                let confirmation = render_document_loaded(&doc);
                self.document = Some(doc);
                confirmation
            }
            Err(SourceError::NotFound(what)) => {
                format!("I couldn't find \"{what}\" on arXiv. Check the identifier and try again.")
            }
            Err(err) => {
                warn!(error = %err, "arXiv fetch failed");
                "I couldn't fetch the paper details right now. Please try again in a moment."
                    .to_string()
            }
        };

        self.transcript.push(ChatTurn::assistant(reply.as_str()));
        reply
    }

    /// Load an archive page title as the active document context.
    /// Never fails — the title degrades to a URL-derived label at worst.
    pub async fn load_archive(&mut self, url: &str) -> String {
        let doc = self.archive.fetch_title(url).await;
        let reply = render_document_loaded(&doc);
        self.document = Some(doc);
        self.transcript.push(ChatTurn::assistant(reply.as_str()));
        reply
    }

    /// Drop the active document context.
    pub fn clear_document(&mut self) {
        self.document = None;
    }

    /// Select the active persona. Total replacement, no merging.
    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn document(&self) -> Option<&DocumentContext> {
        self.document.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    async fn run_search(&self, topic: &str) -> String {
        match self.arxiv.search(topic, DEFAULT_SEARCH_RESULTS).await {
            Ok(papers) if papers.is_empty() => format!(
                "I couldn't find any papers about \"{topic}\". Try a broader phrasing."
            ),
            Ok(papers) => render_search_results(topic, &papers),
            Err(err) => {
                warn!(error = %err, "Paper search failed");
                "I ran into a problem searching arXiv. Please check your connection and try again."
                    .to_string()
            }
        }
    }
}

/// The setup-instruction reply for a missing or placeholder API key.
fn setup_message() -> String {
    "Gemini API key not configured. Add your key to ~/.paperchat/config.toml \
     (run `paperchat config-init` for a template) or set the GEMINI_API_KEY \
     environment variable, then try again."
        .to_string()
}

/// Map a gateway failure to its conversational reply.
fn gateway_error_reply(err: &GatewayError) -> String {
    match err {
        GatewayError::Configuration(_) => setup_message(),
        GatewayError::Connectivity(_) => {
            "I encountered a problem connecting to the language model. This might be \
             a network issue or API downtime. Please try again in a moment."
                .to_string()
        }
        GatewayError::Provider { message, .. } => format!("Error: {message}"),
        GatewayError::MalformedResponse(_) => {
            "I received an unexpected response from the language model. Please try again."
                .to_string()
        }
    }
}

fn render_document_loaded(doc: &DocumentContext) -> String {
    let mut reply = format!("Loaded \"{}\"", doc.title);
    if let Some(authors) = &doc.authors {
        reply.push_str(&format!(" by {authors}"));
    }
    reply.push_str(". Ask me anything about it, or say /clear to drop it.");
    reply
}

fn render_search_results(topic: &str, papers: &[PaperSummary]) -> String {
    let mut reply = format!("Here's what I found about \"{topic}\":\n");
    for (i, paper) in papers.iter().enumerate() {
        reply.push_str(&format!("\n{}. {}", i + 1, paper.title));
        if !paper.authors.is_empty() {
            reply.push_str(&format!("\n   {}", paper.authors));
        }
        reply.push_str(&format!("\n   {}", paper.abs_url));
        reply.push_str(&format!("\n   PDF: {}", arxiv_pdf_url(&paper.source_id)));
    }
    reply.push_str("\n\nUse /paper <id> to load one and ask questions about it.");
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use paperchat_core::gateway::GenerationOptions;
    use paperchat_core::prompt::OutboundPrompt;
    use paperchat_core::turn::Role;
    use std::sync::{Arc, Mutex};

    /// Shared handle onto the last prompt a stub gateway saw.
    #[derive(Clone, Default)]
    struct PromptSpy(Arc<Mutex<Option<OutboundPrompt>>>);

    impl PromptSpy {
        fn last(&self) -> Option<OutboundPrompt> {
            self.0.lock().unwrap().clone()
        }
    }

    /// Gateway stub: canned outcome, records the last prompt it saw.
    struct StubGateway {
        outcome: Result<String, GatewayError>,
        spy: PromptSpy,
    }

    impl StubGateway {
        fn replying(text: &str) -> Self {
            Self {
                outcome: Ok(text.to_string()),
                spy: PromptSpy::default(),
            }
        }

        fn replying_with_spy(text: &str, spy: PromptSpy) -> Self {
            Self {
                outcome: Ok(text.to_string()),
                spy,
            }
        }

        fn failing(err: GatewayError) -> Self {
            Self {
                outcome: Err(err),
                spy: PromptSpy::default(),
            }
        }
    }

    #[async_trait]
    impl Gateway for StubGateway {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(
            &self,
            prompt: &OutboundPrompt,
            _options: &GenerationOptions,
        ) -> Result<String, GatewayError> {
            *self.spy.0.lock().unwrap() = Some(prompt.clone());
            self.outcome.clone()
        }
    }

    fn configured() -> AppConfig {
        AppConfig {
            api_key: Some("test-key".into()),
            ..Default::default()
        }
    }

    fn session_with(gateway: StubGateway) -> ChatSession {
        // Unroutable endpoints: any accidental network call fails fast.
        ChatSession::with_clients(
            configured(),
            Box::new(gateway),
            ArxivClient::with_query_url("http://127.0.0.1:1/api/query"),
            ArchiveClient::new(),
        )
    }

    #[tokio::test]
    async fn reply_appends_both_turns() {
        let mut session = session_with(StubGateway::replying("Hi there!"));
        let reply = session.handle_message("hello").await;

        assert_eq!(reply, "Hi there!");
        assert_eq!(session.transcript().len(), 2);
        let turns: Vec<_> = session.transcript().iter().collect();
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "hello");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].text, "Hi there!");
    }

    #[tokio::test]
    async fn gateway_error_becomes_assistant_turn_and_session_survives() {
        let mut session = session_with(StubGateway::failing(GatewayError::Connectivity(
            "connection refused".into(),
        )));
        let reply = session.handle_message("hello").await;

        assert!(reply.contains("problem connecting"));
        assert_eq!(session.transcript().len(), 2);

        // The session remains usable for the next input.
        let reply = session.handle_message("still there?").await;
        assert!(!reply.is_empty());
        assert_eq!(session.transcript().len(), 4);
    }

    #[tokio::test]
    async fn provider_message_passes_through() {
        let mut session = session_with(StubGateway::failing(GatewayError::Provider {
            status_code: 400,
            message: "API key not valid".into(),
        }));
        let reply = session.handle_message("hello").await;
        assert_eq!(reply, "Error: API key not valid");
    }

    #[tokio::test]
    async fn configuration_error_renders_setup_instructions() {
        let mut session = session_with(StubGateway::failing(GatewayError::Configuration(
            "no key".into(),
        )));
        let reply = session.handle_message("hello").await;
        assert!(reply.contains("GEMINI_API_KEY"));
        assert!(reply.contains("config-init"));
    }

    #[tokio::test]
    async fn prompt_excludes_the_pending_message_from_history() {
        let spy = PromptSpy::default();
        let mut session = session_with(StubGateway::replying_with_spy("ok", spy.clone()));
        session.handle_message("first").await;
        session.handle_message("second").await;

        // history first/ok, then the literal new message once at the end
        let prompt = spy.last().unwrap();
        let texts: Vec<&str> = prompt.segments().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "ok", "second"]);
    }

    #[tokio::test]
    async fn active_document_grounds_the_prompt() {
        let spy = PromptSpy::default();
        let mut session = session_with(StubGateway::replying_with_spy("ok", spy.clone()));
        session.load_archive("http://127.0.0.1:1/texts/tide-tables.pdf").await;
        session.handle_message("what is this about?").await;

        let flat = spy.last().unwrap().flattened_text();
        assert!(flat.contains("tide tables"));
        assert!(flat.ends_with("what is this about?"));
    }

    #[tokio::test]
    async fn search_intent_routes_away_from_gateway() {
        let mut session = session_with(StubGateway::replying("chat reply"));
        let reply = session.handle_message("find papers about quantum computing").await;

        // Unroutable search endpoint → the failed-search framing, and the
        // gateway reply never appears.
        assert!(reply.contains("problem searching arXiv"));
        assert_ne!(reply, "chat reply");
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn document_load_replaces_wholesale_and_clear_drops() {
        let mut session = session_with(StubGateway::replying("ok"));

        let reply = session.load_archive("http://127.0.0.1:1/texts/first-doc.pdf").await;
        assert!(reply.contains("first doc"));
        assert_eq!(session.document().unwrap().title, "first doc");

        session.load_archive("http://127.0.0.1:1/texts/second-doc.pdf").await;
        assert_eq!(session.document().unwrap().title, "second doc");

        session.clear_document();
        assert!(session.document().is_none());
    }

    #[tokio::test]
    async fn arxiv_load_failure_is_a_conversational_reply() {
        let mut session = session_with(StubGateway::replying("ok"));
        let reply = session.load_arxiv("2301.01234").await;
        assert!(reply.contains("couldn't fetch"));
        assert!(session.document().is_none());
        // The failure reply still lands in the transcript.
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn persona_selection_steers_the_prompt() {
        let mut session = session_with(StubGateway::replying("ok"));
        session.set_persona(Persona::Electrician);
        assert_eq!(session.persona(), Persona::Electrician);
        let _ = session.handle_message("what is a transformer?").await;

        let turns: Vec<_> = session.transcript().iter().collect();
        // Transcript holds the literal message, not the synthetic instruction.
        assert_eq!(turns[0].text, "what is a transformer?");
    }

    #[tokio::test]
    async fn empty_message_is_a_no_op() {
        let mut session = session_with(StubGateway::replying("ok"));
        let reply = session.handle_message("   ").await;
        assert!(reply.is_empty());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn greeting_reflects_configuration() {
        let session = session_with(StubGateway::replying("ok"));
        assert!(session.greeting().contains("Connected"));

        let unconfigured = ChatSession::with_clients(
            AppConfig::default(),
            Box::new(StubGateway::replying("ok")),
            ArxivClient::with_query_url("http://127.0.0.1:1/api/query"),
            ArchiveClient::new(),
        );
        assert!(unconfigured.greeting().contains("not configured"));
    }
}
