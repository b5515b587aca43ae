//! Source-to-preview orchestration.
//!
//! The orchestrator never renders anything itself. [`RenderOrchestrator::set_source`]
//! hands out a [`RenderRequest`] that the host forwards to a rendering
//! collaborator; the outcome comes back through [`RenderOrchestrator::complete`].

use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Message used when the collaborator fails without saying why.
pub const FALLBACK_SYNTAX_MESSAGE: &str = "Invalid Mermaid syntax";

/// The single user-facing failure: the diagram source did not render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DiagramSyntaxError {
    message: String,
}

impl DiagramSyntaxError {
    /// Wrap a collaborator message, substituting the fallback for blank ones.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_SYNTAX_MESSAGE.to_string()
        } else {
            message
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One render job for the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Monotonic sequence number; later requests win.
    pub seq: u64,
    /// Unique element id for the collaborator, e.g. `diagram-1700000000000-4`.
    pub id: String,
    /// Source text as it was when the request was issued.
    pub source: Arc<str>,
}

/// What happened to a completion handed to [`RenderOrchestrator::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request already completed; the result was dropped.
    Stale,
}

/// What the preview should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Nothing has rendered yet.
    Empty,
    Diagram(Arc<str>),
    Error(DiagramSyntaxError),
}

/// Owns the diagram source and the latest render outcome.
#[derive(Debug, Clone, Default)]
pub struct RenderOrchestrator {
    source: Arc<str>,
    issued: u64,
    applied: u64,
    markup: Option<Arc<str>>,
    error: Option<DiagramSyntaxError>,
}

impl RenderOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator holding `source`, plus the request for its first render.
    pub fn with_source(source: &str) -> (Self, RenderRequest) {
        let mut orchestrator = Self::new();
        let request = orchestrator.set_source(source);
        (orchestrator, request)
    }

    /// Replace the source text and issue a render request for it.
    ///
    /// Every call issues a request, even if the text did not change.
    pub fn set_source(&mut self, source: &str) -> RenderRequest {
        self.source = Arc::from(source);
        self.issued += 1;
        let request = RenderRequest {
            seq: self.issued,
            id: render_id(self.issued),
            source: Arc::clone(&self.source),
        };
        log::debug!("Render request {} ({} bytes)", request.id, source.len());
        request
    }

    /// Current source text. Renders never modify it.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Apply the outcome of request `seq` unless a newer one already landed.
    pub fn complete(&mut self, seq: u64, result: Result<String, DiagramSyntaxError>) -> Completion {
        if seq <= self.applied {
            log::debug!("Discarding stale render {} (applied {})", seq, self.applied);
            return Completion::Stale;
        }
        self.applied = seq;
        match result {
            Ok(svg) => {
                log::debug!("Render {} succeeded ({} bytes)", seq, svg.len());
                self.markup = Some(Arc::from(svg));
                self.error = None;
            }
            Err(error) => {
                log::warn!("Render {} failed: {}", seq, error);
                self.markup = None;
                self.error = Some(error);
            }
        }
        Completion::Applied
    }

    /// Markup of the last applied successful render.
    pub fn markup(&self) -> Option<Arc<str>> {
        self.markup.clone()
    }

    pub fn error(&self) -> Option<&DiagramSyntaxError> {
        self.error.as_ref()
    }

    /// Sequence number of the newest applied completion (0 before any).
    pub fn applied_seq(&self) -> u64 {
        self.applied
    }

    /// Whether requests are still outstanding past the applied one.
    pub fn is_pending(&self) -> bool {
        self.issued > self.applied
    }

    pub fn preview(&self) -> Preview {
        match (&self.markup, &self.error) {
            (_, Some(error)) => Preview::Error(error.clone()),
            (Some(markup), None) => Preview::Diagram(Arc::clone(markup)),
            (None, None) => Preview::Empty,
        }
    }
}

/// Build a render id from the wall clock and a sequence number.
pub fn render_id(seq: u64) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("diagram-{}-{}", millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>";

    #[test]
    fn test_requests_are_sequenced() {
        let mut orchestrator = RenderOrchestrator::new();
        let first = orchestrator.set_source("graph TD; A-->B");
        let second = orchestrator.set_source("graph TD; A-->C");

        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert_ne!(first.id, second.id);
        assert!(first.id.starts_with("diagram-"));
        assert!(second.id.ends_with("-2"));
        assert_eq!(&*second.source, "graph TD; A-->C");
        assert_eq!(orchestrator.source(), "graph TD; A-->C");
    }

    #[test]
    fn test_same_text_still_renders() {
        let mut orchestrator = RenderOrchestrator::new();
        let first = orchestrator.set_source("pie");
        let second = orchestrator.set_source("pie");
        assert!(second.seq > first.seq);
    }

    #[test]
    fn test_success_replaces_markup() {
        let (mut orchestrator, request) = RenderOrchestrator::with_source("graph TD; A-->B");
        assert_eq!(orchestrator.preview(), Preview::Empty);
        assert!(orchestrator.is_pending());

        assert_eq!(orchestrator.complete(request.seq, Ok(SVG.into())), Completion::Applied);
        assert_eq!(orchestrator.markup().as_deref(), Some(SVG));
        assert_eq!(orchestrator.error(), None);
        assert!(!orchestrator.is_pending());
        assert!(matches!(orchestrator.preview(), Preview::Diagram(_)));
    }

    #[test]
    fn test_failure_shows_error_and_keeps_source() {
        let (mut orchestrator, ok) = RenderOrchestrator::with_source("graph TD; A-->B");
        orchestrator.complete(ok.seq, Ok(SVG.into()));

        let bad = orchestrator.set_source("graph TD; A-->");
        orchestrator.complete(bad.seq, Err(DiagramSyntaxError::new("Parse error on line 1")));

        let error = orchestrator.error().unwrap();
        assert!(!error.message().is_empty());
        assert_eq!(orchestrator.markup(), None);
        assert_eq!(orchestrator.source(), "graph TD; A-->");
        assert_eq!(orchestrator.preview(), Preview::Error(error.clone()));
    }

    #[test]
    fn test_error_persists_until_next_success() {
        let (mut orchestrator, bad) = RenderOrchestrator::with_source("nonsense");
        orchestrator.complete(bad.seq, Err(DiagramSyntaxError::new("boom")));

        let still_bad = orchestrator.set_source("still nonsense");
        assert!(orchestrator.error().is_some());
        orchestrator.complete(still_bad.seq, Err(DiagramSyntaxError::new("boom again")));
        assert_eq!(orchestrator.error().map(|e| e.message()), Some("boom again"));

        let good = orchestrator.set_source("graph LR; A-->B");
        orchestrator.complete(good.seq, Ok(SVG.into()));
        assert_eq!(orchestrator.error(), None);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut orchestrator = RenderOrchestrator::new();
        let older = orchestrator.set_source("graph TD; A");
        let newer = orchestrator.set_source("graph TD; B");

        assert_eq!(orchestrator.complete(newer.seq, Ok("<svg>B</svg>".into())), Completion::Applied);
        assert_eq!(
            orchestrator.complete(older.seq, Err(DiagramSyntaxError::new("late"))),
            Completion::Stale
        );
        assert_eq!(orchestrator.markup().as_deref(), Some("<svg>B</svg>"));
        assert_eq!(orchestrator.error(), None);
        assert_eq!(orchestrator.applied_seq(), newer.seq);
    }

    #[test]
    fn test_blank_message_falls_back() {
        assert_eq!(DiagramSyntaxError::new("").message(), FALLBACK_SYNTAX_MESSAGE);
        assert_eq!(DiagramSyntaxError::new("  \n").message(), FALLBACK_SYNTAX_MESSAGE);
        assert_eq!(DiagramSyntaxError::new("Lexical error").to_string(), "Lexical error");
    }

    #[test]
    fn test_markup_is_shared() {
        let (mut orchestrator, request) = RenderOrchestrator::with_source("pie");
        orchestrator.complete(request.seq, Ok(SVG.into()));
        let a = orchestrator.markup().unwrap();
        let b = orchestrator.markup().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
