//! Inkmaid Render Library
//!
//! Rendering collaborators that turn Mermaid source into SVG markup. Nothing
//! here parses or lays out diagrams: the work is delegated to Mermaid itself,
//! either the Mermaid CLI (native) or Mermaid.js (browser).

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(target_arch = "wasm32")]
mod mermaid_js;

pub use memory::MemoryRenderer;

#[cfg(not(target_arch = "wasm32"))]
pub use cli::{DEFAULT_MMDC, MermaidCli};

#[cfg(target_arch = "wasm32")]
pub use mermaid_js::{MERMAID_CDN_URL, MermaidJs};

use inkmaid_core::{DiagramSyntaxError, RenderOptions, RenderRequest};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source did not render; the message comes from Mermaid.
    #[error("{0}")]
    Syntax(String),
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Render error: {0}")]
    Other(String),
}

impl RenderError {
    /// Collapse into the single error kind the preview shows.
    pub fn into_syntax_error(self) -> DiagramSyntaxError {
        match self {
            RenderError::Syntax(message) => DiagramSyntaxError::new(message),
            other => DiagramSyntaxError::new(other.to_string()),
        }
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A collaborator that renders Mermaid source to SVG.
///
/// Constructed once at start-up and shared by every render request.
/// On native platforms, implementations must be Send + Sync so renders can
/// run on worker threads. On WASM, these bounds are relaxed.
#[cfg(not(target_arch = "wasm32"))]
pub trait DiagramRenderer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Apply session-wide options. Called once before the first render.
    fn initialize(&mut self, options: &RenderOptions) -> RenderResult<()>;

    /// Render `source` to SVG markup, using `id` as the root element id.
    fn render(&self, id: &str, source: &str) -> BoxFuture<'_, RenderResult<String>>;
}

/// A collaborator that renders Mermaid source to SVG (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait DiagramRenderer {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Apply session-wide options. Called once before the first render.
    fn initialize(&mut self, options: &RenderOptions) -> RenderResult<()>;

    /// Render `source` to SVG markup, using `id` as the root element id.
    fn render(&self, id: &str, source: &str) -> BoxFuture<'_, RenderResult<String>>;
}

/// Run a [`RenderRequest`] and map the outcome to what the orchestrator expects.
pub fn render_request<'a>(
    renderer: &'a dyn DiagramRenderer,
    request: &'a RenderRequest,
) -> BoxFuture<'a, Result<String, DiagramSyntaxError>> {
    Box::pin(async move {
        let svg = renderer
            .render(&request.id, &request.source)
            .await
            .and_then(ensure_svg)
            .map_err(RenderError::into_syntax_error)?;
        Ok(svg)
    })
}

/// Reject output that does not contain an SVG element.
fn ensure_svg(markup: String) -> RenderResult<String> {
    if markup.contains("<svg") {
        Ok(markup)
    } else {
        Err(RenderError::Other("renderer returned no SVG".to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::block_on;
    use super::*;
    use inkmaid_core::{Completion, RenderOrchestrator, templates};

    #[test]
    fn test_error_mapping() {
        let syntax = RenderError::Syntax("Parse error on line 2".into()).into_syntax_error();
        assert_eq!(syntax.message(), "Parse error on line 2");

        let blank = RenderError::Syntax(String::new()).into_syntax_error();
        assert_eq!(blank.message(), "Invalid Mermaid syntax");

        let missing = RenderError::Unavailable("mmdc not found".into()).into_syntax_error();
        assert_eq!(missing.message(), "Renderer unavailable: mmdc not found");
    }

    #[test]
    fn test_ensure_svg() {
        assert!(ensure_svg("<svg/>".into()).is_ok());
        assert!(matches!(ensure_svg("<div/>".into()), Err(RenderError::Other(_))));
    }

    #[test]
    fn test_orchestrated_render_roundtrip() {
        let mut renderer = MemoryRenderer::new();
        renderer.initialize(&RenderOptions::default()).unwrap();

        let (mut orchestrator, request) = RenderOrchestrator::with_source(templates::DEFAULT_SOURCE);
        let result = block_on(render_request(&renderer, &request));
        assert_eq!(orchestrator.complete(request.seq, result), Completion::Applied);
        let markup = orchestrator.markup().unwrap();
        assert!(markup.contains(&request.id));

        let bad = orchestrator.set_source("this is not a diagram");
        let result = block_on(render_request(&renderer, &bad));
        orchestrator.complete(bad.seq, result);
        assert!(!orchestrator.error().unwrap().message().is_empty());
        assert_eq!(orchestrator.markup(), None);
        assert_eq!(orchestrator.source(), "this is not a diagram");
    }
}
