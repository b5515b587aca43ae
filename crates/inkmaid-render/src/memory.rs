//! In-memory renderer for tests and headless runs.

use super::{BoxFuture, DiagramRenderer, RenderError, RenderResult};
use inkmaid_core::RenderOptions;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Diagram declarations Mermaid recognises on the first line.
const DIAGRAM_KEYWORDS: &[&str] = &[
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "classDiagram-v2",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "quadrantChart",
    "requirementDiagram",
    "gitGraph",
    "mindmap",
    "timeline",
    "sankey-beta",
    "xychart-beta",
    "block-beta",
    "C4Context",
];

/// Deterministic renderer that emits placeholder SVG.
///
/// It recognises the diagram type keyword and dangling edges, nothing more.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    options: Option<RenderOptions>,
    renders: AtomicUsize,
}

impl MemoryRenderer {
    /// Create a new memory renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options passed to [`DiagramRenderer::initialize`], if it was called.
    pub fn options(&self) -> Option<&RenderOptions> {
        self.options.as_ref()
    }

    /// Number of render calls so far.
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    fn render_now(&self, id: &str, source: &str) -> RenderResult<String> {
        let mut lines = source
            .lines()
            .enumerate()
            .map(|(n, line)| (n + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with("%%"));

        let Some((header_line, header)) = lines.next() else {
            return Err(RenderError::Syntax("No diagram type detected".to_string()));
        };
        let keyword = header
            .split(|c: char| c.is_whitespace() || c == ';')
            .next()
            .unwrap_or_default();
        if !DIAGRAM_KEYWORDS.contains(&keyword) {
            return Err(RenderError::Syntax(format!(
                "No diagram type detected matching given configuration for text: {}",
                header
            )));
        }

        let mut body = 0usize;
        for (number, line) in std::iter::once((header_line, header)).chain(lines) {
            let statement = line.trim_end_matches(';').trim_end();
            if ["-->", "->>", "-->>", "---"].iter().any(|edge| statement.ends_with(edge)) {
                return Err(RenderError::Syntax(format!(
                    "Parse error on line {}: expecting a node after '{}'",
                    number, statement
                )));
            }
            body += 1;
        }

        let theme = self
            .options
            .as_ref()
            .map(|o| o.theme.as_str())
            .unwrap_or("default");
        let height = 40 + 20 * body;
        Ok(format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"{id}\" class=\"{theme}\" ",
                "width=\"240\" height=\"{h}\" viewBox=\"0 0 240 {h}\">",
                "<rect width=\"240\" height=\"{h}\" fill=\"white\" stroke=\"black\"/>",
                "<text x=\"12\" y=\"24\">{keyword}</text></svg>"
            ),
            id = escape_xml(id),
            theme = escape_xml(theme),
            h = height,
            keyword = escape_xml(keyword),
        ))
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl DiagramRenderer for MemoryRenderer {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn initialize(&mut self, options: &RenderOptions) -> RenderResult<()> {
        self.options = Some(options.clone());
        Ok(())
    }

    fn render(&self, id: &str, source: &str) -> BoxFuture<'_, RenderResult<String>> {
        self.renders.fetch_add(1, Ordering::Relaxed);
        let result = self.render_now(id, source);
        Box::pin(async move { result })
    }
}
