//! One editing session: the source, its rendered preview and the viewport.

use crate::config::ViewerConfig;
use crate::controller::ViewportController;
use crate::export::SvgExport;
use crate::orchestrator::{Completion, DiagramSyntaxError, RenderOrchestrator, RenderRequest};
use crate::templates::Template;

/// Everything the editor UI needs, independent of any platform.
///
/// The normal preview and the fullscreen preview share this one viewport and
/// the same rendered markup.
#[derive(Debug, Clone)]
pub struct EditorSession {
    orchestrator: RenderOrchestrator,
    viewport: ViewportController,
    fullscreen: bool,
}

impl EditorSession {
    /// Start a session on `source`, returning the request for the first render.
    pub fn new(config: &ViewerConfig, source: &str) -> (Self, RenderRequest) {
        let (orchestrator, request) = RenderOrchestrator::with_source(source);
        let session = Self {
            orchestrator,
            viewport: config.controller(),
            fullscreen: false,
        };
        (session, request)
    }

    pub fn orchestrator(&self) -> &RenderOrchestrator {
        &self.orchestrator
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn source(&self) -> &str {
        self.orchestrator.source()
    }

    /// The user changed the source text.
    pub fn edit(&mut self, source: &str) -> RenderRequest {
        self.orchestrator.set_source(source)
    }

    /// Replace the source with a template.
    pub fn load_template(&mut self, template: &Template) -> RenderRequest {
        log::info!("Loading template {}", template.name);
        self.orchestrator.set_source(template.source)
    }

    /// Feed a collaborator result back in.
    pub fn complete(&mut self, seq: u64, result: Result<String, DiagramSyntaxError>) -> Completion {
        self.orchestrator.complete(seq, result)
    }

    /// SVG export of the current preview, if a diagram is showing.
    pub fn export(&self) -> Option<SvgExport> {
        let markup = self.orchestrator.markup()?;
        SvgExport::from_markup(&markup)
    }

    /// Text to put on the clipboard for "copy".
    pub fn copy_text(&self) -> &str {
        self.orchestrator.source()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if self.fullscreen != fullscreen {
            log::debug!("Fullscreen preview {}", if fullscreen { "opened" } else { "closed" });
        }
        self.fullscreen = fullscreen;
        // A drag that started in the other view must not continue here.
        self.viewport.cancel_gesture();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.set_fullscreen(!self.fullscreen);
    }
}
