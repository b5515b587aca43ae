//! Inkmaid Core Library
//!
//! Platform-agnostic state and logic for the Inkmaid diagram viewer: the
//! pan/zoom viewport, gesture handling, render orchestration and the small
//! conveniences around them.

pub mod config;
pub mod controller;
pub mod export;
pub mod input;
pub mod notice;
pub mod orchestrator;
pub mod session;
pub mod templates;
pub mod viewport;

pub use config::{ConfigError, ConfigResult, RenderOptions, ViewerConfig};
pub use controller::{ViewportController, ZoomSteps};
pub use export::{EXPORT_FILE_NAME, EXPORT_MIME, SvgExport};
pub use input::{
    GestureState, InputResponse, MouseButton, PointerEvent, TouchEvent, TouchPhase, TouchTracker,
};
pub use notice::{NoticeState, NoticeTicket, NoticeTimers, notice_message};
pub use orchestrator::{Completion, DiagramSyntaxError, Preview, RenderOrchestrator, RenderRequest};
pub use session::EditorSession;
pub use templates::{DEFAULT_SOURCE, TEMPLATES, Template};
pub use viewport::{ViewportState, ZoomBounds, ZoomClamp, ZoomLimit};
