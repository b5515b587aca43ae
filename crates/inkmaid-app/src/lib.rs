//! Inkmaid Application
//!
//! The application shell providing windowing, input routing, background
//! rendering and the egui editor around the core session.

mod app;
mod dispatch;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, GpuError};
pub use dispatch::{RenderDispatcher, RenderOutcome};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
