//! Keyboard shortcut registry and documentation.

use winit::keyboard::{Key, NamedKey};

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("=", true, false, "Zoom in"),
            Shortcut::new("-", true, false, "Zoom out"),
            Shortcut::new("0", true, false, "Reset zoom and pan"),
            Shortcut::new("C", true, true, "Copy Mermaid source"),
            Shortcut::new("E", true, false, "Export SVG"),
            Shortcut::new("F", true, false, "Toggle fullscreen preview"),
            Shortcut::new("Escape", false, false, "Close fullscreen preview"),
            Shortcut::new("Drag", false, false, "Pan the preview"),
            Shortcut::new("Scroll/Pinch", false, false, "Zoom the preview"),
        ]
    }

    /// Map a pressed key to its action, if it is bound.
    pub fn action_for(key: &Key, ctrl: bool, shift: bool) -> Option<UiAction> {
        match key {
            Key::Named(NamedKey::Escape) => Some(UiAction::CloseFullscreen),
            Key::Character(c) if ctrl => match (c.to_lowercase().as_str(), shift) {
                ("=" | "+", _) => Some(UiAction::ZoomIn),
                ("-", _) => Some(UiAction::ZoomOut),
                ("0", _) => Some(UiAction::ResetView),
                ("c", true) => Some(UiAction::CopySource),
                ("e", false) => Some(UiAction::ExportSvg),
                ("f", false) => Some(UiAction::ToggleFullscreen),
                _ => None,
            },
            _ => None,
        }
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
