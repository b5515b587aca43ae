//! Reusable egui widget components with Tailwind-inspired styling.
//!
//! This crate provides the styled UI pieces of the Inkmaid editor:
//!
//! - **Buttons**: Icon buttons, text buttons
//! - **Zoom**: The zoom out / percentage / zoom in strip
//! - **Feedback**: Notice badges, the syntax error panel, hint overlays
//! - **Menu**: Menu items, separators, panel frames
//! - **Layout**: Section labels, separators

pub mod buttons;
pub mod feedback;
pub mod layout;
pub mod menu;
pub mod zoom;

pub use buttons::{IconButton, IconButtonStyle, TextButton};
pub use feedback::{BadgeTone, error_panel, hint_label, notice_badge, placeholder_text};
pub use layout::{section_label, vertical_separator};
pub use menu::{menu_item, menu_separator, panel_frame, toolbar_frame};
pub use zoom::{ZoomCommand, ZoomControl, zoom_label};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Medium button size (toolbar buttons)
    pub const MEDIUM: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Preview area background
    pub const CANVAS_BG: Color32 = Color32::from_rgb(249, 250, 251);

    /// Warning badge (orange-100 / orange-700)
    pub const WARNING_BG: Color32 = Color32::from_rgb(255, 237, 213);
    pub const WARNING_TEXT: Color32 = Color32::from_rgb(194, 65, 12);
    /// Info badge (blue-100 / blue-700)
    pub const INFO_BG: Color32 = Color32::from_rgb(219, 234, 254);
    pub const INFO_TEXT: Color32 = Color32::from_rgb(29, 78, 216);

    /// Error panel (red-50 / red-200 / red-500)
    pub const ERROR_BG: Color32 = Color32::from_rgb(254, 242, 242);
    pub const ERROR_BORDER: Color32 = Color32::from_rgb(254, 202, 202);
    pub const ERROR_TEXT: Color32 = Color32::from_rgb(239, 68, 68);
}
