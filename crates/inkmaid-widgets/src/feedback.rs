//! Feedback widgets: limit notice badges, the syntax error panel, hints.

use egui::{
    Align2, Color32, CornerRadius, FontId, Frame, Margin, Painter, Pos2, Rect, RichText, Stroke,
    Ui, Vec2,
};

use crate::{sizing, theme};

/// Color scheme of a notice badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    /// Orange, for hitting the lower zoom limit.
    Warning,
    /// Blue, for hitting the upper zoom limit.
    Info,
}

impl BadgeTone {
    /// Background and text color.
    pub fn colors(self) -> (Color32, Color32) {
        match self {
            BadgeTone::Warning => (theme::WARNING_BG, theme::WARNING_TEXT),
            BadgeTone::Info => (theme::INFO_BG, theme::INFO_TEXT),
        }
    }
}

/// Small rounded badge with a short message.
pub fn notice_badge(ui: &mut Ui, tone: BadgeTone, text: &str) {
    let (bg, fg) = tone.colors();
    Frame::new()
        .fill(bg)
        .corner_radius(CornerRadius::same(sizing::CORNER_RADIUS))
        .inner_margin(Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.label(RichText::new(text).size(11.0).strong().color(fg));
        });
}

/// Red panel shown in place of the diagram when rendering failed.
pub fn error_panel(ui: &mut Ui, title: &str, message: &str) {
    Frame::new()
        .fill(theme::ERROR_BG)
        .stroke(Stroke::new(2.0, theme::ERROR_BORDER))
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .inner_margin(Margin::same(24))
        .show(ui, |ui| {
            ui.set_max_width(420.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(title).size(16.0).strong().color(theme::ERROR_TEXT));
                ui.add_space(6.0);
                ui.label(
                    RichText::new(message)
                        .size(12.0)
                        .family(egui::FontFamily::Monospace)
                        .color(theme::ERROR_TEXT),
                );
            });
        });
}

/// Paint a translucent hint pill anchored to the bottom-left of `rect`.
pub fn hint_label(painter: &Painter, rect: Rect, text: &str) {
    let font = FontId::proportional(11.0);
    let galley = painter.layout_no_wrap(text.to_string(), font, Color32::WHITE);
    let padding = Vec2::new(8.0, 4.0);
    let size = galley.size() + padding * 2.0;
    let min = Pos2::new(rect.left() + 12.0, rect.bottom() - 12.0 - size.y);
    let pill = Rect::from_min_size(min, size);

    painter.rect_filled(pill, CornerRadius::same(sizing::CORNER_RADIUS), Color32::from_black_alpha(140));
    painter.galley(pill.min + padding, galley, Color32::WHITE);
}

/// Paint centred muted text, e.g. while the first render is pending.
pub fn placeholder_text(painter: &Painter, rect: Rect, text: &str) {
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(13.0),
        theme::TEXT_MUTED,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_tones_differ() {
        let (warning_bg, warning_fg) = BadgeTone::Warning.colors();
        let (info_bg, info_fg) = BadgeTone::Info.colors();
        assert_ne!(warning_bg, info_bg);
        assert_ne!(warning_fg, info_fg);
    }
}
