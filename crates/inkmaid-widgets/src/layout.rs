//! Layout helpers: separators, section labels.

use egui::{Color32, RichText, Sense, Stroke, Ui, vec2};

use crate::theme;

/// Draw a vertical separator line between toolbar groups.
pub fn vertical_separator(ui: &mut Ui) {
    let (rect, _) = ui.allocate_exact_size(vec2(9.0, 18.0), Sense::hover());
    if ui.is_rect_visible(rect) {
        ui.painter().vline(
            rect.center().x,
            rect.y_range(),
            Stroke::new(1.0, Color32::from_gray(210)),
        );
    }
}

/// Draw a panel heading such as "Mermaid Code" or "Preview".
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(13.0).strong().color(theme::TEXT));
}
