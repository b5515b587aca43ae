//! Zoom strip: zoom out, current percentage (click to reset), zoom in.

use egui::{Color32, CursorIcon, Label, RichText, Sense, Ui};

/// What the user asked the zoom strip for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomCommand {
    In,
    Out,
    Reset,
}

/// Label for a zoom percentage, e.g. `"120%"`.
pub fn zoom_label(percent: u32) -> String {
    format!("{}%", percent)
}

const TEXT_COLOR: Color32 = Color32::from_gray(80);

/// The zoom out / percentage / zoom in strip.
pub struct ZoomControl {
    percent: u32,
}

impl ZoomControl {
    pub fn new(percent: u32) -> Self {
        Self { percent }
    }

    /// Show the strip and return the command that was clicked, if any.
    pub fn show(self, ui: &mut Ui) -> Option<ZoomCommand> {
        let mut command = None;

        let minus_response = ui.add(
            Label::new(
                RichText::new("\u{2212}") // − minus sign
                    .size(16.0)
                    .color(TEXT_COLOR),
            )
            .sense(Sense::click()),
        );
        if minus_response.clicked() {
            command = Some(ZoomCommand::Out);
        }
        minus_response
            .on_hover_text("Zoom out")
            .on_hover_cursor(CursorIcon::PointingHand);

        ui.add_space(10.0);

        let zoom_response = ui.add(
            Label::new(
                RichText::new(zoom_label(self.percent))
                    .size(13.0)
                    .monospace()
                    .color(TEXT_COLOR),
            )
            .sense(Sense::click()),
        );
        if zoom_response.clicked() {
            command = Some(ZoomCommand::Reset);
        }
        zoom_response
            .on_hover_text("Reset to 100%")
            .on_hover_cursor(CursorIcon::PointingHand);

        ui.add_space(10.0);

        let plus_response = ui.add(
            Label::new(RichText::new("+").size(16.0).color(TEXT_COLOR)).sense(Sense::click()),
        );
        if plus_response.clicked() {
            command = Some(ZoomCommand::In);
        }
        plus_response
            .on_hover_text("Zoom in")
            .on_hover_cursor(CursorIcon::PointingHand);

        command
    }
}
