//! Button components: icon buttons and bordered text buttons.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, Image, ImageSource, Pos2, Rect, Sense, Stroke,
    StrokeKind, Ui, Vec2, vec2,
};

use crate::{sizing, theme};

/// Style configuration for icon buttons.
#[derive(Clone)]
pub struct IconButtonStyle {
    /// Button size
    pub size: Vec2,
    /// Icon size (should be smaller than button size)
    pub icon_size: Vec2,
    /// Corner radius
    pub corner_radius: u8,
    /// Background color when idle
    pub bg_color: Color32,
    /// Background color when hovered
    pub hover_color: Color32,
    /// Icon tint when idle (None = no tint)
    pub icon_tint: Option<Color32>,
    /// Icon tint when hovered
    pub hover_icon_tint: Option<Color32>,
}

impl Default for IconButtonStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::MEDIUM, sizing::MEDIUM),
            icon_size: vec2(16.0, 16.0),
            corner_radius: sizing::CORNER_RADIUS,
            bg_color: Color32::TRANSPARENT,
            hover_color: Color32::from_gray(235),
            icon_tint: Some(Color32::from_gray(80)),
            hover_icon_tint: Some(Color32::from_gray(40)),
        }
    }
}

impl IconButtonStyle {
    /// Create a small icon button style (24x24 button, 14x14 icon) for the zoom strip.
    pub fn small() -> Self {
        Self {
            size: vec2(24.0, 24.0),
            icon_size: vec2(14.0, 14.0),
            ..Default::default()
        }
    }
}

/// An icon button that displays an image/SVG.
pub struct IconButton<'a> {
    icon: ImageSource<'a>,
    tooltip: &'a str,
    shortcut: Option<&'a str>,
    style: IconButtonStyle,
}

impl<'a> IconButton<'a> {
    /// Create a new icon button.
    pub fn new(icon: ImageSource<'a>, tooltip: &'a str) -> Self {
        Self {
            icon,
            tooltip,
            shortcut: None,
            style: IconButtonStyle::default(),
        }
    }

    /// Use small style.
    pub fn small(mut self) -> Self {
        self.style = IconButtonStyle::small();
        self
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let (bg_color, icon_tint) = if response.hovered() {
                (self.style.hover_color, self.style.hover_icon_tint)
            } else {
                (self.style.bg_color, self.style.icon_tint)
            };

            ui.painter().rect_filled(
                rect,
                CornerRadius::same(self.style.corner_radius),
                bg_color,
            );

            // Draw icon centered
            let icon_rect = Rect::from_center_size(rect.center(), self.style.icon_size);
            let mut image = Image::new(self.icon).fit_to_exact_size(self.style.icon_size);
            if let Some(tint) = icon_tint {
                image = image.tint(tint);
            }
            image.paint_at(ui, icon_rect);
        }

        let clicked = response.clicked();
        // Show tooltip with optional shortcut
        let response = if let Some(shortcut) = self.shortcut {
            response.on_hover_ui(|ui| {
                ui.horizontal(|ui| {
                    ui.label(self.tooltip);
                    ui.label(
                        egui::RichText::new(format!("({})", shortcut))
                            .color(Color32::from_gray(128))
                            .small(),
                    );
                });
            })
        } else {
            response.on_hover_text(self.tooltip)
        };
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A bordered toolbar button with an optional leading icon.
pub struct TextButton<'a> {
    label: &'a str,
    icon: Option<ImageSource<'a>>,
    tooltip: Option<&'a str>,
}

impl<'a> TextButton<'a> {
    /// Create a new text button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            icon: None,
            tooltip: None,
        }
    }

    /// Draw an icon left of the label.
    pub fn icon(mut self, icon: ImageSource<'a>) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Hover text, e.g. with the keyboard shortcut.
    pub fn tooltip(mut self, tooltip: &'a str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(12.0);
        let galley = ui.painter().layout_no_wrap(
            self.label.to_string(),
            font_id.clone(),
            Color32::PLACEHOLDER,
        );
        let icon_size = 14.0;
        let icon_space = if self.icon.is_some() { icon_size + 6.0 } else { 0.0 };
        let size = vec2(galley.size().x + icon_space + 20.0, 28.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::WHITE
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                Stroke::new(1.0, theme::BORDER),
                StrokeKind::Inside,
            );

            let mut x = rect.left() + 10.0;
            if let Some(icon) = self.icon {
                let icon_rect = Rect::from_center_size(
                    Pos2::new(x + icon_size / 2.0, rect.center().y),
                    Vec2::splat(icon_size),
                );
                Image::new(icon)
                    .fit_to_exact_size(Vec2::splat(icon_size))
                    .tint(theme::TEXT)
                    .paint_at(ui, icon_rect);
                x += icon_space;
            }

            ui.painter().text(
                Pos2::new(x, rect.center().y),
                Align2::LEFT_CENTER,
                self.label,
                font_id,
                theme::TEXT,
            );
        }

        let clicked = response.clicked();
        let response = match self.tooltip {
            Some(tooltip) => response.on_hover_text(tooltip),
            None => response,
        };
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}
