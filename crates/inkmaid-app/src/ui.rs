//! UI components using egui.

use std::sync::Arc;

use egui::load::{SizeHint, TexturePoll};
use egui::{
    Align, Align2, Color32, Context, CornerRadius, CursorIcon, Frame, Id, Image, LayerId, Layout,
    Margin, Order, Painter, Pos2, Rect, RichText, ScrollArea, Stroke, StrokeKind, TextEdit,
    TextureOptions, Vec2, include_image, pos2,
};
use inkmaid_core::{EditorSession, Preview, TEMPLATES, Template, ZoomLimit};
use inkmaid_widgets::{
    BadgeTone, IconButton, TextButton, ZoomCommand, ZoomControl, error_panel, hint_label,
    menu_item, menu_separator, notice_badge, panel_frame, placeholder_text, section_label, theme,
    toolbar_frame, vertical_separator,
};
use kurbo::Point;

/// Hint painted over the preview.
pub const PREVIEW_HINT: &str = "Drag to pan \u{2022} Scroll/Pinch to zoom";

/// SVGs are rasterized at this multiple of the display scale so zooming in
/// stays reasonably sharp.
const RASTER_SCALE: f32 = 2.0;

const MARGIN: f32 = 12.0;
const HEADER_HEIGHT: f32 = 52.0;
const PANEL_HEADER_HEIGHT: f32 = 44.0;
/// Below this width the editor and preview are stacked instead of side by side.
const TWO_COLUMN_MIN_WIDTH: f32 = 900.0;

/// Actions triggered by UI interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// The editor text changed; re-render it.
    EditSource,
    /// Replace the source with a template.
    LoadTemplate(&'static Template),
    ZoomIn,
    ZoomOut,
    /// Back to 100% with no pan.
    ResetView,
    ToggleFullscreen,
    CloseFullscreen,
    /// Copy the Mermaid source to the clipboard.
    CopySource,
    /// Save the rendered diagram as SVG.
    ExportSvg,
    /// Show keyboard shortcuts help.
    ShowShortcuts,
}

/// Rasterized preview of the markup currently shown.
struct PreviewTexture {
    uri: String,
    markup: Arc<str>,
}

/// UI state that persists across frames.
pub struct UiState {
    /// Editor buffer; mirrors the session source.
    pub source: String,
    pub templates_menu_open: bool,
    pub shortcuts_modal_open: bool,
    /// A render is still outstanding.
    pub rendering: bool,
    /// Where the preview was drawn this frame, in points. Pointer input
    /// starting here drives the viewport.
    pub preview_rect: Option<Rect>,
    preview: Option<PreviewTexture>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new("")
    }
}

impl UiState {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            templates_menu_open: false,
            shortcuts_modal_open: false,
            rendering: false,
            preview_rect: None,
            preview: None,
        }
    }

    /// Whether `pos` (in points) is over the preview drawn last frame.
    pub fn is_over_preview(&self, pos: Pos2) -> bool {
        self.preview_rect.is_some_and(|rect| rect.contains(pos))
    }

    /// Register the session's markup with egui's loaders, replacing the
    /// previous diagram. Returns the image URI to paint, if any.
    fn sync_preview(&mut self, ctx: &Context, session: &EditorSession) -> Option<String> {
        let markup = session.orchestrator().markup();
        let unchanged = match (&self.preview, &markup) {
            (Some(current), Some(markup)) => Arc::ptr_eq(&current.markup, markup),
            (None, None) => true,
            _ => false,
        };

        if !unchanged {
            if let Some(old) = self.preview.take() {
                ctx.forget_image(&old.uri);
            }
            if let Some(markup) = markup {
                let uri = format!(
                    "bytes://diagram-{}.svg",
                    session.orchestrator().applied_seq()
                );
                ctx.include_bytes(uri.clone(), markup.as_bytes().to_vec());
                self.preview = Some(PreviewTexture { uri, markup });
            }
        }

        self.preview.as_ref().map(|p| p.uri.clone())
    }
}

/// Render the UI and return any action triggered.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, session: &EditorSession) -> Option<UiAction> {
    egui_extras::install_image_loaders(ctx);

    let preview_uri = ui_state.sync_preview(ctx, session);
    ui_state.preview_rect = None;

    #[allow(deprecated)]
    let screen_rect = ctx.input(|i| i.content_rect());

    let action = if session.is_fullscreen() {
        render_fullscreen(ctx, ui_state, session, preview_uri.as_deref(), screen_rect)
    } else {
        let (editor_rect, preview_rect) = split_layout(screen_rect);
        let header_action = render_header(ctx, ui_state);
        let editor_action = render_editor(ctx, ui_state, editor_rect);
        let preview_action =
            render_preview_panel(ctx, ui_state, session, preview_uri.as_deref(), preview_rect);
        let menu_action = render_templates_menu(ctx, ui_state);
        header_action.or(editor_action).or(preview_action).or(menu_action)
    };

    if ui_state.shortcuts_modal_open {
        render_shortcuts_modal(ctx, ui_state);
    }

    action
}

/// Editor and preview panel rects below the header.
fn split_layout(screen_rect: Rect) -> (Rect, Rect) {
    let body = Rect::from_min_max(
        pos2(screen_rect.left() + MARGIN, screen_rect.top() + MARGIN * 2.0 + HEADER_HEIGHT),
        pos2(screen_rect.right() - MARGIN, screen_rect.bottom() - MARGIN),
    );

    if body.width() >= TWO_COLUMN_MIN_WIDTH {
        let column = (body.width() - MARGIN) / 2.0;
        let editor = Rect::from_min_size(body.min, Vec2::new(column, body.height()));
        let preview = Rect::from_min_max(pos2(editor.right() + MARGIN, body.top()), body.max);
        (editor, preview)
    } else {
        let row = (body.height() - MARGIN) / 2.0;
        let editor = Rect::from_min_size(body.min, Vec2::new(body.width(), row));
        let preview = Rect::from_min_max(pos2(body.left(), editor.bottom() + MARGIN), body.max);
        (editor, preview)
    }
}

/// Title, templates button, copy and export.
fn render_header(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(Id::new("header_left"))
        .anchor(Align2::LEFT_TOP, Vec2::new(MARGIN, MARGIN))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(8.0, 0.0);
                    ui.add(
                        Image::new(include_image!("../assets/logo.svg"))
                            .fit_to_exact_size(Vec2::splat(20.0))
                            .tint(theme::ACCENT),
                    );
                    ui.label(RichText::new("Inkmaid").size(16.0).strong().color(theme::TEXT));
                    vertical_separator(ui);
                    if TextButton::new("Templates")
                        .icon(include_image!("../assets/template.svg"))
                        .tooltip("Quick start from an example diagram")
                        .show(ui)
                    {
                        ui_state.templates_menu_open = !ui_state.templates_menu_open;
                    }
                });
            });
        });

    egui::Area::new(Id::new("header_right"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-MARGIN, MARGIN))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);
                    if TextButton::new("Copy Code")
                        .icon(include_image!("../assets/copy.svg"))
                        .tooltip("Copy Mermaid source (Ctrl+Shift+C)")
                        .show(ui)
                    {
                        action = Some(UiAction::CopySource);
                    }
                    if TextButton::new("Download SVG")
                        .icon(include_image!("../assets/download.svg"))
                        .tooltip("Save the diagram as diagram.svg (Ctrl+E)")
                        .show(ui)
                    {
                        action = Some(UiAction::ExportSvg);
                    }
                });
            });
        });

    action
}

/// Template dropdown under the header (only shown when open).
fn render_templates_menu(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    if !ui_state.templates_menu_open {
        return None;
    }
    let mut action = None;

    egui::Area::new(Id::new("templates_menu"))
        .anchor(Align2::LEFT_TOP, Vec2::new(MARGIN, MARGIN + HEADER_HEIGHT + 4.0))
        .order(Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(200.0);
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);
                    for template in TEMPLATES.iter() {
                        if menu_item(ui, template.name) {
                            action = Some(UiAction::LoadTemplate(template));
                            ui_state.templates_menu_open = false;
                        }
                    }
                    menu_separator(ui);
                    if menu_item(ui, "Keyboard Shortcuts") {
                        action = Some(UiAction::ShowShortcuts);
                        ui_state.templates_menu_open = false;
                    }
                });
            });
        });

    action
}

/// Source editor panel.
fn render_editor(ctx: &Context, ui_state: &mut UiState, rect: Rect) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(Id::new("editor_panel"))
        .fixed_pos(rect.min)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                let inner = rect.shrink(9.0);
                ui.set_min_size(inner.size());
                ui.set_max_size(inner.size());
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.set_height(PANEL_HEADER_HEIGHT - 16.0);
                        section_label(ui, "Mermaid Code");
                    });
                    ui.add_space(4.0);

                    Frame::new()
                        .fill(Color32::WHITE)
                        .stroke(Stroke::new(1.0, theme::BORDER))
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(Margin::same(6))
                        .show(ui, |ui| {
                            ScrollArea::vertical()
                                .auto_shrink([false, false])
                                .show(ui, |ui| {
                                    let response = ui.add(
                                        TextEdit::multiline(&mut ui_state.source)
                                            .code_editor()
                                            .hint_text("Enter your Mermaid diagram code here...")
                                            .desired_width(f32::INFINITY)
                                            .frame(false),
                                    );
                                    if response.changed() {
                                        action = Some(UiAction::EditSource);
                                    }
                                });
                        });
                });
            });
        });

    action
}

/// Preview panel: header with zoom strip, then the pan/zoom surface.
fn render_preview_panel(
    ctx: &Context,
    ui_state: &mut UiState,
    session: &EditorSession,
    preview_uri: Option<&str>,
    rect: Rect,
) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(Id::new("preview_header"))
        .fixed_pos(rect.min)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(rect.width() - 18.0);
                ui.horizontal(|ui| {
                    section_label(ui, "Preview");
                    if ui_state.rendering {
                        ui.label(
                            RichText::new("Rendering\u{2026}")
                                .size(11.0)
                                .color(theme::TEXT_MUTED),
                        );
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        action = zoom_strip(ui, session, true);
                        if matches!(session.orchestrator().preview(), Preview::Error(_)) {
                            ui.add_space(8.0);
                            Frame::new()
                                .fill(theme::ERROR_BG)
                                .corner_radius(CornerRadius::same(4))
                                .inner_margin(Margin::symmetric(8, 2))
                                .show(ui, |ui| {
                                    ui.label(
                                        RichText::new("Syntax Error")
                                            .size(11.0)
                                            .color(theme::ERROR_TEXT),
                                    );
                                });
                        }
                    });
                });
            });
        });

    let body = Rect::from_min_max(pos2(rect.left(), rect.top() + PANEL_HEADER_HEIGHT + 6.0), rect.max);
    paint_preview(ctx, ui_state, session, preview_uri, body, LayerId::background());

    action
}

/// Zoom out / percentage / zoom in, then reset and either fullscreen or close.
fn zoom_strip(ui: &mut egui::Ui, session: &EditorSession, show_fullscreen: bool) -> Option<UiAction> {
    let mut action = None;
    ui.spacing_mut().item_spacing = Vec2::new(2.0, 0.0);

    // Right-to-left layout: rightmost first.
    if show_fullscreen {
        if IconButton::new(include_image!("../assets/maximize.svg"), "Fullscreen")
            .shortcut("Ctrl+F")
            .small()
            .show(ui)
        {
            action = Some(UiAction::ToggleFullscreen);
        }
    } else if IconButton::new(include_image!("../assets/close.svg"), "Close")
        .shortcut("Escape")
        .small()
        .show(ui)
    {
        action = Some(UiAction::CloseFullscreen);
    }

    if IconButton::new(include_image!("../assets/reset.svg"), "Reset View")
        .shortcut("Ctrl+0")
        .small()
        .show(ui)
    {
        action = Some(UiAction::ResetView);
    }
    vertical_separator(ui);

    ui.allocate_ui_with_layout(Vec2::new(110.0, 24.0), Layout::left_to_right(Align::Center), |ui| {
        let percent = session.viewport().viewport().zoom_percent();
        match ZoomControl::new(percent).show(ui) {
            Some(ZoomCommand::In) => action = Some(UiAction::ZoomIn),
            Some(ZoomCommand::Out) => action = Some(UiAction::ZoomOut),
            Some(ZoomCommand::Reset) => action = Some(UiAction::ResetView),
            None => {}
        }
    });

    action
}

/// Paint the diagram (or its error) into `body` and register it for input.
fn paint_preview(
    ctx: &Context,
    ui_state: &mut UiState,
    session: &EditorSession,
    preview_uri: Option<&str>,
    body: Rect,
    layer: LayerId,
) {
    ui_state.preview_rect = Some(body);
    let painter = ctx.layer_painter(layer).with_clip_rect(body);

    painter.rect_filled(body, CornerRadius::same(8), theme::CANVAS_BG);
    painter.rect_stroke(
        body,
        CornerRadius::same(8),
        Stroke::new(1.0, theme::BORDER),
        StrokeKind::Inside,
    );

    match session.orchestrator().preview() {
        Preview::Empty => placeholder_text(&painter, body, "Rendering\u{2026}"),
        Preview::Diagram(_) => match preview_uri {
            Some(uri) => paint_diagram(ctx, &painter, session, uri, body),
            None => placeholder_text(&painter, body, "Rendering\u{2026}"),
        },
        Preview::Error(err) => {
            egui::Area::new(Id::new(("preview_error", layer.id)))
                .pivot(Align2::CENTER_CENTER)
                .fixed_pos(body.center())
                .interactable(false)
                .order(Order::Foreground)
                .show(ctx, |ui| {
                    error_panel(ui, "Syntax Error", err.message());
                });
        }
    }

    hint_label(&painter, body, PREVIEW_HINT);

    if let (Some(limit), Some(message)) = (
        session.viewport().notice(),
        session.viewport().notice_message(),
    ) {
        let tone = match limit {
            ZoomLimit::Min => BadgeTone::Warning,
            ZoomLimit::Max => BadgeTone::Info,
        };
        egui::Area::new(Id::new(("zoom_notice", layer.id)))
            .pivot(Align2::RIGHT_TOP)
            .fixed_pos(pos2(body.right() - MARGIN, body.top() + MARGIN))
            .interactable(false)
            .order(Order::Foreground)
            .show(ctx, |ui| {
                notice_badge(ui, tone, &message);
            });
    }

    let hovered = ctx
        .pointer_hover_pos()
        .is_some_and(|pos| body.contains(pos))
        && !ctx.is_pointer_over_area();
    if session.viewport().gesture().is_dragging() {
        ctx.set_cursor_icon(CursorIcon::Grabbing);
    } else if hovered {
        ctx.set_cursor_icon(CursorIcon::Grab);
    }
}

/// Draw the rasterized SVG under the viewport transform.
fn paint_diagram(ctx: &Context, painter: &Painter, session: &EditorSession, uri: &str, body: Rect) {
    let scale = ctx.pixels_per_point() * RASTER_SCALE;
    let texture = match ctx.try_load_texture(
        uri,
        TextureOptions::LINEAR,
        SizeHint::default().scale_by(scale),
    ) {
        Ok(TexturePoll::Ready { texture }) => texture,
        Ok(TexturePoll::Pending { .. }) => {
            placeholder_text(painter, body, "Rendering\u{2026}");
            return;
        }
        Err(e) => {
            log::warn!("Failed to rasterize diagram: {}", e);
            placeholder_text(painter, body, "Preview unavailable");
            return;
        }
    };

    let natural = fit_within(texture.size / scale, body.size());
    let origin = Point::new(body.center().x as f64, body.center().y as f64);
    let transform = session.viewport().transform(origin);
    let half = Vec2::new(natural.x / 2.0, natural.y / 2.0);
    let min = transform * Point::new(origin.x - half.x as f64, origin.y - half.y as f64);
    let max = transform * Point::new(origin.x + half.x as f64, origin.y + half.y as f64);

    painter.image(
        texture.id,
        Rect::from_min_max(pos2(min.x as f32, min.y as f32), pos2(max.x as f32, max.y as f32)),
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
        Color32::WHITE,
    );
}

/// Shrink `size` uniformly to fit `bounds`, never enlarging it.
fn fit_within(size: Vec2, bounds: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return size;
    }
    let factor = (bounds.x / size.x).min(bounds.y / size.y).min(1.0);
    size * factor
}

/// Fullscreen modal sharing the viewport and markup with the main preview.
fn render_fullscreen(
    ctx: &Context,
    ui_state: &mut UiState,
    session: &EditorSession,
    preview_uri: Option<&str>,
    screen_rect: Rect,
) -> Option<UiAction> {
    let mut action = None;

    // Backdrop
    ctx.layer_painter(LayerId::background())
        .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(128));

    let max_size = Vec2::new(1152.0, screen_rect.height() * 0.9);
    let size = (screen_rect.size() - Vec2::splat(MARGIN * 2.0)).min(max_size);
    let card = Rect::from_center_size(screen_rect.center(), size);

    egui::Area::new(Id::new("fullscreen_header"))
        .fixed_pos(card.min)
        .order(Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().fill(Color32::WHITE).show(ui, |ui| {
                ui.set_width(card.width() - 18.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Diagram Preview").size(16.0).strong().color(theme::TEXT));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        action = zoom_strip(ui, session, false);
                    });
                });
            });
        });

    let body = Rect::from_min_max(pos2(card.left(), card.top() + PANEL_HEADER_HEIGHT + 6.0), card.max);
    paint_preview(
        ctx,
        ui_state,
        session,
        preview_uri,
        body,
        LayerId::new(Order::Middle, Id::new("fullscreen_preview")),
    );

    action
}

/// Keyboard shortcuts help modal.
fn render_shortcuts_modal(ctx: &Context, ui_state: &mut UiState) {
    use crate::shortcuts::ShortcutRegistry;

    // Backdrop
    egui::Area::new(Id::new("shortcuts_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(Order::Foreground)
        .show(ctx, |ui| {
            #[allow(deprecated)]
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter().rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                ui_state.shortcuts_modal_open = false;
            }
        });

    // Modal window
    egui::Area::new(Id::new("shortcuts_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(Order::Tooltip)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(420.0);
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Keyboard Shortcuts").size(16.0).strong());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if IconButton::new(include_image!("../assets/close.svg"), "Close")
                                .small()
                                .show(ui)
                            {
                                ui_state.shortcuts_modal_open = false;
                            }
                        });
                    });

                    ui.add_space(12.0);

                    for shortcut in ShortcutRegistry::all() {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(shortcut.format())
                                    .size(12.0)
                                    .family(egui::FontFamily::Monospace)
                                    .color(Color32::from_rgb(100, 116, 139)),
                            );
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(
                                    RichText::new(shortcut.description)
                                        .size(12.0)
                                        .color(theme::TEXT_MUTED),
                                );
                            });
                        });
                        ui.add_space(4.0);
                    }
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_layout_side_by_side() {
        let screen = Rect::from_min_size(Pos2::ZERO, Vec2::new(1280.0, 800.0));
        let (editor, preview) = split_layout(screen);
        assert!((editor.width() - preview.width()).abs() < 0.5);
        assert!((editor.top() - preview.top()).abs() < f32::EPSILON);
        assert!(editor.right() < preview.left());
    }

    #[test]
    fn test_split_layout_stacked() {
        let screen = Rect::from_min_size(Pos2::ZERO, Vec2::new(600.0, 900.0));
        let (editor, preview) = split_layout(screen);
        assert!((editor.left() - preview.left()).abs() < f32::EPSILON);
        assert!(editor.bottom() < preview.top());
    }

    #[test]
    fn test_fit_within() {
        let fitted = fit_within(Vec2::new(800.0, 400.0), Vec2::new(400.0, 400.0));
        assert!((fitted.x - 400.0).abs() < f32::EPSILON);
        assert!((fitted.y - 200.0).abs() < f32::EPSILON);

        // Small diagrams keep their natural size.
        let small = fit_within(Vec2::new(100.0, 50.0), Vec2::new(400.0, 400.0));
        assert_eq!(small, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_preview_rect_hit_test() {
        let mut state = UiState::new("graph TD");
        assert!(!state.is_over_preview(pos2(10.0, 10.0)));
        state.preview_rect = Some(Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0)));
        assert!(state.is_over_preview(pos2(10.0, 10.0)));
        assert!(!state.is_over_preview(pos2(150.0, 10.0)));
    }
}
