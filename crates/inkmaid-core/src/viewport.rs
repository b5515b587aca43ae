//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that corresponds to "100%" in the UI.
pub const BASE_ZOOM: f64 = 1.0;

/// Smallest zoom the viewport accepts by default.
pub const DEFAULT_MIN_ZOOM: f64 = 0.2;

/// Largest zoom the viewport accepts by default.
pub const DEFAULT_MAX_ZOOM: f64 = 3.0;

/// Which bound a zoom request ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLimit {
    Min,
    Max,
}

/// Outcome of running a proposed zoom value through [`ZoomBounds::clamp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomClamp {
    /// The value that was actually applied.
    pub zoom: f64,
    /// Set when the proposal was outside the bounds.
    pub limit: Option<ZoomLimit>,
}

/// Inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomBounds {
    /// Clamp a proposed zoom, reporting which bound (if any) was hit.
    pub fn clamp(&self, proposed: f64) -> ZoomClamp {
        if proposed < self.min {
            ZoomClamp {
                zoom: self.min,
                limit: Some(ZoomLimit::Min),
            }
        } else if proposed > self.max {
            ZoomClamp {
                zoom: self.max,
                limit: Some(ZoomLimit::Max),
            }
        } else {
            ZoomClamp {
                zoom: proposed,
                limit: None,
            }
        }
    }

    /// Check whether a zoom value lies inside the range.
    pub fn contains(&self, zoom: f64) -> bool {
        (self.min..=self.max).contains(&zoom)
    }

    /// The bound as a whole percentage, for notices.
    pub fn percent(&self, limit: ZoomLimit) -> u32 {
        let value = match limit {
            ZoomLimit::Min => self.min,
            ZoomLimit::Max => self.max,
        };
        (value * 100.0).round() as u32
    }
}

/// Pan and zoom applied to the rendered diagram.
///
/// Pan is in screen pixels and unconstrained; zoom is kept inside the
/// controller's [`ZoomBounds`] by whoever mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Current zoom factor (1.0 = 100%).
    pub zoom: f64,
    /// Current translation offset.
    pub pan: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: BASE_ZOOM,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    /// Create a viewport at 100% with no pan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for painting content laid out around `origin`.
    ///
    /// Content is translated by the pan and then scaled about `origin`, which
    /// is the visual centre of the preview area. Zoom is never anchored at the
    /// pointer.
    pub fn transform(&self, origin: Point) -> Affine {
        Affine::translate(origin.to_vec2() + self.pan)
            * Affine::scale(self.zoom)
            * Affine::translate(-origin.to_vec2())
    }

    /// CSS equivalent of [`Self::transform`], for a centre transform origin.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan.x, self.pan.y, self.zoom
        )
    }

    /// Zoom as a rounded percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Reset to 100% with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
