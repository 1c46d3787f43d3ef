//! Preview scaling state

use crate::settings::ComposeSettings;

/// Smallest allowed zoom factor
pub const ZOOM_MIN: f32 = 0.2;

/// Largest allowed zoom factor
pub const ZOOM_MAX: f32 = 4.0;

/// How the preview decides its display scale
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState {
    /// Fixed zoom, used only when `auto_fit` is off
    pub zoom_factor: f32,
    /// Scale every page to the width of the preview area
    pub auto_fit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            auto_fit: true,
        }
    }
}

impl ViewState {
    /// Multiply the zoom by `factor` and switch to fixed zoom
    pub fn adjust_zoom(&mut self, factor: f32) {
        self.auto_fit = false;
        self.zoom_factor = (self.zoom_factor * factor).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_in(&mut self, settings: &ComposeSettings) {
        self.adjust_zoom(settings.zoom_in_factor);
    }

    pub fn zoom_out(&mut self, settings: &ComposeSettings) {
        self.adjust_zoom(settings.zoom_out_factor);
    }

    pub fn fit(&mut self) {
        self.auto_fit = true;
    }

    /// Scale to apply to a bitmap `bitmap_width` pixels wide when the
    /// preview area is `viewport_width` pixels wide
    pub fn display_scale(&self, bitmap_width: u32, viewport_width: f32, margin: f32) -> f32 {
        if !self.auto_fit {
            return self.zoom_factor;
        }
        if bitmap_width == 0 {
            return 1.0;
        }
        let available = (viewport_width - margin).max(1.0);
        available / bitmap_width as f32
    }
}
