use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables for preview rendering and export
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComposeSettings {
    /// Base scale PDF pages are rasterized at before display scaling
    pub render_scale: f32,
    /// Horizontal space (pixels) kept free around auto-fitted previews
    pub preview_margin: f32,
    /// Distance (pixels) of the page-number badge from the page corner
    pub overlay_margin: f32,
    /// Zoom multiplier for one "zoom in" step
    pub zoom_in_factor: f32,
    /// Zoom multiplier for one "zoom out" step
    pub zoom_out_factor: f32,
    /// Resolution used to size image pages in the exported PDF
    pub image_dpi: f32,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            preview_margin: 40.0,
            overlay_margin: 10.0,
            zoom_in_factor: 1.15,
            zoom_out_factor: 0.87,
            image_dpi: 72.0,
        }
    }
}

impl ComposeSettings {
    /// Load settings from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let settings: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("render_scale", self.render_scale),
            ("image_dpi", self.image_dpi),
            ("zoom_in_factor", self.zoom_in_factor),
            ("zoom_out_factor", self.zoom_out_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ComposeError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("preview_margin", self.preview_margin),
            ("overlay_margin", self.overlay_margin),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ComposeError::Config(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.zoom_in_factor <= 1.0 {
            return Err(ComposeError::Config(
                "zoom_in_factor must be greater than 1".to_string(),
            ));
        }
        if self.zoom_out_factor >= 1.0 {
            return Err(ComposeError::Config(
                "zoom_out_factor must be less than 1".to_string(),
            ));
        }

        Ok(())
    }
}
