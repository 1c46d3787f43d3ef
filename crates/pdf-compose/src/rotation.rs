//! Page rotation in quarter turns
//!
//! All rotations in this crate are clockwise. A descriptor rotated by 90°
//! shows its former left edge at the top, both in the preview bitmap and
//! in the exported page (`/Rotate 90` is clockwise in PDF as well).

use crate::types::{ComposeError, Result};
use image::{RgbImage, imageops};

/// Clockwise rotation applied to a page at render and export time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Build a rotation from any multiple of 90°, negative values turn
    /// counter-clockwise.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(ComposeError::InvalidRotation(degrees));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Rotation::None,
            90 => Rotation::Clockwise90,
            180 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        })
    }

    /// `(self + delta) mod 360`
    pub fn rotated_by(self, delta_degrees: i32) -> Result<Self> {
        let delta = Self::from_degrees(delta_degrees)?;
        Self::from_degrees(self.degrees() + delta.degrees())
    }

    /// True when width and height trade places
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

/// Rotate a bitmap clockwise by `rotation`. The canvas grows to the
/// rotated bounding box, so nothing is cropped.
pub fn rotate_image(image: &RgbImage, rotation: Rotation) -> RgbImage {
    match rotation {
        Rotation::None => image.clone(),
        Rotation::Clockwise90 => imageops::rotate90(image),
        Rotation::Clockwise180 => imageops::rotate180(image),
        Rotation::Clockwise270 => imageops::rotate270(image),
    }
}
