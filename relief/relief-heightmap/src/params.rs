//! Heightmap parameters.

use relief_types::ReliefSettings;

use crate::error::{HeightmapError, HeightmapResult};

/// Controls how an image becomes a height field.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapParams {
    /// Exponent applied to clamped luminance.
    pub gamma: f64,
    /// Reflect values (`1 - v`) so bright areas become thin.
    pub invert: bool,
    /// Gaussian blur applied to the source before resampling (0 disables).
    pub blur_radius: f64,
    /// Output samples along X.
    pub width: u32,
    /// Output samples along Y.
    pub height: u32,
    /// Undo sRGB encoding before weighting channels.
    pub linearize: bool,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            invert: false,
            blur_radius: 0.0,
            width: 256,
            height: 256,
            linearize: false,
        }
    }
}

impl HeightmapParams {
    /// Default shaping at the given sample grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Shaping and grid taken from relief settings for an image of the given size.
    #[must_use]
    pub fn from_settings(settings: &ReliefSettings, image_width: u32, image_height: u32) -> Self {
        let (width, height, _) = settings.mesh_dims(image_width, image_height);
        Self {
            gamma: settings.gamma,
            invert: settings.invert,
            blur_radius: settings.blur,
            width,
            height,
            linearize: false,
        }
    }

    /// Set gamma.
    #[must_use]
    pub const fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set inversion.
    #[must_use]
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set blur radius.
    #[must_use]
    pub const fn with_blur(mut self, radius: f64) -> Self {
        self.blur_radius = radius;
        self
    }

    /// Enable sRGB linearization.
    #[must_use]
    pub const fn with_linearize(mut self, linearize: bool) -> Self {
        self.linearize = linearize;
        self
    }

    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is smaller than 2x2 or gamma is not
    /// positive.
    pub fn validate(&self) -> HeightmapResult<()> {
        if self.width < 2 || self.height < 2 {
            return Err(HeightmapError::TooSmall {
                width: self.width as usize,
                height: self.height as usize,
            });
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(HeightmapError::InvalidParams(format!(
                "gamma must be > 0, got {}",
                self.gamma
            )));
        }
        if !self.blur_radius.is_finite() {
            return Err(HeightmapError::InvalidParams(
                "blur radius must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(HeightmapParams::default().validate().is_ok());
        assert!(HeightmapParams::new(1, 8).validate().is_err());
        assert!(HeightmapParams::default().with_gamma(0.0).validate().is_err());
    }

    #[test]
    fn from_settings_uses_overrides() {
        let s = ReliefSettings::default()
            .with_mesh_size(64, 32)
            .with_gamma(2.2)
            .with_invert(true);
        let p = HeightmapParams::from_settings(&s, 100, 100);
        assert_eq!((p.width, p.height), (64, 32));
        assert!(p.invert);
        assert!((p.gamma - 2.2).abs() < 1e-12);
    }
}
