//! Render configuration.
//!
//! Every field has a default, so JSON files only need the values they change.

use std::path::Path;

use lumen_math::{near_zero, Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Intersection, DEFAULT_TILE_SIZE};

/// Everything needed to turn a world into an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum surface interactions per path
    pub max_depth: u32,

    // Camera pose
    pub lookfrom: Point3,
    pub lookat: Point3,
    pub vup: Vec3,

    // Lens
    pub vertical_fov_degrees: f64,
    pub aperture: f64,
    pub focus_distance: f64,

    // Scheduling
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Master seed; per-tile streams are derived from it
    pub seed: u32,
    /// Worker count, `None` = one per available core
    pub threads: Option<usize>,
    pub intersection: Intersection,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 10,
            max_depth: 50,
            lookfrom: Point3::ZERO,
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vertical_fov_degrees: 90.0,
            aperture: 0.0,
            focus_distance: 1.0,
            tile_size: DEFAULT_TILE_SIZE,
            seed: 42,
            threads: None,
            intersection: Intersection::Batch,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        RenderConfig::from_json_str(&json)
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, lookfrom: Point3, lookat: Point3, vup: Vec3) -> Self {
        self.lookfrom = lookfrom;
        self.lookat = lookat;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(
        mut self,
        vertical_fov_degrees: f64,
        aperture: f64,
        focus_distance: f64,
    ) -> Self {
        self.vertical_fov_degrees = vertical_fov_degrees;
        self.aperture = aperture;
        self.focus_distance = focus_distance;
        self
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Set a fixed worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Choose the intersection representation.
    pub fn with_intersection(mut self, intersection: Intersection) -> Self {
        self.intersection = intersection;
        self
    }

    /// Width over height of the output image.
    pub fn aspect_ratio(&self) -> f64 {
        self.image_width as f64 / self.image_height as f64
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if self.image_width == 0 || self.image_height == 0 {
            return invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.image_width, self.image_height
            ));
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples_per_pixel must be at least 1".into());
        }
        if self.tile_size == 0 {
            return invalid("tile_size must be at least 1".into());
        }
        if self.threads == Some(0) {
            return invalid("threads must be at least 1 when set".into());
        }
        if !(self.vertical_fov_degrees > 0.0 && self.vertical_fov_degrees < 180.0) {
            return invalid(format!(
                "vertical_fov_degrees must be in (0, 180), got {}",
                self.vertical_fov_degrees
            ));
        }
        if !(self.aperture >= 0.0 && self.aperture.is_finite()) {
            return invalid(format!("aperture must be >= 0, got {}", self.aperture));
        }
        if !(self.focus_distance > 0.0 && self.focus_distance.is_finite()) {
            return invalid(format!("focus_distance must be > 0, got {}", self.focus_distance));
        }

        let view = self.lookfrom - self.lookat;
        if near_zero(view) {
            return invalid("lookfrom and lookat must differ".into());
        }
        if near_zero(self.vup.cross(view)) {
            return invalid("vup must not be parallel to the view direction".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = RenderConfig::default()
            .with_resolution(800, 400)
            .with_quality(32, 8)
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.1, 10.0)
            .with_seed(7)
            .with_threads(2)
            .with_intersection(Intersection::Scalar);

        assert_eq!(config.aspect_ratio(), 2.0);
        assert_eq!(config.samples_per_pixel, 32);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.intersection, Intersection::Scalar);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RenderConfig::from_json_str(
            r#"{
                "image_width": 320,
                "image_height": 180,
                "lookfrom": [13.0, 2.0, 3.0],
                "lookat": [0.0, 0.0, 0.0],
                "intersection": "scalar"
            }"#,
        )
        .unwrap();

        assert_eq!(config.image_width, 320);
        assert_eq!(config.lookfrom, Vec3::new(13.0, 2.0, 3.0));
        assert_eq!(config.intersection, Intersection::Scalar);
        assert_eq!(config.max_depth, RenderConfig::default().max_depth);
        assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases = [
            RenderConfig::default().with_resolution(0, 10),
            RenderConfig::default().with_quality(0, 10),
            RenderConfig::default().with_threads(0),
            RenderConfig::default().with_lens(180.0, 0.0, 1.0),
            RenderConfig::default().with_lens(60.0, -1.0, 1.0),
            RenderConfig::default().with_lens(60.0, 0.0, 0.0),
            RenderConfig::default().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y),
            RenderConfig::default().with_position(Vec3::Y, Vec3::ZERO, Vec3::Y),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RenderConfig::from_json_str("{ \"image_width\": -3 }"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RenderConfig::from_json_str("{ \"samples_per_pixel\": 0 }"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
