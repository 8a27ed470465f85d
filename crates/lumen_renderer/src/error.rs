//! Error types for scene construction, configuration and rendering.

use thiserror::Error;

/// Errors raised while building a [`World`](crate::World).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Sphere {index} has invalid radius {radius} (must be finite and > 0)")]
    InvalidRadius { index: usize, radius: f64 },

    #[error("Sphere {index} references unknown material {material}")]
    UnknownMaterial { index: usize, material: usize },

    #[error("Material {index} is invalid: {reason}")]
    InvalidMaterial { index: usize, reason: String },
}

/// Errors raised while loading or validating a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Errors raised by [`render`](crate::render).
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Render was cancelled")]
    Cancelled,
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
