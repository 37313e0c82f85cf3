use std::path::PathBuf;
use thiserror::Error;

/// Reasons a set of tree parameters is refused before rendering.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("canvas must be at least 1x1, got {size_x}x{size_y}")]
    EmptyCanvas { size_x: u32, size_y: u32 },

    #[error("canvas {size_x}x{size_y} exceeds the {limit} pixel limit")]
    CanvasTooLarge { size_x: u32, size_y: u32, limit: u64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("min_angle ({min}°) is greater than max_angle ({max}°)")]
    AngleRange { min: f64, max: f64 },

    #[error("unknown color {0:?}")]
    UnknownColor(String),

    #[error("branch_chance_mu {mu} exceeds the limit of {limit}")]
    RunawayBranching { mu: f64, limit: f64 },
}

/// Failures of a rendering pass after the configuration was accepted.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems reading the optional settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
