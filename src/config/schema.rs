//! Configuration schema types for `crayola.toml`
//!
//! Defines the structure and validation rules for headless scene playback.

use crate::models::{Dimension, ScreenSize};
use crate::scene::DEFAULT_PIXEL_SIZE;
use serde::{Deserialize, Serialize};

/// Scene defaults, used when a scene document leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Size of each rendered pixel block
    #[serde(default = "default_pixel_size")]
    pub pixel_size: u32,
    /// Logical screen width applied to the container
    #[serde(default)]
    pub width: Dimension,
    #[serde(default)]
    pub height: Dimension,
}

impl SceneConfig {
    pub fn screen_size(&self) -> ScreenSize {
        ScreenSize::new(self.width, self.height)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            pixel_size: default_pixel_size(),
            width: Dimension::default(),
            height: Dimension::default(),
        }
    }
}

fn default_pixel_size() -> u32 {
    DEFAULT_PIXEL_SIZE
}

/// Simulated host viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: u32,
    #[serde(default = "default_viewport_height")]
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

fn default_viewport_width() -> u32 {
    320
}

fn default_viewport_height() -> u32 {
    240
}

/// Playback and output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Number of updates to run
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// GIF delay per tick in milliseconds
    #[serde(default = "default_frame_duration_ms")]
    pub frame_duration_ms: u32,
    /// Loop GIF output forever
    #[serde(default = "default_true", rename = "loop")]
    pub loop_anim: bool,
    /// Integer upscale applied to written images
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Treat scene warnings as errors
    #[serde(default)]
    pub strict: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            frame_duration_ms: default_frame_duration_ms(),
            loop_anim: true,
            scale: default_scale(),
            strict: false,
        }
    }
}

fn default_ticks() -> u32 {
    1
}

fn default_frame_duration_ms() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_scale() -> u32 {
    1
}

/// Complete crayola.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CrayolaConfig {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "scene.pixel_size")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "crayola.toml: '{}' {}", self.field, self.message)
    }
}

impl CrayolaConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: u32| {
            if value == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a positive integer".to_string(),
                });
            }
        };

        positive("scene.pixel_size", self.scene.pixel_size);
        positive("viewport.width", self.viewport.width);
        positive("viewport.height", self.viewport.height);
        positive("render.ticks", self.render.ticks);
        positive("render.scale", self.render.scale);

        if self.render.scale > 16 {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: "must be at most 16".to_string(),
            });
        }

        errors
    }
}
