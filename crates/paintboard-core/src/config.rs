use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::filters::TileGrid;
use crate::pixel::{PixelBuffer, Resample, Rgb};

/// Editor settings. Every field has a default, so a partial JSON file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canonical canvas width; loaded images are resampled to it.
    pub width: u32,
    /// Canonical canvas height.
    pub height: u32,
    /// Fill color of a new canvas.
    pub background: Rgb,
    pub resample: Resample,
    /// Tile grid used when the host doesn't pick one.
    pub clahe_grid: TileGrid,
    pub clahe_clip_limit: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            background: Rgb::WHITE,
            resample: Resample::Bilinear,
            clahe_grid: TileGrid::default(),
            clahe_clip_limit: 2.0,
        }
    }
}

impl EditorConfig {
    /// Default settings with a different canvas size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::invalid(format!(
                "canvas size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        self.clahe_grid.validate()?;
        if !(self.clahe_clip_limit.is_finite() && self.clahe_clip_limit > 0.0) {
            return Err(CoreError::invalid(format!(
                "default clip limit must be a positive number, got {}",
                self.clahe_clip_limit
            )));
        }
        Ok(())
    }

    /// A blank canvas at the configured size and background.
    pub fn blank_canvas(&self) -> PixelBuffer {
        PixelBuffer::of_size(self.width, self.height, self.background)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
