use image::ImageBuffer;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Number of interleaved channels in every [`PixelBuffer`].
pub const CHANNELS: usize = 3;

// =============================================================================
// Rgb
// =============================================================================

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from unchecked host values. Every channel must lie in 0..=255.
    pub fn from_channels(r: i32, g: i32, b: i32) -> Result<Self> {
        let channel = |name: &str, v: i32| {
            u8::try_from(v).map_err(|_| {
                CoreError::invalid(format!("color channel {name}={v} is outside 0..=255"))
            })
        };
        Ok(Self::new(channel("r", r)?, channel("g", g)?, channel("b", b)?))
    }

    /// Lowercase `rrggbb` form, without a leading `#`.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `rrggbb` or `#rrggbb`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::invalid(format!("malformed hex color {s:?}")));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| CoreError::invalid(format!("malformed hex color {s:?}: {e}")))
        };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?))
    }

    pub fn to_array(self) -> [u8; CHANNELS] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; CHANNELS]> for Rgb {
    fn from(c: [u8; CHANNELS]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Resampling algorithm used by [`PixelBuffer::resize_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    Nearest,
    /// Triangle (linear) filter, pixel-center aligned with clamped edges.
    #[default]
    Bilinear,
}

impl From<Resample> for FilterType {
    fn from(filter: Resample) -> Self {
        match filter {
            Resample::Nearest => FilterType::Nearest,
            Resample::Bilinear => FilterType::Triangle,
        }
    }
}

// =============================================================================
// PixelBuffer
// =============================================================================

/// An owned 8-bit RGB image. 3 bytes per pixel, row-major, no padding.
///
/// Buffers handed out by the editor are only ever borrowed immutably, so a
/// snapshot stored in history cannot change after it is pushed. Every
/// transform returns a new buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer filled with a single color. Panics if either dimension is zero.
    pub fn of_size(width: u32, height: u32, fill: Rgb) -> Self {
        assert!(
            width > 0 && height > 0,
            "pixel buffer dimensions must be non-zero, got {width}x{height}"
        );
        let data = fill
            .to_array()
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap existing interleaved RGB data.
    pub fn from_rgb_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::invalid(format!(
                "pixel buffer dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(CoreError::invalid(format!(
                "RGB data length {} doesn't match {}x{}x3={}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn same_dimensions(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Color at (x, y). Panics if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        let idx = self.index(x, y);
        Rgb::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// A copy of this buffer with one pixel replaced. Panics if out of bounds.
    pub fn with_pixel(&self, x: u32, y: u32, color: Rgb) -> PixelBuffer {
        let mut out = self.clone();
        out.set_pixel(x, y, color);
        out
    }

    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        let idx = self.index(x, y);
        self.data[idx..idx + CHANNELS].copy_from_slice(&color.to_array());
    }

    /// Paint pixels `x0..=x1` of row `y`. Panics if out of bounds.
    pub(crate) fn fill_span(&mut self, y: u32, x0: u32, x1: u32, color: Rgb) {
        let start = self.index(x0, y);
        let end = self.index(x1, y) + CHANNELS;
        for px in self.data[start..end].chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&color.to_array());
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub(crate) fn row_bytes(&self) -> usize {
        self.width as usize * CHANNELS
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Resample to `width`x`height`. Returns a plain copy when dimensions already match.
    pub fn resize_to(&self, width: u32, height: u32, filter: Resample) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(CoreError::invalid(format!(
                "resize target must be non-zero, got {width}x{height}"
            )));
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let view = ImageBuffer::<image::Rgb<u8>, &[u8]>::from_raw(
            self.width,
            self.height,
            self.data.as_slice(),
        )
        .ok_or_else(|| CoreError::invalid("pixel data doesn't match dimensions"))?;
        let resized = imageops::resize(&view, width, height, filter.into());
        PixelBuffer::from_rgb_vec(width, height, resized.into_raw())
    }
}
