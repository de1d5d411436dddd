use paintboard_core::config::EditorConfig;
use paintboard_core::editor::Editor;
use paintboard_core::pixel::{PixelBuffer, Resample, Rgb};

use crate::fixtures::MemoryStore;

/// Builder for test images with sensible defaults.
pub struct PixelBufferBuilder {
    width: u32,
    height: u32,
    fill: Rgb,
    gradient: bool,
    pixels: Vec<(u32, u32, Rgb)>,
}

impl PixelBufferBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fill: Rgb::WHITE,
            gradient: false,
            pixels: Vec::new(),
        }
    }

    pub fn fill(mut self, color: Rgb) -> Self {
        self.fill = color;
        self
    }

    /// Distinct values per channel: red follows x, green follows y, blue mixes both.
    pub fn gradient(mut self) -> Self {
        self.gradient = true;
        self
    }

    pub fn pixel(mut self, x: u32, y: u32, color: Rgb) -> Self {
        self.pixels.push((x, y, color));
        self
    }

    pub fn build(self) -> PixelBuffer {
        let mut img = if self.gradient {
            let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
            for y in 0..self.height {
                for x in 0..self.width {
                    data.push((x * 255 / self.width.max(2).saturating_sub(1)) as u8);
                    data.push((y * 255 / self.height.max(2).saturating_sub(1)) as u8);
                    data.push(((x * 31 + y * 17) % 256) as u8);
                }
            }
            PixelBuffer::from_rgb_vec(self.width, self.height, data)
                .expect("gradient data matches dimensions")
        } else {
            PixelBuffer::of_size(self.width, self.height, self.fill)
        };
        for (x, y, color) in self.pixels {
            img = img.with_pixel(x, y, color);
        }
        img
    }
}

/// Builder for an editor backed by an in-memory store.
pub struct EditorBuilder {
    config: EditorConfig,
    store: MemoryStore,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            store: MemoryStore::new(),
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn background(mut self, color: Rgb) -> Self {
        self.config.background = color;
        self
    }

    pub fn resample(mut self, resample: Resample) -> Self {
        self.config.resample = resample;
        self
    }

    pub fn store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn build(self) -> Editor<MemoryStore> {
        Editor::new(self.config, self.store).expect("invalid editor config in test builder")
    }
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
