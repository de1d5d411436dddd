use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use paintboard_core::error::{CoreError, Result};
use paintboard_core::pixel::PixelBuffer;
use paintboard_core::store::ImageStore;

/// In-memory persistence service for tests that don't need real files.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<PathBuf, PixelBuffer>>,
    fail_encodes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `encode` always fails.
    pub fn failing_encoder() -> Self {
        Self {
            fail_encodes: true,
            ..Self::default()
        }
    }

    pub fn with_file(self, path: impl Into<PathBuf>, image: PixelBuffer) -> Self {
        self.files.borrow_mut().insert(path.into(), image);
        self
    }

    pub fn get(&self, path: &Path) -> Option<PixelBuffer> {
        self.files.borrow().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl ImageStore for MemoryStore {
    fn decode(&self, path: &Path) -> Result<PixelBuffer> {
        self.get(path)
            .ok_or_else(|| CoreError::Decode(format!("no such file: {}", path.display())))
    }

    fn encode(&self, image: &PixelBuffer, path: &Path) -> Result<()> {
        if self.fail_encodes {
            return Err(CoreError::Encode(format!(
                "write refused: {}",
                path.display()
            )));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), image.clone());
        Ok(())
    }
}

/// Write `img` as a PNG named `{name}.png` inside `dir`.
pub fn write_test_png(dir: &Path, name: &str, img: &PixelBuffer) -> PathBuf {
    let path = dir.join(format!("{name}.png"));
    let rgb = image::RgbImage::from_raw(img.width(), img.height(), img.as_raw().to_vec())
        .expect("pixel buffer length matches dimensions");
    rgb.save(&path).expect("failed to write test png");
    assert!(path.exists(), "test png was not created: {name}");
    path
}

/// Write bytes that no image decoder accepts.
pub fn write_garbage_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").expect("failed to write garbage file");
    path
}

/// Get a temporary directory for test fixtures that persists for the test run.
pub fn fixture_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("failed to create temp dir for fixtures")
}
