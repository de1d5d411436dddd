use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageFormat, ImageReader, RgbImage};
use paintboard_core::error::CoreError;
use paintboard_core::pixel::PixelBuffer;
use paintboard_core::store::ImageStore;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{MediaError, Result};

/// Decode any supported raster file into an RGB buffer at its native size.
/// Alpha is dropped and grayscale is expanded to three channels.
pub fn read_image(path: &Path) -> Result<PixelBuffer> {
    let reader = ImageReader::open(path)
        .map_err(|e| MediaError::OpenFailed(format!("{}: {e}", path.display())))?
        .with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| MediaError::UnsupportedFormat(path.display().to_string()))?;

    let rgb = reader
        .decode()
        .map_err(|e| MediaError::DecodeFailed(format!("{}: {e}", path.display())))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!(path = %path.display(), ?format, width, height, "decoded image");

    PixelBuffer::from_rgb_vec(width, height, rgb.into_raw())
        .map_err(|e| MediaError::DecodeFailed(e.to_string()))
}

/// Encode `img` to `path`, picking the format from the file extension.
///
/// The whole file is encoded in memory, written to a temporary file next to
/// `path` and renamed into place. A failure at any step leaves whatever was at
/// `path` untouched.
pub fn write_image(img: &PixelBuffer, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| MediaError::UnsupportedFormat(path.display().to_string()))?;
    if !format.writing_enabled() {
        return Err(MediaError::UnsupportedFormat(format!(
            "{format:?} output is not enabled: {}",
            path.display()
        )));
    }

    let buffer = RgbImage::from_raw(img.width(), img.height(), img.as_raw().to_vec())
        .ok_or_else(|| MediaError::EncodeFailed("pixel data doesn't match dimensions".into()))?;
    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| MediaError::EncodeFailed(format!("{}: {e}", path.display())))?;

    write_atomically(path, |file| Ok(file.write_all(&bytes)?))?;
    debug!(path = %path.display(), ?format, bytes = bytes.len(), "encoded image");
    Ok(())
}

/// Run `write` against a temporary file in `path`'s directory, then persist it
/// over `path`. The temporary file is removed if either step fails.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// File-backed persistence service using the `image` crate codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileStore;

impl ImageFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl ImageStore for ImageFileStore {
    fn decode(&self, path: &Path) -> paintboard_core::error::Result<PixelBuffer> {
        read_image(path).map_err(|e| CoreError::Decode(e.to_string()))
    }

    fn encode(&self, image: &PixelBuffer, path: &Path) -> paintboard_core::error::Result<()> {
        write_image(image, path).map_err(|e| CoreError::Encode(e.to_string()))
    }
}
