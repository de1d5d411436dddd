use std::path::Path;

use crate::error::Result;
use crate::pixel::PixelBuffer;

/// The persistence service: turns files into pixel buffers and back.
///
/// `decode` returns the file's native dimensions; the editor resamples to the
/// canvas size. Both calls are all-or-nothing: a failed `encode` must not
/// leave a partially written file behind.
pub trait ImageStore {
    /// Read `path`. Failures are reported as [`CoreError::Decode`](crate::error::CoreError::Decode).
    fn decode(&self, path: &Path) -> Result<PixelBuffer>;

    /// Write `image` to `path`. Failures are reported as [`CoreError::Encode`](crate::error::CoreError::Encode).
    fn encode(&self, image: &PixelBuffer, path: &Path) -> Result<()>;
}

impl<S: ImageStore + ?Sized> ImageStore for &S {
    fn decode(&self, path: &Path) -> Result<PixelBuffer> {
        (**self).decode(path)
    }

    fn encode(&self, image: &PixelBuffer, path: &Path) -> Result<()> {
        (**self).encode(image, path)
    }
}
