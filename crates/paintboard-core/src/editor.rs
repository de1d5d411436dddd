use std::borrow::Cow;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::compositor;
use crate::config::EditorConfig;
use crate::error::Result;
use crate::filters::{self, Filter, TileGrid};
use crate::history::ImageHistory;
use crate::pixel::{PixelBuffer, Rgb};
use crate::store::ImageStore;
use crate::stroke::{LineSegment, Point, StrokeBuffer};

const BLANK_CANVAS: &str = "Blank canvas";
const LOAD: &str = "Load";
const STROKES: &str = "Strokes";

/// The editing session: undo history, pending strokes and the persistence
/// service, behind one interface for the host.
///
/// Every mutating call either completes fully or returns an error before
/// touching the history or the stroke buffer.
pub struct Editor<S> {
    config: EditorConfig,
    history: ImageHistory,
    strokes: StrokeBuffer,
    store: S,
}

impl<S: ImageStore> Editor<S> {
    /// Start with a blank canvas described by `config`.
    pub fn new(config: EditorConfig, store: S) -> Result<Self> {
        config.validate()?;
        let history = ImageHistory::new(BLANK_CANVAS, config.blank_canvas());
        Ok(Self {
            config,
            history,
            strokes: StrokeBuffer::new(),
            store,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Persistence ---

    /// Decode `path`, resample it to the canvas size and make it the only
    /// history entry. Pending strokes are discarded.
    pub fn load(&mut self, path: &Path) -> Result<&PixelBuffer> {
        let decoded = self.store.decode(path)?;
        let (source_w, source_h) = (decoded.width(), decoded.height());
        let image = decoded.resize_to(self.config.width, self.config.height, self.config.resample)?;

        self.reset_document(LOAD, image);
        info!(
            path = %path.display(),
            source_width = source_w,
            source_height = source_h,
            "image loaded"
        );
        Ok(self.history.top())
    }

    /// Encode the current image to `path`. Never changes editor state.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.store.encode(self.history.top(), path)?;
        info!(path = %path.display(), "image saved");
        Ok(())
    }

    /// Replace the document with a blank canvas.
    pub fn new_canvas(&mut self) -> &PixelBuffer {
        self.reset_document(BLANK_CANVAS, self.config.blank_canvas());
        info!("new canvas");
        self.history.top()
    }

    fn reset_document(&mut self, description: &str, image: PixelBuffer) {
        self.history.reset(description, image);
        self.strokes.clear();
    }

    // --- Strokes ---

    /// Queue a segment for the next commit.
    pub fn add_stroke(&mut self, from: Point, to: Point, width: u32, color: Rgb) -> Result<()> {
        let segment = LineSegment {
            start: from,
            end: to,
            width,
            color,
        };
        if let Err(e) = self.strokes.add(segment) {
            warn!(error = %e, "stroke rejected");
            return Err(e);
        }
        Ok(())
    }

    pub fn pending_strokes(&self) -> &[LineSegment] {
        self.strokes.segments()
    }

    /// Draw all pending strokes onto the current image as one new snapshot.
    /// With nothing pending the history is left alone.
    pub fn commit_strokes(&mut self) -> &PixelBuffer {
        let strokes = self.strokes.drain();
        let committed = match compositor::commit(self.history.top(), &strokes) {
            Cow::Borrowed(_) => None,
            Cow::Owned(image) => Some(image),
        };
        match committed {
            Some(image) => {
                self.history.push(STROKES, image);
                info!(
                    segments = strokes.len(),
                    history_len = self.history.len(),
                    "strokes committed"
                );
            }
            None => debug!("commit with no pending strokes"),
        }
        self.history.top()
    }

    // --- History ---

    /// Step back one snapshot. At the base entry nothing changes.
    pub fn undo(&mut self) -> &PixelBuffer {
        let description = self.history.undo_description().map(str::to_owned);
        if self.history.undo() {
            info!(
                undone = description.as_deref().unwrap_or_default(),
                history_len = self.history.len(),
                "undo"
            );
        } else {
            debug!("undo at base snapshot");
        }
        self.history.top()
    }

    pub fn current_image(&self) -> &PixelBuffer {
        self.history.top()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn has_changes(&self) -> bool {
        self.history.has_changes()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn history(&self) -> &ImageHistory {
        &self.history
    }

    // --- Filters ---

    /// Run `filter` on the current image and push the result.
    pub fn apply_filter(&mut self, filter: Filter) -> Result<&PixelBuffer> {
        let image = match filters::apply(self.history.top(), &filter) {
            Ok(image) => image,
            Err(e) => {
                warn!(filter = filter.display_name(), error = %e, "filter rejected");
                return Err(e);
            }
        };
        self.history.push(filter.display_name(), image);
        info!(
            filter = filter.display_name(),
            history_len = self.history.len(),
            "filter applied"
        );
        Ok(self.history.top())
    }

    pub fn apply_grayscale(&mut self) -> Result<&PixelBuffer> {
        self.apply_filter(Filter::Grayscale)
    }

    pub fn apply_negative(&mut self) -> Result<&PixelBuffer> {
        self.apply_filter(Filter::Negative)
    }

    pub fn apply_global_equalize(&mut self) -> Result<&PixelBuffer> {
        self.apply_filter(Filter::GlobalEqualize)
    }

    pub fn apply_adaptive_equalize(&mut self, grid: TileGrid, clip_limit: f64) -> Result<&PixelBuffer> {
        self.apply_filter(Filter::AdaptiveEqualize { grid, clip_limit })
    }

    pub fn apply_contrast_brightness(&mut self, alpha: f64, beta: f64) -> Result<&PixelBuffer> {
        self.apply_filter(Filter::ContrastBrightness { alpha, beta })
    }
}
