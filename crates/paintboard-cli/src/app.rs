use paintboard_core::config::EditorConfig;
use paintboard_core::editor::Editor;
use paintboard_core::error::Result;
use paintboard_core::store::ImageStore;
use paintboard_media::codec::ImageFileStore;

use crate::message::Message;

/// Host-side state: the editing session plus the status line shown to the user.
pub struct App<S = ImageFileStore> {
    pub editor: Editor<S>,
    pub status_message: String,
}

impl App<ImageFileStore> {
    /// An app reading and writing real files.
    pub fn new(config: EditorConfig) -> Result<Self> {
        Self::with_store(config, ImageFileStore::new())
    }
}

impl<S: ImageStore> App<S> {
    pub fn with_store(config: EditorConfig, store: S) -> Result<Self> {
        Ok(Self {
            editor: Editor::new(config, store)?,
            status_message: String::new(),
        })
    }

    /// Apply one host command. The status line is updated either way; errors
    /// are also returned so a batch run can stop.
    pub fn update(&mut self, message: Message) -> Result<()> {
        let result = self.dispatch(message);
        if let Err(e) = &result {
            self.status_message = format!("Error: {e}");
        }
        result
    }

    fn dispatch(&mut self, message: Message) -> Result<()> {
        match message {
            Message::NewCanvas => {
                self.editor.new_canvas();
                self.status_message = "New canvas".into();
            }
            Message::Load(path) => {
                self.editor.load(&path)?;
                self.status_message = format!("Loaded: {}", path.display());
            }
            Message::Save(path) => {
                self.editor.save(&path)?;
                self.status_message = format!("Saved: {}", path.display());
            }
            Message::AddStroke {
                from,
                to,
                width,
                color,
            } => {
                self.editor.add_stroke(from, to, width, color)?;
                self.status_message =
                    format!("{} stroke(s) pending", self.editor.pending_strokes().len());
            }
            Message::CommitStrokes => {
                let pending = self.editor.pending_strokes().len();
                self.editor.commit_strokes();
                self.status_message = if pending == 0 {
                    "Nothing to draw".into()
                } else {
                    format!("Drew {pending} stroke(s)")
                };
            }
            Message::Undo => {
                if self.editor.can_undo() {
                    self.editor.undo();
                    self.status_message = "Undone".into();
                } else {
                    self.status_message = "Nothing to undo".into();
                }
            }
            Message::Grayscale => self.filtered(|e| e.apply_grayscale().map(|_| ()))?,
            Message::Negative => self.filtered(|e| e.apply_negative().map(|_| ()))?,
            Message::GlobalEqualize => self.filtered(|e| e.apply_global_equalize().map(|_| ()))?,
            Message::AdaptiveEqualize { grid, clip_limit } => {
                let grid = grid.unwrap_or(self.editor.config().clahe_grid);
                let clip_limit = clip_limit.unwrap_or(self.editor.config().clahe_clip_limit);
                self.filtered(|e| e.apply_adaptive_equalize(grid, clip_limit).map(|_| ()))?;
            }
            Message::ContrastBrightness { alpha, beta } => {
                self.filtered(|e| e.apply_contrast_brightness(alpha, beta).map(|_| ()))?
            }
        }
        Ok(())
    }

    fn filtered<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Editor<S>) -> Result<()>,
    {
        f(&mut self.editor)?;
        let label = self.editor.undo_description().unwrap_or_default();
        self.status_message = format!("Applied: {label}");
        Ok(())
    }
}
