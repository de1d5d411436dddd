use crate::pixel::PixelBuffer;

/// One entry in the undo history: an image and the action that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub description: String,
    pub image: PixelBuffer,
}

impl Snapshot {
    pub fn new(description: impl Into<String>, image: PixelBuffer) -> Self {
        Self {
            description: description.into(),
            image,
        }
    }
}

/// Linear undo history of image snapshots, oldest first. Never empty.
#[derive(Debug, Clone)]
pub struct ImageHistory {
    snapshots: Vec<Snapshot>,
}

impl ImageHistory {
    /// Start a history whose base entry is `base`.
    pub fn new(description: impl Into<String>, base: PixelBuffer) -> Self {
        Self {
            snapshots: vec![Snapshot::new(description, base)],
        }
    }

    pub fn push(&mut self, description: impl Into<String>, image: PixelBuffer) {
        self.snapshots.push(Snapshot::new(description, image));
    }

    /// The current image.
    pub fn top(&self) -> &PixelBuffer {
        &self.top_snapshot().image
    }

    pub fn top_snapshot(&self) -> &Snapshot {
        // The constructor seeds one entry and undo never pops the last one.
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Drop the newest snapshot. At the base entry this does nothing and returns false.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.snapshots.pop();
        true
    }

    /// Replace the whole history with a single base entry.
    pub fn reset(&mut self, description: impl Into<String>, base: PixelBuffer) {
        self.snapshots.clear();
        self.snapshots.push(Snapshot::new(description, base));
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn can_undo(&self) -> bool {
        self.snapshots.len() > 1
    }

    /// Same predicate as [`can_undo`](Self::can_undo): any entry above the base is a change.
    pub fn has_changes(&self) -> bool {
        self.can_undo()
    }

    /// Description of the snapshot the next undo would discard.
    pub fn undo_description(&self) -> Option<&str> {
        if self.can_undo() {
            Some(&self.top_snapshot().description)
        } else {
            None
        }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }
}
