use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::pixel::Rgb;

/// Integer canvas coordinate. May lie outside the canvas; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One pointer-drag segment captured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    pub width: u32,
    pub color: Rgb,
}

impl LineSegment {
    /// Create a segment. Fails with `InvalidParameter` when `width` is zero.
    pub fn new(start: Point, end: Point, width: u32, color: Rgb) -> Result<Self> {
        let segment = Self {
            start,
            end,
            width,
            color,
        };
        segment.validate()?;
        Ok(segment)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(CoreError::invalid("stroke width must be at least 1"));
        }
        Ok(())
    }
}

/// Pending segments waiting to be committed, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StrokeBuffer {
    segments: Vec<LineSegment>,
}

impl StrokeBuffer {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append a segment after validating it. A rejected segment leaves the buffer untouched.
    pub fn add(&mut self, segment: LineSegment) -> Result<()> {
        segment.validate()?;
        self.segments.push(segment);
        Ok(())
    }

    /// Take every pending segment, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<LineSegment> {
        std::mem::take(&mut self.segments)
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
