//! A single observation of a tracked object.

use serde::{Deserialize, Serialize};

use crate::store::rect::Rect;

/// One bounding-box observation: where an object was seen, in which frame,
/// and how confident the detector (or annotator) was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Zero-based frame index, always inside the video.
    pub frame: usize,
    /// Identifier of the owning track.
    pub id: u64,
    /// Bounding box in TLWH form.
    pub bbox: Rect,
    /// Detection confidence score.
    pub confidence: f32,
}

impl Detection {
    pub fn new(frame: usize, id: u64, bbox: Rect, confidence: f32) -> Self {
        Self {
            frame,
            id,
            bbox,
            confidence,
        }
    }
}

/// Builder for detections drawn in whatever box format the frontend uses.
///
/// The track id is left at 0; the store stamps the owning id when the
/// detection is inserted.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    frame: usize,
    bbox: Rect,
    confidence: f32,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zero-based frame index.
    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }

    /// Set the box in TLWH form (top-left x, top-left y, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(x, y, w, h);
        self
    }

    /// Set the box from its corners (x1, y1, x2, y2), as produced by a drag
    /// gesture.
    pub fn corners(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_corners(x1, y1, x2, y2);
        self
    }

    /// Set the box from its center and dimensions.
    pub fn centered(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(cx - w / 2.0, cy - h / 2.0, w, h);
        self
    }

    /// Set the confidence score.
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::new(self.frame, 0, self.bbox, self.confidence)
    }
}
