//! In-memory store for object-tracking annotations over a fixed-length
//! video.
//!
//! A [`TrackStore`] owns a set of [`Track`]s (one per tracked object, each
//! an insertion-ordered sequence of bounding-box [`Detection`]s) and keeps a
//! per-frame index over all detections, so "what is visible at frame F" is
//! answered without scanning tracks. Structural edits (split, unite, delete)
//! keep both views consistent, and the whole state round-trips through a
//! MOT-style text file.
//!
//! ```
//! use trackstore_rs::{DetectionBuilder, TrackStore};
//!
//! let mut store = TrackStore::new(300);
//! let det = DetectionBuilder::new()
//!     .frame(12)
//!     .corners(40.0, 60.0, 90.0, 180.0)
//!     .confidence(1.0)
//!     .build();
//! let id = store.create_track(&det);
//! assert_eq!(store.detections_at(12).len(), 1);
//! assert!(store.has_track(id));
//! ```

pub mod format;
pub mod store;

pub use format::{PEDESTRIAN_CLASS, ParseRowError, Row};
pub use store::{Detection, DetectionBuilder, Rect, StoreError, Track, TrackStore, iou_batch};
