mod detection;
mod error;
mod rect;
mod track;
mod track_store;

pub use detection::{Detection, DetectionBuilder};
pub use error::StoreError;
pub use rect::{Rect, iou_batch};
pub use track::Track;
pub use track_store::TrackStore;
