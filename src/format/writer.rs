//! Writing a track store to a tracks file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::format::row::Row;
use crate::store::{StoreError, TrackStore};

/// Write `store` to `path`: the video length line, then one row per indexed
/// detection, frames in order, rows within a frame in index order.
pub(crate) fn write_to(store: &TrackStore, path: &Path) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{}", store.video_len())?;

    let mut rows = 0usize;
    for frame in 0..store.video_len() {
        for det in store.detections_at(frame) {
            writeln!(out, "{}", Row::from_detection(&det))?;
            rows += 1;
        }
    }
    out.flush()?;

    info!(
        "wrote {rows} rows for {} tracks to {}",
        store.num_tracks(),
        path.display()
    );
    Ok(())
}
