//! Loading a track store from a persisted tracks file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::format::row::{PEDESTRIAN_CLASS, Row};
use crate::store::{Detection, StoreError, Track, TrackStore};

/// Read the tracks file at `path` into `store`, replacing its contents.
///
/// The first line carries the video length; every following line is one
/// [`Row`]. Rows of other object classes are discarded. The first row that
/// fails to parse ends the scan, keeping everything read before it.
///
/// # Panics
///
/// Panics when the header is malformed or the file yields no usable row;
/// such a file was not produced by this format's writer and the store
/// cannot start from it.
pub(crate) fn read_into(store: &mut TrackStore, path: &Path) -> Result<(), StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut lines = BufReader::new(file).lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => panic!("tracks file {} is empty", path.display()),
    };
    let video_len: usize = header
        .trim()
        .parse()
        .unwrap_or_else(|_| panic!("malformed video length {:?} in {}", header, path.display()));
    store.reset(video_len);

    let mut kept = 0usize;
    let mut line_no = 1usize;
    for line in lines {
        line_no += 1;
        let Ok(line) = line else {
            warn!("read failed at line {line_no} of {}, keeping {kept} rows", path.display());
            break;
        };
        let row: Row = match line.parse() {
            Ok(row) => row,
            Err(err) => {
                warn!("stopping at line {line_no} of {}: {err}", path.display());
                break;
            }
        };

        if row.class != PEDESTRIAN_CLASS {
            debug!("line {line_no}: discarding class {} row", row.class);
            continue;
        }

        // Frames are 1-based on disk.
        let det = Detection::new(row.frame - 1, row.id, row.bbox, row.confidence);
        if !store.has_track(row.id) {
            store.add_track(Track::new(row.id));
        }
        assert!(store.add_detection(row.id, det));
        kept += 1;
    }

    assert!(kept > 0, "no usable rows in {}", path.display());
    info!(
        "loaded {kept} detections across {} tracks from {}",
        store.num_tracks(),
        path.display()
    );
    Ok(())
}
