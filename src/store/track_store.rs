//! The track collection and its per-frame detection index.

use std::collections::HashMap;
use std::path::Path;

use crate::store::detection::Detection;
use crate::store::error::StoreError;
use crate::store::track::Track;

/// Stable handle to a stored detection.
///
/// Handles are never reused. A handle is live exactly as long as its
/// detection is owned by some track, and a live handle appears once in the
/// owning track's entry and once in the frame bucket for its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DetKey(u64);

/// A registered track: its id and the handles of its detections, in
/// insertion order.
#[derive(Debug, Clone)]
struct TrackEntry {
    id: u64,
    dets: Vec<DetKey>,
}

/// In-memory store of tracks over a fixed-length video.
///
/// Owns every track and, through the detection arena, every detection. The
/// frame index (`timeline`) holds one bucket per frame with the handles of
/// the detections visible there, so "what is at frame F" never scans the
/// track collection. Every mutating operation updates the track entries and
/// the frame index together; neither view is ever left referencing a
/// detection the other has dropped.
#[derive(Debug, Clone)]
pub struct TrackStore {
    video_len: usize,
    next_key: u64,
    detections: HashMap<DetKey, Detection>,
    tracks: Vec<TrackEntry>,
    timeline: Vec<Vec<DetKey>>,
}

impl TrackStore {
    /// Create an empty store for a video of `video_len` frames.
    pub fn new(video_len: usize) -> Self {
        Self {
            video_len,
            next_key: 0,
            detections: HashMap::new(),
            tracks: Vec::new(),
            timeline: vec![Vec::new(); video_len],
        }
    }

    /// Create a store by loading a persisted tracks file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut store = Self::new(0);
        store.load(path)?;
        Ok(store)
    }

    /// Next unused track identifier: one past the largest live id, 1 for an
    /// empty store. Derived from live tracks only, so the id of a deleted
    /// track can come back once nothing larger is registered.
    pub fn next_track_id(&self) -> u64 {
        self.tracks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
    }

    pub fn has_track(&self, id: u64) -> bool {
        self.tracks.iter().any(|t| t.id == id)
    }

    /// Snapshot of the track with `id`. Later edits to the store do not
    /// affect the returned copy.
    pub fn get_track(&self, id: u64) -> Option<Track> {
        let entry = self.tracks.iter().find(|t| t.id == id)?;
        let mut track = Track::new(id);
        for key in &entry.dets {
            track.push(self.detections[key]);
        }
        Some(track)
    }

    /// Register `track` under its own id and index all its detections.
    ///
    /// # Panics
    ///
    /// Panics if a track with the same id is already registered, or if any
    /// detection's frame lies outside the video.
    pub fn add_track(&mut self, track: Track) {
        assert!(
            !self.has_track(track.id()),
            "track {} is already registered",
            track.id()
        );
        let mut entry = TrackEntry {
            id: track.id(),
            dets: Vec::with_capacity(track.len()),
        };
        for det in track.into_detections() {
            assert!(
                det.frame < self.video_len,
                "frame {} outside video of {} frames",
                det.frame,
                self.video_len
            );
            let key = self.store_detection(det);
            entry.dets.push(key);
            self.timeline[det.frame].push(key);
        }
        self.tracks.push(entry);
    }

    /// Start a new track seeded with a copy of `det`, stamped with a fresh
    /// id. Returns the new id.
    pub fn create_track(&mut self, det: &Detection) -> u64 {
        let id = self.next_track_id();
        self.add_track(Track::with_detection(id, *det));
        id
    }

    /// Append `det` to the track with `track_id` and index it at its frame.
    /// Returns false when no such track exists.
    ///
    /// # Panics
    ///
    /// Panics if `det.frame` lies outside the video.
    pub fn add_detection(&mut self, track_id: u64, mut det: Detection) -> bool {
        assert!(
            det.frame < self.video_len,
            "frame {} outside video of {} frames",
            det.frame,
            self.video_len
        );
        let Some(pos) = self.tracks.iter().position(|t| t.id == track_id) else {
            return false;
        };
        det.id = track_id;
        let frame = det.frame;
        let key = self.store_detection(det);
        self.tracks[pos].dets.push(key);
        self.timeline[frame].push(key);
        true
    }

    /// Remove the detection owned by `track_id` at `frame` from the track
    /// and the frame index in one edit.
    ///
    /// Returns false when the track is unknown or the frame out of range;
    /// true otherwise, including when the track has nothing at that frame.
    pub fn delete_detection(&mut self, track_id: u64, frame: usize) -> bool {
        if frame >= self.video_len {
            return false;
        }
        let Some(track_pos) = self.tracks.iter().position(|t| t.id == track_id) else {
            return false;
        };
        let Some(bucket_pos) = self.timeline[frame]
            .iter()
            .position(|key| self.detections[key].id == track_id)
        else {
            return true;
        };
        let key = self.timeline[frame].remove(bucket_pos);
        self.detections.remove(&key);
        self.tracks[track_pos].dets.retain(|k| *k != key);
        true
    }

    /// Remove the track with `id` and every frame-index reference to its
    /// detections, leaving other tracks' entries in shared buckets
    /// untouched. Returns false when no such track exists.
    pub fn delete_track(&mut self, id: u64) -> bool {
        let Some(pos) = self.tracks.iter().position(|t| t.id == id) else {
            return false;
        };
        let entry = self.tracks.remove(pos);
        for key in entry.dets {
            let det = self
                .detections
                .remove(&key)
                .expect("track entry holds a handle with no stored detection");
            let bucket = &mut self.timeline[det.frame];
            let i = bucket
                .iter()
                .position(|k| *k == key)
                .expect("stored detection missing from its frame bucket");
            bucket.remove(i);
        }
        true
    }

    /// Move every detection at or after `frame` (split point inclusive) to
    /// a brand-new track under a freshly allocated id. Detections before
    /// the split point stay under `track_id`.
    ///
    /// Returns false when `track_id` is unknown; true otherwise, including
    /// when nothing is at or after the split point and the track is left
    /// as it was.
    pub fn split_track(&mut self, track_id: u64, frame: usize) -> bool {
        let Some(entry) = self.tracks.iter().find(|t| t.id == track_id) else {
            return false;
        };

        let new_id = self.next_track_id();
        let mut tail = Track::new(new_id);
        let mut moved_frames = Vec::new();
        for key in &entry.dets {
            let det = self.detections[key];
            if det.frame >= frame {
                tail.push(det);
                moved_frames.push(det.frame);
            }
        }

        if moved_frames.is_empty() {
            return true;
        }

        for f in moved_frames {
            self.delete_detection(track_id, f);
        }
        self.add_track(tail);

        true
    }

    /// Merge two tracks into one under the smaller of the two ids, with
    /// `id_a`'s detections preceding `id_b`'s, each re-stamped with the
    /// surviving id. The larger id disappears from the store.
    ///
    /// Detections sharing a frame are all kept; the merged track and its
    /// frame buckets then hold two entries under one id for that frame.
    ///
    /// Returns false when either id is unknown.
    pub fn unite_tracks(&mut self, id_a: u64, id_b: u64) -> bool {
        let Some(track_a) = self.get_track(id_a) else {
            return false;
        };
        let Some(track_b) = self.get_track(id_b) else {
            return false;
        };

        let new_id = id_a.min(id_b);
        let delete_id = id_a.max(id_b);

        let mut united = Track::new(new_id);
        for det in track_a.iter() {
            united.push(*det);
        }
        for det in track_b.iter() {
            united.push(*det);
        }

        // The surviving id is being rebuilt, so both originals go.
        self.delete_track(new_id);
        self.delete_track(delete_id);
        self.add_track(united);

        true
    }

    /// Detections indexed at `frame`, copied out in index insertion order.
    /// Empty for a frame outside the video.
    pub fn detections_at(&self, frame: usize) -> Vec<Detection> {
        match self.timeline.get(frame) {
            Some(bucket) => bucket.iter().map(|key| self.detections[key]).collect(),
            None => Vec::new(),
        }
    }

    pub fn video_len(&self) -> usize {
        self.video_len
    }

    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Replace the store contents with the tracks file at `path`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        crate::format::read_into(self, path.as_ref())
    }

    /// Write the store to `path` in the row format `load` reads.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        crate::format::write_to(self, path.as_ref())
    }

    fn store_detection(&mut self, det: Detection) -> DetKey {
        let key = DetKey(self.next_key);
        self.next_key += 1;
        self.detections.insert(key, det);
        key
    }

    pub(crate) fn reset(&mut self, video_len: usize) {
        self.video_len = video_len;
        self.detections.clear();
        self.tracks.clear();
        self.timeline.clear();
        self.timeline.resize_with(video_len, Vec::new);
    }
}
