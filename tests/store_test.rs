use std::path::PathBuf;

use trackstore_rs::store::{Detection, Rect, Track, TrackStore};

fn det(frame: usize, confidence: f32) -> Detection {
    Detection::new(frame, 0, Rect::new(10.0, 20.0, 30.0, 40.0), confidence)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("trackstore-{}-{name}", std::process::id()))
}

#[test]
fn test_annotation_session() {
    // Video of 5 frames, one object annotated at frame 2.
    let mut store = TrackStore::new(5);
    let id = store.create_track(&det(2, 0.9));
    assert_eq!(id, 1);

    // The same object reappears at frame 4.
    assert!(store.add_detection(id, det(4, 0.8)));

    let at2 = store.detections_at(2);
    assert_eq!(at2.len(), 1);
    assert_eq!(at2[0].id, 1);

    // Splitting at frame 4 peels the tail off into a new identity.
    assert!(store.split_track(id, 4));
    assert_eq!(store.num_tracks(), 2);

    let head = store.get_track(1).unwrap();
    assert_eq!(head.len(), 1);
    assert_eq!(head.detections()[0].frame, 2);

    let tail = store.get_track(2).unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail.detections()[0].frame, 4);

    // Frame 4 now reports the new identity, not the old one.
    let at4 = store.detections_at(4);
    assert_eq!(at4.len(), 1);
    assert_eq!(at4[0].id, 2);
}

#[test]
fn test_split_partitions_every_detection() {
    let mut store = TrackStore::new(10);
    let id = store.create_track(&det(1, 0.9));
    for frame in [3, 5, 7, 9] {
        assert!(store.add_detection(id, det(frame, 0.9)));
    }

    assert!(store.split_track(id, 5));

    let head = store.get_track(id).unwrap();
    let tail = store.get_track(2).unwrap();

    // Split point is inclusive: frame 5 moved to the tail.
    let head_frames: Vec<usize> = head.iter().map(|d| d.frame).collect();
    let tail_frames: Vec<usize> = tail.iter().map(|d| d.frame).collect();
    assert_eq!(head_frames, vec![1, 3]);
    assert_eq!(tail_frames, vec![5, 7, 9]);

    // Nothing dropped, nothing duplicated, and the index agrees.
    assert_eq!(head.len() + tail.len(), 5);
    for frame in [1, 3] {
        assert_eq!(store.detections_at(frame)[0].id, id);
    }
    for frame in [5, 7, 9] {
        assert_eq!(store.detections_at(frame)[0].id, 2);
    }
}

#[test]
fn test_split_with_no_tail_is_a_noop() {
    let mut store = TrackStore::new(10);
    let id = store.create_track(&det(1, 0.9));

    assert!(store.split_track(id, 5));
    assert_eq!(store.num_tracks(), 1);
    assert_eq!(store.next_track_id(), 2); // no tail track was registered

    assert!(!store.split_track(99, 5));
}

#[test]
fn test_unite_merges_under_smaller_id() {
    let mut store = TrackStore::new(10);
    let a = store.create_track(&det(1, 0.9));
    let b = store.create_track(&det(2, 0.8));
    assert!(store.add_detection(b, det(3, 0.7)));

    // Passing the larger id first must not change the survivor.
    assert!(store.unite_tracks(b, a));

    assert!(store.has_track(a));
    assert!(!store.has_track(b));
    assert_eq!(store.num_tracks(), 1);

    let merged = store.get_track(a).unwrap();
    assert_eq!(merged.len(), 3);
    assert!(merged.iter().all(|d| d.id == a));

    // First argument's detections come first: b's frames 2, 3, then a's 1.
    let frames: Vec<usize> = merged.iter().map(|d| d.frame).collect();
    assert_eq!(frames, vec![2, 3, 1]);

    for frame in [1, 2, 3] {
        assert_eq!(store.detections_at(frame)[0].id, a);
    }

    assert!(!store.unite_tracks(a, 99));
    assert!(!store.unite_tracks(99, a));
}

#[test]
fn test_delete_track_clears_the_index() {
    let mut store = TrackStore::new(10);
    let a = store.create_track(&det(4, 0.9));
    let b = store.create_track(&det(4, 0.8));

    assert!(store.delete_track(a));
    assert!(!store.has_track(a));
    assert!(!store.delete_track(a));

    // The shared frame bucket keeps the other track's detection.
    let at4 = store.detections_at(4);
    assert_eq!(at4.len(), 1);
    assert_eq!(at4[0].id, b);
    for frame in 0..store.video_len() {
        assert!(store.detections_at(frame).iter().all(|d| d.id != a));
    }
}

#[test]
fn test_empty_store_bookkeeping() {
    let store = TrackStore::new(120);
    assert!(store.is_empty());
    assert_eq!(store.num_tracks(), 0);
    assert_eq!(store.video_len(), 120);
    assert!(!store.has_track(1));
    assert!(store.get_track(1).is_none());
}

#[test]
fn test_save_load_round_trip() {
    let mut store = TrackStore::new(6);
    let a = store.create_track(&Detection::new(0, 0, Rect::new(1.5, 2.5, 10.0, 20.0), 0.9));
    store.add_detection(a, Detection::new(3, 0, Rect::new(4.0, 5.0, 11.0, 21.0), 0.8));
    let b = store.create_track(&Detection::new(3, 0, Rect::new(7.0, 8.0, 12.0, 22.0), 0.7));

    let path = temp_path("roundtrip.txt");
    store.save(&path).unwrap();

    let reloaded = TrackStore::from_file(&path).unwrap();
    assert_eq!(reloaded.video_len(), 6);
    assert_eq!(reloaded.num_tracks(), 2);
    assert!(reloaded.has_track(a));
    assert!(reloaded.has_track(b));

    // Every frame reports the same detections in the same order.
    for frame in 0..store.video_len() {
        assert_eq!(reloaded.detections_at(frame), store.detections_at(frame));
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_discards_other_classes() {
    let path = temp_path("classes.txt");
    std::fs::write(
        &path,
        "8\n\
         1,1,0,0,5,5,1.0,1\n\
         2,1,0,0,5,5,1.0,3\n\
         3,1,1,1,5,5,0.9,1\n",
    )
    .unwrap();

    let store = TrackStore::from_file(&path).unwrap();
    assert_eq!(store.num_tracks(), 1);
    assert_eq!(store.get_track(1).unwrap().len(), 2);
    assert!(store.detections_at(1).is_empty()); // the class-3 row at disk frame 2

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_stops_at_first_malformed_row() {
    let path = temp_path("truncated.txt");
    std::fs::write(
        &path,
        "8\n\
         1,1,0,0,5,5,1.0,1\n\
         2,1,0,0,5,5,1.0,1\n\
         not,a,row\n\
         4,2,0,0,5,5,1.0,1\n",
    )
    .unwrap();

    let store = TrackStore::from_file(&path).unwrap();

    // Rows before the malformed line survive; the rest of the file is
    // never consumed, so track 2 does not exist.
    assert_eq!(store.num_tracks(), 1);
    assert_eq!(store.get_track(1).unwrap().len(), 2);
    assert!(!store.has_track(2));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_missing_file_is_reported() {
    let err = TrackStore::from_file("/nonexistent/tracks.txt");
    assert!(err.is_err());
}

#[test]
fn test_load_builds_tracks_in_file_order() {
    let path = temp_path("order.txt");
    // Two ids interleaved across frames, as a MOT detection log would be.
    std::fs::write(
        &path,
        "4\n\
         1,5,0,0,5,5,1.0,1\n\
         1,9,10,10,5,5,1.0,1\n\
         2,5,1,0,5,5,1.0,1\n\
         2,9,11,10,5,5,1.0,1\n",
    )
    .unwrap();

    let store = TrackStore::from_file(&path).unwrap();
    assert_eq!(store.num_tracks(), 2);
    assert_eq!(store.get_track(5).unwrap().len(), 2);
    assert_eq!(store.get_track(9).unwrap().len(), 2);

    // Within a frame, rows keep file order.
    let at0 = store.detections_at(0);
    assert_eq!(at0[0].id, 5);
    assert_eq!(at0[1].id, 9);

    // Fresh ids continue past the loaded maximum.
    assert_eq!(store.next_track_id(), 10);

    std::fs::remove_file(&path).ok();
}
