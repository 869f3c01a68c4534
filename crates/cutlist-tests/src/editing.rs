//! Integration tests for interactive segment editing.
//!
//! Drives a segment list through the edits a cutting session makes and
//! checks the derived views and playback decisions stay consistent.

use std::collections::HashSet;

use cutlist_core::{format_duration, SEGMENT_COLOR_COUNT};
use cutlist_segments::{
    is_duration_valid, play_only_current_segment, PlaybackMode, PlayingSegment, ProjectFile,
    Segment, SegmentList,
};

const DURATION: f64 = 120.0;

fn playing(segment: &Segment) -> PlayingSegment {
    PlayingSegment {
        start: segment.apparent_start(),
        end: segment.apparent_end(Some(DURATION)),
    }
}

// ── Editing session ────────────────────────────────────────────

#[test]
fn split_then_combine_restores_range() {
    let mut list = SegmentList::with_initial_segment();
    let whole = list.as_slice()[0].id.clone();

    let second = list.split(&whole, 40.0, Some(DURATION)).unwrap();
    let third = list.split(&second, 80.0, Some(DURATION)).unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list.valid_count(Some(DURATION)), 3);

    let gaps = list.inverse(true, true, Some(DURATION)).unwrap();
    assert!(gaps.is_empty());

    let selected: HashSet<_> = [whole.clone(), third].into_iter().collect();
    list.combine_selected(&selected, Some(DURATION));
    assert_eq!(list.len(), 2);
    let merged = list.get(&whole).unwrap();
    assert_eq!(merged.start, None);
    assert_eq!(merged.end, None);
}

#[test]
fn duplicate_and_recolor_cycle() {
    let mut list = SegmentList::new();
    let first = list.add(Segment::from_range(0.0, 1.0));
    for _ in 0..SEGMENT_COLOR_COUNT {
        list.duplicate(&first).unwrap();
    }
    let colors: HashSet<_> = list.iter().filter_map(|s| s.color_index).collect();
    assert_eq!(colors.len(), SEGMENT_COLOR_COUNT);
    let ids: HashSet<_> = list.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids.len(), list.len());
}

#[test]
fn clean_export_view_resolves_open_bounds() {
    assert!(is_duration_valid(Some(DURATION)));
    let list = SegmentList::from_segments([
        Segment::new(None, Some(10.0)),
        Segment::new(Some(100.0), None),
        Segment::from_range(50.0, 40.0),
    ]);
    let clean = list.clean_segments(Some(DURATION));
    let rendered: Vec<_> = clean
        .iter()
        .map(|s| {
            format!(
                "{}-{}",
                format_duration(s.start.unwrap()),
                format_duration(s.end.unwrap())
            )
        })
        .collect();
    assert_eq!(
        rendered,
        vec![
            "00:00:00.000-00:00:10.000",
            "00:01:40.000-00:02:00.000"
        ]
    );
}

#[test]
fn project_save_preserves_edit_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.llc");

    let mut list = SegmentList::new();
    list.add(Segment::from_range(50.0, 60.0).with_name("late"));
    list.insert(0, Segment::from_range(70.0, 80.0).with_name("first"));
    ProjectFile::new(None, list.as_slice())
        .save_to_file(&path)
        .unwrap();

    let project = ProjectFile::load_from_file(&path).unwrap();
    let loaded = SegmentList::from_segments(project.to_segments());
    let names: Vec<_> = loaded.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["first", "late"]);
    let sorted: Vec<_> = loaded.sorted().into_iter().map(|s| s.name).collect();
    assert_eq!(sorted, vec!["late", "first"]);
}

// ── Playback over list segments ────────────────────────────────

#[test]
fn loop_selected_walks_through_segments() {
    let list = SegmentList::from_segments([
        Segment::from_range(10.0, 20.0),
        Segment::from_range(30.0, 40.0),
    ]);
    let mode = PlaybackMode::from_name("loop-selected-segments");

    let mut current = 0;
    for tick in [15.0, 20.0] {
        let action = play_only_current_segment(mode, tick, playing(&list.as_slice()[current]));
        if action.next_segment {
            current = (current + 1) % list.len();
        }
    }
    assert_eq!(current, 1);
}

#[test]
fn play_once_on_open_segment_stops_at_media_end() {
    let list = SegmentList::from_segments([Segment::new(Some(100.0), None)]);
    let action = play_only_current_segment(
        PlaybackMode::PlaySegmentOnce,
        DURATION,
        playing(&list.as_slice()[0]),
    );
    assert!(action.exit);
    assert_eq!(action.seek_to, Some(DURATION));
}
