//! Integration tests for importing, transforming and exporting cut lists.
//!
//! Exercises cross-crate interactions between cutlist-core,
//! cutlist-segments and cutlist-edl.

use std::path::Path;

use cutlist_core::{CutError, English, Localizer, Message};
use cutlist_edl::{
    format_edl, parse_edl, EdlFormat, EdlInput, ExportParams, ExportRequest, ImportParams,
    Interchange, ReadRequest,
};
use cutlist_segments::{
    has_any_segment_overlap, sort_segments, ProjectFile, Segment, SegmentList,
};

// ── Helpers ────────────────────────────────────────────────────

fn import(format: EdlFormat, text: &str) -> Vec<Segment> {
    parse_edl(format, &EdlInput::Text(text.to_string()), &ImportParams::default()).unwrap()
}

fn export(format: EdlFormat, segments: &[Segment]) -> String {
    format_edl(format, segments, &ExportParams::default()).unwrap()
}

fn bounds(segments: &[Segment]) -> Vec<(Option<f64>, Option<f64>)> {
    segments.iter().map(|s| (s.start, s.end)).collect()
}

// ── Cross-format conversion ────────────────────────────────────

#[test]
fn youtube_chapters_to_srt() {
    let segments = import(EdlFormat::Youtube, "0:00 Intro\n0:30 Main\n2:00 Outro\n");
    let list = SegmentList::from_segments(segments);
    let clean = list.clean_segments(Some(150.0));

    let srt = export(EdlFormat::Srt, &clean);
    assert!(srt.starts_with("1\r\n00:00:00,000 --> 00:00:30,000\r\nIntro\r\n"));
    assert!(srt.ends_with("3\r\n00:02:00,000 --> 00:02:30,000\r\nOutro\r\n"));
}

#[test]
fn mplayer_to_csv() {
    let segments = import(EdlFormat::Mplayer, "10 20 0\n30 40 0\n");
    let csv = export(EdlFormat::Csv, &segments);
    assert_eq!(csv, "0,10,Cut\n20,30,Cut\n40,,Cut\n");
}

#[test]
fn human_csv_survives_round_trip() {
    let original = vec![
        Segment::from_range(1.25, 61.5).with_name("a, b"),
        Segment::new(Some(3600.0), None).with_name("tail"),
    ];
    let text = export(EdlFormat::CsvHuman, &original);
    let back = import(EdlFormat::CsvHuman, &text);
    assert_eq!(bounds(&back), bounds(&original));
    assert_eq!(back[0].name, "a, b");
}

#[test]
fn frames_csv_requires_fps_and_round_trips() {
    let text = "0,48,x\n96,120,y\n";
    let input = EdlInput::Text(text.to_string());

    let err = parse_edl(EdlFormat::CsvFrames, &input, &ImportParams::default()).unwrap_err();
    assert_eq!(
        err.localized(&English),
        "The frame rate is required for the csv-frames format"
    );

    let segments = parse_edl(EdlFormat::CsvFrames, &input, &ImportParams { fps: Some(24.0) })
        .unwrap();
    assert_eq!(bounds(&segments)[1], (Some(4.0), Some(5.0)));
    let params = ExportParams {
        fps: Some(24.0),
        ..ExportParams::default()
    };
    assert_eq!(format_edl(EdlFormat::CsvFrames, &segments, &params).unwrap(), text);
}

#[test]
fn youtube_export_reimports() {
    let segments = vec![
        Segment::from_range(0.0, 90.0).with_name("One"),
        Segment::from_range(90.0, 4000.0).with_name("Two"),
    ];
    let text = export(EdlFormat::Youtube, &segments);
    let back = import(EdlFormat::Youtube, &text);
    assert_eq!(back[0].end, Some(90.0));
    assert_eq!(back[1].start, Some(90.0));
    assert_eq!(back[1].name, "Two");
}

// ── Algebra over imported lists ────────────────────────────────

#[test]
fn imported_overlaps_are_detected_and_merged() {
    let segments = import(EdlFormat::Csv, "0,10,a\n5,15,b\n20,30,c\n");
    assert!(has_any_segment_overlap(&sort_segments(&segments)));

    let mut list = SegmentList::from_segments(segments);
    assert!(list.inverse(true, true, Some(40.0)).is_none());

    list.combine_overlapping(Some(40.0));
    let gaps = list.inverse(true, true, Some(40.0)).unwrap();
    let gap_bounds: Vec<_> = gaps.iter().map(|g| (g.start, g.end)).collect();
    assert_eq!(gap_bounds, vec![(15.0, Some(20.0)), (30.0, Some(40.0))]);
}

#[test]
fn chapters_from_cue_sheet() {
    let cue = "FILE \"a.wav\" WAVE\n  TRACK 01 AUDIO\n    TITLE \"x\"\n    INDEX 01 00:10:00\n  \
               TRACK 02 AUDIO\n    TITLE \"y\"\n    INDEX 01 00:20:00\n";
    let segments = import(EdlFormat::Cue, cue);
    let list = SegmentList::from_segments(segments);

    let chapters = list.chapters().unwrap();
    let summary: Vec<_> = chapters
        .iter()
        .map(|c| (c.start, c.end, c.name.as_str()))
        .collect();
    // the open last track ends the chapters without a trailing gap
    assert_eq!(
        summary,
        vec![
            (0.0, Some(10.0), ""),
            (10.0, Some(20.0), "x"),
            (20.0, None, "y"),
        ]
    );
}

#[test]
fn chapters_reject_overlapping_imports() {
    let list = SegmentList::from_segments(import(EdlFormat::Csv, "0,10,a
5,15,b
"));
    let err = list.chapters().unwrap_err();
    assert!(matches!(err, CutError::Domain(Message::SegmentsOverlap)));
    assert_eq!(err.localized(&English), "Segments cannot overlap");
}

// ── Files and projects ─────────────────────────────────────────

#[test]
fn project_file_through_interchange() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.llc");
    let interchange = Interchange::headless();

    let list = SegmentList::from_segments([
        Segment::from_range(1.0, 2.0).with_name("keep").with_tag("rating", 5),
        Segment::new(Some(3.0), None),
    ]);
    interchange
        .export_edl_file(&ExportRequest {
            format: EdlFormat::Llc,
            segments: list.as_slice(),
            path: &path,
            fps: None,
            media_file_name: Some("movie.mp4"),
        })
        .unwrap();

    let project = ProjectFile::load_from_file(&path).unwrap();
    assert_eq!(project.media_file_name.as_deref(), Some("movie.mp4"));

    let back = interchange
        .read_edl_file(&ReadRequest {
            format: EdlFormat::Llc,
            path: &path,
            fps: None,
        })
        .unwrap();
    assert_eq!(bounds(&back), bounds(list.as_slice()));
    assert_eq!(back[0].tag("rating"), Some("5"));
}

#[test]
fn localized_errors_use_catalog() {
    let mut catalog = cutlist_core::Catalog::new();
    catalog.insert("no-rows-found", "Keine Zeilen gefunden");

    let err = parse_edl(
        EdlFormat::Csv,
        &EdlInput::Text(String::new()),
        &ImportParams::default(),
    )
    .unwrap_err();
    assert_eq!(err.localized(&catalog), "Keine Zeilen gefunden");
    assert_eq!(English.translate(err.message().unwrap()), "No rows found");
}

#[test]
fn missing_file_reports_io_error() {
    let err = Interchange::headless()
        .read_edl_file(&ReadRequest {
            format: EdlFormat::Csv,
            path: Path::new("/no/such/cuts.csv"),
            fps: None,
        })
        .unwrap_err();
    assert!(matches!(err, CutError::Io(_)));
}
