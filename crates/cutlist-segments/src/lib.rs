//! Cutlist Segments - Segment data model and algebra
//!
//! Implements the timeline model of a cutting session:
//! - Segments with open-ended bounds and stable IDs
//! - The insertion-ordered segment list
//! - Overlap detection, merging, inversion and chapter conversion
//! - Playback loop policies
//! - The native `.llc` project file

pub mod algebra;
pub mod list;
pub mod playback;
pub mod project;
pub mod segment;

pub use algebra::{
    combine_overlapping_segments, combine_selected_segments, convert_segments_to_chapters,
    has_any_overlap_by, has_any_segment_overlap, has_any_segment_overlap_within, invert_segments,
    partition_into_overlapping_ranges, sort_segments, split_segment, Chapter, InverseSegment,
};
pub use list::SegmentList;
pub use playback::{play_only_current_segment, PlaybackAction, PlaybackMode, PlayingSegment};
pub use project::{ProjectFile, ProjectSegment, CURRENT_VERSION, PROJECT_EXTENSION};
pub use segment::{
    coerce_tags, get_seg_apparent_end, get_seg_apparent_start, is_duration_valid, Segment,
    SegmentId, Tags,
};
