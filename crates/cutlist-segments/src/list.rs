//! The user-ordered segment collection.

use cutlist_core::SEGMENT_COLOR_COUNT;
use std::collections::HashSet;

use crate::algebra::{
    combine_overlapping_segments, combine_selected_segments, convert_segments_to_chapters,
    invert_segments, sort_segments, split_segment, Chapter, InverseSegment,
};
use crate::segment::{Segment, SegmentId};

/// Segments in insertion order, which is also display and export order.
///
/// New segments get the next color in a cyclic palette. Sorted and inverse
/// views are computed on demand and never stored.
#[derive(Debug, Clone, Default)]
pub struct SegmentList {
    segments: Vec<Segment>,
    next_color: usize,
}

impl SegmentList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding one segment spanning the whole timeline.
    pub fn with_initial_segment() -> Self {
        let mut list = Self::new();
        list.add(Segment::new(None, None));
        list
    }

    /// Build a list from imported segments, coloring any that lack a color.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut list = Self::new();
        for segment in segments {
            list.add(segment);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_vec(self) -> Vec<Segment> {
        self.segments
    }

    /// Find a segment by ID.
    pub fn get(&self, id: &SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| &s.id == id)
    }

    /// Position of a segment in insertion order.
    pub fn index_of(&self, id: &SegmentId) -> Option<usize> {
        self.segments.iter().position(|s| &s.id == id)
    }

    fn take_color(&mut self) -> usize {
        let color = self.next_color;
        self.next_color = (self.next_color + 1) % SEGMENT_COLOR_COUNT;
        color
    }

    /// Append a segment and return its ID.
    pub fn add(&mut self, segment: Segment) -> SegmentId {
        let len = self.segments.len();
        self.insert(len, segment)
    }

    /// Insert a segment at `index` (clamped to the end).
    pub fn insert(&mut self, index: usize, mut segment: Segment) -> SegmentId {
        if segment.color_index.is_none() {
            segment.color_index = Some(self.take_color());
        }
        let id = segment.id.clone();
        let index = index.min(self.segments.len());
        self.segments.insert(index, segment);
        id
    }

    /// Remove a segment.
    pub fn remove(&mut self, id: &SegmentId) -> Option<Segment> {
        let index = self.index_of(id)?;
        Some(self.segments.remove(index))
    }

    /// Move the bounds of a segment. Returns false if the ID is unknown.
    pub fn set_bounds(&mut self, id: &SegmentId, start: Option<f64>, end: Option<f64>) -> bool {
        self.update(id, |s| {
            s.start = start;
            s.end = end;
        })
    }

    /// Rename a segment. Returns false if the ID is unknown.
    pub fn rename(&mut self, id: &SegmentId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update(id, |s| s.name = name)
    }

    /// Apply an in-place edit. Returns false if the ID is unknown.
    pub fn update(&mut self, id: &SegmentId, edit: impl FnOnce(&mut Segment)) -> bool {
        match self.segments.iter_mut().find(|s| &s.id == id) {
            Some(segment) => {
                edit(segment);
                true
            }
            None => false,
        }
    }

    /// Split a segment at `time`.
    ///
    /// The original keeps `[start, time)` and a new segment `[time, end)`
    /// with the same name and tags is inserted after it. Returns `None` if
    /// `time` is not strictly inside the segment.
    pub fn split(
        &mut self,
        id: &SegmentId,
        time: f64,
        duration: Option<f64>,
    ) -> Option<SegmentId> {
        let index = self.index_of(id)?;
        let (head, tail) = split_segment(&self.segments[index], time, duration)?;
        self.segments[index] = head;
        Some(self.insert(index + 1, tail))
    }

    /// Insert a copy of a segment right after it, with a new ID and color.
    pub fn duplicate(&mut self, id: &SegmentId) -> Option<SegmentId> {
        let index = self.index_of(id)?;
        let copy = Segment {
            id: SegmentId::generate(),
            color_index: None,
            ..self.segments[index].clone()
        };
        Some(self.insert(index + 1, copy))
    }

    /// Segments sorted by apparent start.
    pub fn sorted(&self) -> Vec<Segment> {
        sort_segments(&self.segments)
    }

    /// Gaps between the sorted segments. `None` if they overlap.
    pub fn inverse(
        &self,
        include_first: bool,
        include_last: bool,
        duration: Option<f64>,
    ) -> Option<Vec<InverseSegment>> {
        invert_segments(&self.sorted(), include_first, include_last, duration)
    }

    /// Chapters covering the timeline up to the last segment end.
    pub fn chapters(&self) -> cutlist_core::Result<Vec<Chapter>> {
        convert_segments_to_chapters(&self.sorted())
    }

    /// Merge overlapping segments in place.
    pub fn combine_overlapping(&mut self, duration: Option<f64>) {
        let sorted = self.sorted();
        let combined = combine_overlapping_segments(&sorted, |s| s.apparent_end(duration));
        // keep insertion order, take the merged bounds
        self.segments = self
            .segments
            .iter()
            .filter_map(|s| combined.iter().find(|c| c.id == s.id).cloned())
            .collect();
    }

    /// Merge the given segments in place.
    pub fn combine_selected(&mut self, selected: &HashSet<SegmentId>, duration: Option<f64>) {
        self.segments = combine_selected_segments(
            &self.segments,
            |s| s.apparent_end(duration),
            |s| selected.contains(&s.id),
        );
    }

    /// Number of segments with a positive resolved length.
    pub fn valid_count(&self, duration: Option<f64>) -> usize {
        self.segments.iter().filter(|s| s.is_valid(duration)).count()
    }

    /// Valid segments with both bounds resolved, ready for export.
    pub fn clean_segments(&self, duration: Option<f64>) -> Vec<Segment> {
        self.segments
            .iter()
            .filter(|s| s.is_valid(duration))
            .map(|s| Segment {
                start: Some(s.apparent_start()),
                end: Some(s.apparent_end(duration)),
                ..s.clone()
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a SegmentList {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
