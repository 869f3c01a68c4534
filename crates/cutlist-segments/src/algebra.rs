//! Segment algebra: overlap detection, merging, inversion and chapters.
//!
//! Every function here takes its input by reference and returns new
//! segments. Functions documented as taking *sorted* input expect the
//! caller to have applied [`sort_segments`] first.

use cutlist_core::{CutError, Message, Result};
use serde::{Deserialize, Serialize};

use crate::segment::Segment;

// ── Sorting ─────────────────────────────────────────────────────

/// Stable sort by apparent start.
pub fn sort_segments(segments: &[Segment]) -> Vec<Segment> {
    let mut sorted = segments.to_vec();
    sorted.sort_by(|a, b| a.apparent_start().total_cmp(&b.apparent_start()));
    sorted
}

/// Split a segment at `at` into a head `[start, at)` and a tail `[at, end)`.
///
/// The head keeps the ID. The tail gets a fresh ID and copies the name and
/// tags. `None` unless `at` lies strictly inside the resolved range.
pub fn split_segment(
    segment: &Segment,
    at: f64,
    duration: Option<f64>,
) -> Option<(Segment, Segment)> {
    if at <= segment.apparent_start() || at >= segment.apparent_end(duration) {
        return None;
    }

    let head = Segment {
        end: Some(at),
        ..segment.clone()
    };
    let tail = Segment {
        name: segment.name.clone(),
        tags: segment.tags.clone(),
        ..Segment::new(Some(at), segment.end)
    };
    Some((head, tail))
}

// ── Overlap partitioning ────────────────────────────────────────

/// Group items into clusters of overlapping ranges.
///
/// The sweep runs in slice order: an item joins the current group when its
/// start is not before the previous item's start and lies before the
/// largest end seen in the group. Touching ranges (`end == next start`) do
/// not overlap. Only groups with two or more members are returned, each
/// sorted by start.
pub fn partition_into_overlapping_ranges<'a, T, S, E>(
    items: &'a [T],
    get_start: S,
    get_end: E,
) -> Vec<Vec<&'a T>>
where
    S: Fn(&T) -> f64,
    E: Fn(&T) -> f64,
{
    partition_indices(items, &get_start, &get_end)
        .into_iter()
        .map(|group| group.into_iter().map(|i| &items[i]).collect())
        .collect()
}

/// Index form of [`partition_into_overlapping_ranges`].
pub(crate) fn partition_indices<T>(
    items: &[T],
    get_start: &dyn Fn(&T) -> f64,
    get_end: &dyn Fn(&T) -> f64,
) -> Vec<Vec<usize>> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut groups = Vec::new();
    let mut current = vec![0];

    for i in 1..items.len() {
        let start = get_start(&items[i]);
        let in_order = start >= get_start(&items[i - 1]);
        if in_order && start < group_max_end(items, &current, get_end) {
            current.push(i);
        } else {
            groups.push(std::mem::replace(&mut current, vec![i]));
        }
    }
    groups.push(current);

    groups.retain(|group| group.len() > 1);
    for group in &mut groups {
        group.sort_by(|&a, &b| get_start(&items[a]).total_cmp(&get_start(&items[b])));
    }
    groups
}

// Sorts a scratch copy by end, descending, and takes the head. Quadratic
// over a long run of overlapping items, which is fine for hand-made lists.
fn group_max_end<T>(items: &[T], group: &[usize], get_end: &dyn Fn(&T) -> f64) -> f64 {
    let mut scratch = group.to_vec();
    scratch.sort_by(|&a, &b| get_end(&items[b]).total_cmp(&get_end(&items[a])));
    scratch
        .first()
        .map_or(f64::NEG_INFINITY, |&i| get_end(&items[i]))
}

// Open ends reach the end of the media, or forever if that is unknown.
fn overlap_end(segment: &Segment, duration: Option<f64>) -> f64 {
    segment.end.or(duration).unwrap_or(f64::INFINITY)
}

/// True if any two consecutive ranges in a start-sorted slice overlap.
pub fn has_any_overlap_by<T, S, E>(sorted: &[T], get_start: S, get_end: E) -> bool
where
    S: Fn(&T) -> f64,
    E: Fn(&T) -> f64,
{
    !partition_indices(sorted, &get_start, &get_end).is_empty()
}

/// True if any segments in a start-sorted list overlap.
///
/// An open end counts as reaching infinitely far, so an open-ended segment
/// overlaps everything after it.
pub fn has_any_segment_overlap(sorted: &[Segment]) -> bool {
    has_any_overlap_by(sorted, Segment::apparent_start, |s| overlap_end(s, None))
}

/// Like [`has_any_segment_overlap`] but open ends stop at `duration`.
pub fn has_any_segment_overlap_within(sorted: &[Segment], duration: Option<f64>) -> bool {
    has_any_overlap_by(sorted, Segment::apparent_start, |s| {
        overlap_end(s, duration)
    })
}

// ── Combining ───────────────────────────────────────────────────

/// Merge each overlap group into its earliest-starting member.
///
/// The survivor keeps its start and takes the end of the group member with
/// the largest `get_end`. Segments outside any group pass through, and
/// survivors keep their original relative order.
pub fn combine_overlapping_segments<E>(segments: &[Segment], get_end: E) -> Vec<Segment>
where
    E: Fn(&Segment) -> f64,
{
    let groups = partition_indices(segments, &Segment::apparent_start, &get_end);

    // (group, position within the start-sorted group) for each member
    let mut membership = vec![None; segments.len()];
    for (g, group) in groups.iter().enumerate() {
        for (pos, &i) in group.iter().enumerate() {
            membership[i] = Some((g, pos));
        }
    }

    segments
        .iter()
        .zip(membership)
        .filter_map(|(segment, member)| match member {
            None => Some(segment.clone()),
            Some((g, 0)) => {
                let longest = groups[g]
                    .iter()
                    .map(|&i| &segments[i])
                    .max_by(|a, b| get_end(a).total_cmp(&get_end(b)))
                    .unwrap_or(segment);
                Some(Segment {
                    end: longest.end,
                    ..segment.clone()
                })
            }
            Some(_) => None,
        })
        .collect()
}

/// Merge the selected segments into one.
///
/// The earliest-starting selected segment is kept and extended to the end
/// of the latest-ending selected segment; the other selected segments are
/// removed. Unselected segments are untouched.
pub fn combine_selected_segments<E, P>(
    segments: &[Segment],
    get_end: E,
    is_selected: P,
) -> Vec<Segment>
where
    E: Fn(&Segment) -> f64,
    P: Fn(&Segment) -> bool,
{
    let selected: Vec<usize> = (0..segments.len())
        .filter(|&i| is_selected(&segments[i]))
        .collect();

    // First minimum / first maximum on ties
    let first = selected.iter().copied().reduce(|best, i| {
        if segments[i].apparent_start() < segments[best].apparent_start() {
            i
        } else {
            best
        }
    });
    let last = selected.iter().copied().reduce(|best, i| {
        if get_end(&segments[i]) > get_end(&segments[best]) {
            i
        } else {
            best
        }
    });

    let (Some(first), Some(last)) = (first, last) else {
        return segments.to_vec();
    };

    segments
        .iter()
        .enumerate()
        .filter_map(|(i, segment)| {
            if i == first {
                Some(Segment {
                    end: segments[last].end,
                    ..segment.clone()
                })
            } else if is_selected(segment) {
                None
            } else {
                Some(segment.clone())
            }
        })
        .collect()
}

// ── Inversion ───────────────────────────────────────────────────

/// A gap between segments. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InverseSegment {
    /// `<left>-<right>`, `start-<first>` or `<last>-end`
    pub seg_id: String,
    pub start: f64,
    /// Open when the gap runs to an unknown media end.
    pub end: Option<f64>,
}

impl InverseSegment {
    /// Convert into a regular segment with a fresh ID.
    pub fn to_segment(&self) -> Segment {
        Segment::new(Some(self.start), self.end)
    }
}

/// Compute the gaps around start-sorted, non-overlapping segments.
///
/// Returns `None` for an empty list or when any segments overlap.
/// `include_first` adds the gap from 0 to the first segment,
/// `include_last` the gap from the last segment to `duration` (open if the
/// duration is unknown). Zero-length gaps are dropped.
pub fn invert_segments(
    sorted: &[Segment],
    include_first: bool,
    include_last: bool,
    duration: Option<f64>,
) -> Option<Vec<InverseSegment>> {
    let first = sorted.first()?;
    let last = sorted.last()?;
    if has_any_segment_overlap_within(sorted, duration) {
        return None;
    }

    let mut gaps = Vec::new();

    if include_first && first.apparent_start() > 0.0 {
        gaps.push(InverseSegment {
            seg_id: format!("start-{}", first.id),
            start: 0.0,
            end: Some(first.apparent_start()),
        });
    }

    for pair in sorted.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        gaps.push(InverseSegment {
            seg_id: format!("{}-{}", prev.id, next.id),
            start: prev.apparent_end(duration),
            end: Some(next.apparent_start()),
        });
    }

    if include_last {
        if let Some(last_end) = last.end {
            if duration.map_or(true, |d| last_end < d) {
                gaps.push(InverseSegment {
                    seg_id: format!("{}-end", last.id),
                    start: last_end,
                    end: duration,
                });
            }
        }
    }

    gaps.retain(|gap| gap.end.map_or(true, |end| end > gap.start));
    Some(gaps)
}

// ── Chapters ────────────────────────────────────────────────────

/// A chapter entry. Gaps between named segments become unnamed chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub start: f64,
    pub end: Option<f64>,
    pub name: String,
}

/// Fill the gaps before and between segments so the chapters cover the
/// timeline from 0 to the last segment's end.
///
/// No trailing chapter is added after the last segment.
pub fn convert_segments_to_chapters(sorted: &[Segment]) -> Result<Vec<Chapter>> {
    if sorted.is_empty() {
        return Ok(Vec::new());
    }
    if has_any_segment_overlap(sorted) {
        return Err(CutError::Domain(Message::SegmentsOverlap));
    }

    let gaps = invert_segments(sorted, true, false, None).unwrap_or_default();

    let mut chapters: Vec<Chapter> = sorted
        .iter()
        .map(|segment| Chapter {
            start: segment.apparent_start(),
            end: segment.end,
            name: segment.name.clone(),
        })
        .chain(gaps.into_iter().map(|gap| Chapter {
            start: gap.start,
            end: gap.end,
            name: String::new(),
        }))
        .collect();

    chapters.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(chapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64) -> Segment {
        Segment::from_range(start, end)
    }

    fn bounds(segments: &[Segment]) -> Vec<(Option<f64>, Option<f64>)> {
        segments.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_partition_groups_overlaps() {
        let items = [(0.0, 5.0), (1.0, 2.0), (3.0, 4.0), (6.0, 7.0), (6.5, 9.0)];
        let groups = partition_into_overlapping_ranges(&items, |r| r.0, |r| r.1);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(*groups[1][1], (6.5, 9.0));
    }

    #[test]
    fn test_partition_adjacent_is_not_overlap() {
        let items = [(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)];
        assert!(partition_into_overlapping_ranges(&items, |r| r.0, |r| r.1).is_empty());
    }

    #[test]
    fn test_partition_containment_counts() {
        let items = [(0.0, 10.0), (2.0, 3.0), (5.0, 6.0)];
        let groups = partition_into_overlapping_ranges(&items, |r| r.0, |r| r.1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn test_partition_does_not_reorder_input() {
        let items = vec![(0.0, 2.0), (1.0, 5.0), (1.5, 3.0)];
        let before = items.clone();
        let _ = partition_into_overlapping_ranges(&items, |r| r.0, |r| r.1);
        assert_eq!(items, before);
    }

    #[test]
    fn test_has_any_segment_overlap() {
        assert!(!has_any_segment_overlap(&[]));
        assert!(!has_any_segment_overlap(&[seg(0.0, 1.0), seg(1.0, 2.0)]));
        assert!(has_any_segment_overlap(&[seg(0.0, 1.5), seg(1.0, 2.0)]));
        // an open end reaches past the next start
        assert!(has_any_segment_overlap(&[
            Segment::new(Some(0.0), None),
            seg(5.0, 6.0)
        ]));
    }

    #[test]
    fn test_combine_overlapping() {
        let segments = vec![seg(0.0, 2.0), seg(1.0, 5.0), seg(3.0, 4.0), seg(6.0, 7.0)];
        let combined = combine_overlapping_segments(&segments, |s| s.apparent_end(None));
        assert_eq!(
            bounds(&combined),
            vec![(Some(0.0), Some(5.0)), (Some(6.0), Some(7.0))]
        );
        assert_eq!(combined[0].id, segments[0].id);
    }

    #[test]
    fn test_combine_overlapping_idempotent() {
        let segments = vec![seg(0.0, 2.0), seg(1.0, 5.0), seg(5.0, 8.0), seg(7.0, 9.0)];
        let once = combine_overlapping_segments(&segments, |s| s.apparent_end(None));
        let twice = combine_overlapping_segments(&once, |s| s.apparent_end(None));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_combine_selected() {
        let segments = vec![seg(5.0, 6.0), seg(0.0, 1.0), seg(2.0, 3.0), seg(8.0, 9.0)];
        let selected = [segments[0].id.clone(), segments[2].id.clone()];
        let combined = combine_selected_segments(
            &segments,
            |s| s.apparent_end(None),
            |s| selected.contains(&s.id),
        );
        assert_eq!(
            bounds(&combined),
            vec![
                (Some(0.0), Some(1.0)),
                (Some(2.0), Some(6.0)),
                (Some(8.0), Some(9.0)),
            ]
        );
        assert_eq!(combined[1].id, segments[2].id);
    }

    #[test]
    fn test_combine_selected_nothing_selected() {
        let segments = vec![seg(0.0, 1.0)];
        let combined = combine_selected_segments(&segments, |s| s.apparent_end(None), |_| false);
        assert_eq!(combined, segments);
    }

    #[test]
    fn test_invert_segments() {
        let segments = vec![seg(1.0, 2.0), seg(3.0, 4.0)];
        let gaps = invert_segments(&segments, true, true, Some(10.0)).unwrap();
        let ranges: Vec<_> = gaps.iter().map(|g| (g.start, g.end)).collect();
        assert_eq!(
            ranges,
            vec![(0.0, Some(1.0)), (2.0, Some(3.0)), (4.0, Some(10.0))]
        );
        assert_eq!(gaps[0].seg_id, format!("start-{}", segments[0].id));
        assert_eq!(gaps[1].seg_id, format!("{}-{}", segments[0].id, segments[1].id));
        assert_eq!(gaps[2].seg_id, format!("{}-end", segments[1].id));
    }

    #[test]
    fn test_invert_unknown_duration_is_open() {
        let gaps = invert_segments(&[seg(0.0, 1.1)], true, true, None).unwrap();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].start, 1.1);
        assert_eq!(gaps[0].end, None);
    }

    #[test]
    fn test_invert_drops_zero_length_gaps() {
        let segments = vec![seg(0.0, 1.0), seg(1.0, 2.0), seg(2.0, 10.0)];
        let gaps = invert_segments(&segments, true, true, Some(10.0)).unwrap();
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_invert_rejects_overlap_and_empty() {
        assert!(invert_segments(&[], true, true, None).is_none());
        assert!(invert_segments(&[seg(0.0, 2.0), seg(1.0, 3.0)], true, true, None).is_none());
    }

    #[test]
    fn test_invert_without_edges() {
        let segments = vec![seg(1.0, 2.0), seg(3.0, 4.0)];
        let gaps = invert_segments(&segments, false, false, Some(10.0)).unwrap();
        assert_eq!(gaps.len(), 1);
    }

    #[test]
    fn test_chapters_fill_gaps() {
        let segments = vec![
            seg(1.0, 2.0).with_name("a"),
            seg(3.0, 4.0).with_name("b"),
        ];
        let chapters = convert_segments_to_chapters(&segments).unwrap();
        let summary: Vec<_> = chapters
            .iter()
            .map(|c| (c.start, c.end, c.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0.0, Some(1.0), ""),
                (1.0, Some(2.0), "a"),
                (2.0, Some(3.0), ""),
                (3.0, Some(4.0), "b"),
            ]
        );
    }

    #[test]
    fn test_chapters_reject_overlap() {
        let err = convert_segments_to_chapters(&[seg(0.0, 2.0), seg(1.0, 3.0)]).unwrap_err();
        assert!(matches!(err, CutError::Domain(Message::SegmentsOverlap)));
    }

    #[test]
    fn test_split_segment() {
        let original = seg(2.0, 8.0).with_name("x").with_tag("k", "v");
        let (head, tail) = split_segment(&original, 5.0, None).unwrap();
        assert_eq!(head.id, original.id);
        assert_eq!((head.start, head.end), (Some(2.0), Some(5.0)));
        assert_eq!((tail.start, tail.end), (Some(5.0), Some(8.0)));
        assert_ne!(tail.id, original.id);
        assert_eq!(tail.tag("k"), Some("v"));
        assert!(split_segment(&original, 8.0, None).is_none());
    }

    #[test]
    fn test_sort_is_stable() {
        let a = seg(1.0, 2.0).with_name("a");
        let b = seg(0.0, 2.0).with_name("b");
        let c = seg(1.0, 3.0).with_name("c");
        let sorted = sort_segments(&[a, b, c]);
        let names: Vec<_> = sorted.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
