//! YouTube chapter listings (`0:00 Intro`, one chapter per line).

use std::sync::LazyLock;

use cutlist_core::{format_duration_with, parse_time, DurationFormat, Result};
use cutlist_segments::Segment;
use regex::Regex;

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s-]+(.+)$").expect("label pattern is valid"));

/// Parse chapter lines into back-to-back segments.
///
/// Lines without a leading timestamp or without a label after it are
/// ignored. Chapters are ordered by time, each ends where the next one
/// starts, the last one is open, and zero-length chapters are dropped.
pub fn parse_youtube(text: &str) -> Result<Vec<Segment>> {
    let mut chapters: Vec<(f64, String)> = text
        .lines()
        .filter_map(|line| {
            let parsed = parse_time(line.trim())?;
            let label = LABEL_RE.captures(parsed.rest)?;
            Some((parsed.time, label[1].trim().to_string()))
        })
        .collect();
    chapters.sort_by(|a, b| a.0.total_cmp(&b.0));

    let ends: Vec<Option<f64>> = chapters
        .iter()
        .skip(1)
        .map(|(time, _)| Some(*time))
        .chain(std::iter::once(None))
        .collect();

    Ok(chapters
        .into_iter()
        .zip(ends)
        .filter(|((start, _), end)| *end != Some(*start))
        .map(|((start, name), end)| Segment::new(Some(start), end).with_name(name))
        .collect())
}

/// One `m:ss name` line per segment, in list order.
pub fn format_youtube(segments: &[Segment]) -> String {
    let format = DurationFormat::shortened();
    segments
        .iter()
        .map(|segment| {
            let time = format_duration_with(segment.apparent_start(), &format);
            if segment.name.is_empty() {
                time
            } else {
                format!("{} {}", time, segment.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
