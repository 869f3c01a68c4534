//! MPlayer EDL files (`start end type` per line).
//!
//! Type 0 rows mark parts MPlayer skips, so they are inverted into the
//! parts that remain. Types 1-3 are imported as they are.

use std::sync::LazyLock;

use cutlist_core::{CutError, Message, Result};
use cutlist_segments::{invert_segments, sort_segments, Segment};
use regex::Regex;
use tracing::debug;

/// Tag holding the MPlayer action type of an imported segment.
pub const TYPE_TAG: &str = "mplayerEdlType";

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+(\S+)\s+([0-3])\s*$").expect("mplayer line pattern is valid")
});

fn type_name(edl_type: u8) -> &'static str {
    match edl_type {
        0 => "Cut",
        1 => "Mute",
        2 => "Scene Marker",
        _ => "Commercial Break",
    }
}

fn parse_row(line: &str) -> Option<(f64, f64, u8)> {
    let caps = LINE_RE.captures(line)?;
    let start: f64 = caps[1].parse().ok()?;
    let end: f64 = caps[2].parse().ok()?;
    let edl_type: u8 = caps[3].parse().ok()?;
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end < 0.0 || start >= end {
        return None;
    }
    Some((start, end, edl_type))
}

/// Parse an MPlayer EDL.
///
/// Rows that do not parse, have negative times or no length are skipped.
/// Fails if nothing usable remains.
pub fn parse_mplayer(text: &str) -> Result<Vec<Segment>> {
    let mut cuts = Vec::new();
    let mut others = Vec::new();

    for (number, line) in text.lines().enumerate() {
        match parse_row(line) {
            Some((start, end, 0)) => cuts.push(Segment::from_range(start, end)),
            Some((start, end, edl_type)) => others.push(
                Segment::from_range(start, end)
                    .with_name(type_name(edl_type))
                    .with_tag(TYPE_TAG, edl_type),
            ),
            None if line.trim().is_empty() => {}
            None => debug!(line = number + 1, "skipping mplayer row"),
        }
    }

    let kept = if cuts.is_empty() {
        Vec::new()
    } else {
        invert_segments(&sort_segments(&cuts), true, true, None).unwrap_or_else(|| {
            debug!("mplayer cut rows overlap, ignoring them");
            Vec::new()
        })
    };

    let segments: Vec<Segment> = kept
        .iter()
        .map(|gap| gap.to_segment().with_name(type_name(0)).with_tag(TYPE_TAG, 0))
        .chain(others)
        .collect();

    if segments.is_empty() {
        return Err(CutError::format(Message::InvalidEdl));
    }
    Ok(segments)
}
