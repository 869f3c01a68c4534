//! PotPlayer bookmark files (`.pbf`).
//!
//! The file is UTF-16LE text with `n=milliseconds*label*...` entries.
//! Consecutive bookmarks form segments. A bookmark labelled with a single
//! space marks the end of the preceding one and does not start a segment.

use std::sync::LazyLock;

use cutlist_core::Result;
use cutlist_segments::Segment;
use regex::Regex;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+=(\d+)\*([^*]+)").expect("pbf entry pattern is valid"));

const END_MARKER: &str = " ";

/// Decode UTF-16LE bytes, tolerating a byte order mark and a dangling byte.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xFF, 0xFE]).unwrap_or(bytes);
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

struct Bookmark {
    time: f64,
    name: String,
}

fn bookmarks(text: &str) -> Vec<Bookmark> {
    text.lines()
        .filter_map(|line| {
            let caps = ENTRY_RE.captures(line.trim_end_matches('\r'))?;
            let millis: u64 = caps[1].parse().ok()?;
            Some(Bookmark {
                time: millis as f64 / 1000.0,
                name: caps[2].to_string(),
            })
        })
        .collect()
}

/// Parse raw `.pbf` bytes.
pub fn parse_pbf(bytes: &[u8]) -> Result<Vec<Segment>> {
    let bookmarks = bookmarks(&decode_utf16le(bytes));
    let mut segments = Vec::new();

    let mut i = 0;
    while let Some(bookmark) = bookmarks.get(i) {
        let Some(next) = bookmarks.get(i + 1) else {
            let last = Segment::new(Some(bookmark.time), None).with_name(bookmark.name.clone());
            segments.push(last);
            break;
        };
        segments.push(
            Segment::from_range(bookmark.time, next.time).with_name(bookmark.name.clone()),
        );
        i += if next.name == END_MARKER { 2 } else { 1 };
    }

    Ok(segments)
}
