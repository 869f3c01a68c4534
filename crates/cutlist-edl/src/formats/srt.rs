//! SubRip subtitles.
//!
//! Each cue becomes a segment named after its text. Export writes one cue
//! per segment so a cut list can be reviewed in any video player.

use cutlist_core::{format_duration, parse_time, Result};
use cutlist_segments::Segment;
use tracing::debug;

/// Tag holding the cue number of an imported subtitle.
pub const INDEX_TAG: &str = "index";

fn parse_timestamp(value: &str) -> Option<f64> {
    parse_time(&value.trim().replace(',', ".")).map(|parsed| parsed.time)
}

fn parse_block(lines: &[&str]) -> Option<Segment> {
    let (index, timing, body) = match lines {
        [index, timing, body @ ..] => (index.trim(), *timing, body),
        _ => return None,
    };
    let (from, to) = timing.split_once("-->")?;
    let start = parse_timestamp(from)?;
    let end = parse_timestamp(to)?;

    let mut segment = Segment::from_range(start, end).with_name(body.join("\r\n"));
    if !index.is_empty() {
        segment = segment.with_tag(INDEX_TAG, index);
    }
    Some(segment)
}

/// Parse SRT cues. Blocks without a usable timing line are skipped.
pub fn parse_srt(text: &str) -> Result<Vec<Segment>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut segments = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
            continue;
        }
        if block.is_empty() {
            continue;
        }
        match parse_block(&block) {
            Some(segment) => segments.push(segment),
            None => debug!(first_line = block[0], "skipping malformed srt block"),
        }
        block.clear();
    }

    Ok(segments)
}

fn format_srt_time(value: Option<f64>) -> String {
    value
        .map(|seconds| format_duration(seconds).replace('.', ","))
        .unwrap_or_default()
}

/// One cue per segment, numbered from 1, with CRLF line endings.
pub fn format_srt(segments: &[Segment]) -> String {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let text = if segment.name.is_empty() {
                "-"
            } else {
                segment.name.as_str()
            };
            format!(
                "{}\r\n{} --> {}\r\n{}\r\n",
                i + 1,
                format_srt_time(segment.start),
                format_srt_time(segment.end),
                text
            )
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}
