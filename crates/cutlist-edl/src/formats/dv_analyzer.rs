//! DV Analyzer summary reports (`*.summary.txt`).
//!
//! Each row below the header describes one recording run on a DV tape.
//! Rows become back-to-back segments named after the recording start.

use std::sync::LazyLock;

use cutlist_core::{parse_duration, Result};
use cutlist_segments::Segment;
use regex::Regex;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Absolute time\s+DV timecode").expect("dv header pattern is valid")
});

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(\d{2}:\d{2}:\d{2}\.\d{3})\s+",
        r"(\S+)\s+-\s+\S+\s+",
        r"(\S+)\s+(\S+)\s+-\s+\S+\s+\S+\s+",
        r"(\d+)\s+-\s+\d+\s*$",
    ))
    .expect("dv row pattern is valid")
});

struct Row {
    time: f64,
    timecode: String,
    date: String,
    clock: String,
    frame: String,
}

fn parse_row(line: &str) -> Option<Row> {
    let caps = ROW_RE.captures(line.trim_end())?;
    Some(Row {
        time: parse_duration(&caps[1])?,
        timecode: caps[2].to_string(),
        date: caps[3].to_string(),
        clock: caps[4].to_string(),
        frame: caps[5].to_string(),
    })
}

/// Parse the rows following the header line.
///
/// Anything before the header is ignored and the first line after it that
/// is not a row ends the table.
pub fn parse_dv_analyzer_summary(text: &str) -> Result<Vec<Segment>> {
    let rows: Vec<Row> = text
        .lines()
        .skip_while(|line| !HEADER_RE.is_match(line))
        .skip(1)
        .map_while(parse_row)
        .collect();

    let ends: Vec<Option<f64>> = rows
        .iter()
        .skip(1)
        .map(|row| Some(row.time))
        .chain(std::iter::once(None))
        .collect();

    Ok(rows
        .into_iter()
        .zip(ends)
        .map(|(row, end)| {
            Segment::new(Some(row.time), end)
                .with_name(format!("{} {}", row.date, row.clock))
                .with_tag("dvTimecode", row.timecode)
                .with_tag("recordedDate", row.date)
                .with_tag("recordedTime", row.clock)
                .with_tag("frameStart", row.frame)
        })
        .collect())
}
