//! CUE sheets.
//!
//! Only the tracks of the first `FILE` are imported. A track starts at its
//! first `INDEX` and ends where the next track starts.

use cutlist_core::{CutError, Message, Result};
use cutlist_segments::Segment;
use tracing::debug;

/// CUE frames per second (CD sectors).
pub const CUE_FRAMES_PER_SECOND: f64 = 75.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueTrack {
    pub number: u32,
    pub title: Option<String>,
    pub performer: Option<String>,
    /// Seconds of each `INDEX` line in file order.
    pub indexes: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueFile {
    pub name: String,
    pub tracks: Vec<CueTrack>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueSheet {
    pub title: Option<String>,
    pub performer: Option<String>,
    pub files: Vec<CueFile>,
}

/// Split a command line into words, keeping quoted strings together.
fn words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if quoted || !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => current.push(c),
        }
    }
    if quoted || !current.is_empty() {
        words.push(current);
    }
    words
}

/// Parse `mm:ss:ff` into seconds.
fn parse_index_time(value: &str) -> Option<f64> {
    let mut parts = value.split(':');
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = parts.next()?.parse().ok()?;
    let frames: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let whole = minutes.checked_mul(60)?.checked_add(seconds)?;
    Some(f64::from(whole) + f64::from(frames) / CUE_FRAMES_PER_SECOND)
}

/// Parse the sheet structure. Unknown commands are ignored.
pub fn parse_cue_sheet(text: &str) -> CueSheet {
    let mut sheet = CueSheet::default();

    for line in text.trim_start_matches('\u{feff}').lines() {
        let words = words(line.trim());
        let Some((command, args)) = words.split_first() else {
            continue;
        };
        let command = command.to_ascii_uppercase();

        match command.as_str() {
            "FILE" => sheet.files.push(CueFile {
                name: args.first().cloned().unwrap_or_default(),
                tracks: Vec::new(),
            }),
            "TRACK" => match (sheet.files.last_mut(), args.first()) {
                (Some(file), Some(number)) => file.tracks.push(CueTrack {
                    number: number.parse().unwrap_or(0),
                    ..CueTrack::default()
                }),
                _ => debug!(line, "cue track outside of a file"),
            },
            "TITLE" | "PERFORMER" | "INDEX" => {
                let track = sheet.files.last_mut().and_then(|f| f.tracks.last_mut());
                match (command.as_str(), track) {
                    ("TITLE", Some(track)) => track.title = args.first().cloned(),
                    ("TITLE", None) => sheet.title = args.first().cloned(),
                    ("PERFORMER", Some(track)) => track.performer = args.first().cloned(),
                    ("PERFORMER", None) => sheet.performer = args.first().cloned(),
                    ("INDEX", Some(track)) => {
                        match args.get(1).and_then(|t| parse_index_time(t)) {
                            Some(time) => track.indexes.push(time),
                            None => debug!(line, "skipping cue index with bad time"),
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    sheet
}

/// Import the tracks of the first file as segments.
pub fn parse_cue(text: &str) -> Result<Vec<Segment>> {
    let sheet = parse_cue_sheet(text);
    let tracks = match sheet.files.into_iter().next() {
        Some(file) if !file.tracks.is_empty() => file.tracks,
        _ => return Err(CutError::format(Message::NoCueTracks)),
    };

    let starts: Vec<Option<f64>> = tracks.iter().map(|t| t.indexes.first().copied()).collect();

    Ok(tracks
        .into_iter()
        .enumerate()
        .map(|(i, track)| {
            let end = starts.get(i + 1).copied().flatten();
            let mut segment = Segment::new(starts[i], end)
                .with_name(track.title.clone().unwrap_or_default());
            if let Some(title) = track.title {
                segment = segment.with_tag("title", title);
            }
            if let Some(performer) = track.performer {
                segment = segment.with_tag("performer", performer);
            }
            segment
        })
        .collect())
}
