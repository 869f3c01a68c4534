//! Final Cut Pro 7 / Premiere XML interchange (`xmeml`).
//!
//! Clip items of the first video track are imported with their source
//! in and out points converted from frames to seconds.

use cutlist_core::{CutError, Message, Result};
use cutlist_segments::Segment;
use tracing::debug;

use super::xml::{parse_document, Element};

fn timebase(element: &Element) -> Option<f64> {
    element
        .path(&["rate", "timebase"])
        .and_then(|t| t.text.trim().parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t > 0.0)
}

fn frame_value(element: &Element, name: &str) -> Option<f64> {
    element.child_text(name)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an XMEML document.
pub fn parse_xmeml(text: &str) -> Result<Vec<Segment>> {
    let root = parse_document(text)?
        .filter(|root| root.name == "xmeml")
        .ok_or_else(|| CutError::format(Message::MissingRootElement("xmeml")))?;

    let sequence = root
        .path(&["project", "children", "sequence"])
        .or_else(|| root.child("sequence"))
        .ok_or_else(|| CutError::format(Message::MissingElement("sequence")))?;

    let track = sequence
        .path(&["media", "video", "track"])
        .ok_or_else(|| CutError::format(Message::MissingElement("track")))?;

    let sequence_timebase = timebase(sequence);

    Ok(track
        .children_named("clipitem")
        .filter_map(|item| {
            let Some(rate) = timebase(item).or(sequence_timebase) else {
                debug!("skipping xmeml clip without a timebase");
                return None;
            };
            let start = frame_value(item, "in")? / rate;
            let end = frame_value(item, "out")? / rate;
            let name = item.child_text("name").unwrap_or_default();
            Some(Segment::from_range(start, end).with_name(name))
        })
        .collect())
}
