//! Final Cut Pro X XML (`fcpxml`).
//!
//! Times are rational seconds such as `3003/30000s` or `10s`. They are
//! added up exactly before converting to floating point.

use cutlist_core::{CutError, Message, Result};
use cutlist_segments::Segment;
use num_rational::Rational64;
use num_traits::CheckedAdd;
use tracing::debug;

use super::xml::{parse_document, Element};

const SPINE_PATH: [&str; 5] = ["library", "event", "project", "sequence", "spine"];

/// Parse an FCPXML time attribute (`N/Ds` or `Ns`).
pub fn parse_rational_time(value: &str) -> Result<Rational64> {
    let invalid = || CutError::format(Message::InvalidTimeAttribute(value.to_string()));

    let body = value.trim().strip_suffix('s').ok_or_else(invalid)?;
    let (numerator, denominator) = match body.split_once('/') {
        Some((n, d)) => (n, d),
        None => (body, "1"),
    };
    let numerator: i64 = numerator.parse().map_err(|_| invalid())?;
    let denominator: i64 = denominator.parse().map_err(|_| invalid())?;
    if denominator <= 0 {
        return Err(invalid());
    }
    Ok(Rational64::new(numerator, denominator))
}

fn to_seconds(time: Rational64) -> f64 {
    *time.numer() as f64 / *time.denom() as f64
}

/// A clip without a `duration` is skipped.
fn clip_segment(clip: &Element) -> Result<Option<Segment>> {
    let Some(duration) = clip.attr("duration") else {
        let name = clip.attr("name").unwrap_or_default();
        debug!(name, "skipping asset-clip without duration");
        return Ok(None);
    };
    let duration = parse_rational_time(duration)?;
    let start = match clip.attr("start") {
        Some(value) => parse_rational_time(value)?,
        None => Rational64::from_integer(0),
    };
    let end = start.checked_add(&duration).ok_or_else(|| {
        CutError::format(Message::InvalidTimeAttribute(
            clip.attr("duration").unwrap_or_default().to_string(),
        ))
    })?;

    let mut segment = Segment::from_range(to_seconds(start), to_seconds(end));
    if let Some(name) = clip.attr("name") {
        segment = segment.with_name(name);
    }
    Ok(Some(segment))
}

/// Parse the `asset-clip` elements of the project spine.
pub fn parse_fcpxml(text: &str) -> Result<Vec<Segment>> {
    let root = parse_document(text)?
        .filter(|root| root.name == "fcpxml")
        .ok_or_else(|| CutError::format(Message::MissingRootElement("fcpxml")))?;

    let spine = root
        .path(&SPINE_PATH)
        .ok_or_else(|| CutError::format(Message::MissingElement("spine")))?;

    spine
        .children_named("asset-clip")
        .filter_map(|clip| clip_segment(clip).transpose())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_times() {
        assert_eq!(parse_rational_time("10s").unwrap(), Rational64::from_integer(10));
        assert_eq!(
            parse_rational_time("3003/30000s").unwrap(),
            Rational64::new(1001, 10000)
        );
        assert!(parse_rational_time("10").is_err());
        assert!(parse_rational_time("1/0s").is_err());
        assert!(parse_rational_time("abc/2s").is_err());
    }

    #[test]
    fn test_asset_clips() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE fcpxml>
<fcpxml version="1.9">
  <resources><format id="r1" frameDuration="1001/30000s"/></resources>
  <library>
    <event name="Event">
      <project name="Cuts">
        <sequence format="r1">
          <spine>
            <asset-clip name="One" start="1/2s" duration="3/2s"/>
            <gap duration="1s"/>
            <asset-clip duration="30030/30000s"/>
          </spine>
        </sequence>
      </project>
    </event>
  </library>
</fcpxml>"#;
        let segments = parse_fcpxml(doc).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!((segments[0].start, segments[0].end), (Some(0.5), Some(2.0)));
        assert_eq!(segments[0].name, "One");
        assert_eq!(segments[1].start, Some(0.0));
        assert_eq!(segments[1].end, Some(1.001));
    }

    #[test]
    fn test_errors() {
        let err = parse_fcpxml("<xmeml/>").unwrap_err();
        assert!(matches!(err, CutError::Format(Message::MissingRootElement("fcpxml"))));

        let err = parse_fcpxml("<fcpxml><library/></fcpxml>").unwrap_err();
        assert!(matches!(err, CutError::Format(Message::MissingElement("spine"))));

        let doc = "<fcpxml><library><event><project><sequence><spine>\
                   <asset-clip start=\"x\" duration=\"1s\"/>\
                   </spine></sequence></project></event></library></fcpxml>";
        let err = parse_fcpxml(doc).unwrap_err();
        assert!(matches!(err, CutError::Format(Message::InvalidTimeAttribute(_))));
    }

    fn spine(clips: &str) -> String {
        format!(
            "<fcpxml><library><event><project><sequence><spine>{}\
             </spine></sequence></project></event></library></fcpxml>",
            clips
        )
    }

    #[test]
    fn test_end_overflow_is_error() {
        let doc = spine(r#"<asset-clip start="9223372036854775807s" duration="1s"/>"#);
        let err = parse_fcpxml(&doc).unwrap_err();
        assert!(matches!(err, CutError::Format(Message::InvalidTimeAttribute(_))));
    }

    #[test]
    fn test_clip_without_duration_skipped() {
        let doc = spine(concat!(
            r#"<asset-clip name="a" start="1s"/>"#,
            r#"<asset-clip name="b" duration="2s"/>"#,
        ));
        let segments = parse_fcpxml(&doc).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].name, "b");
        assert_eq!(segments[0].end, Some(2.0));
    }
}
