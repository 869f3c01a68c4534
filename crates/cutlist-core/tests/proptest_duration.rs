//! Property-based tests for timecode formatting and parsing.

use cutlist_core::{format_duration, parse_duration, parse_time};
use proptest::prelude::*;

// Hours above 59 are rejected by the strict parser, so stay below that.
const MAX_SECONDS: f64 = 59.0 * 3600.0 + 59.0 * 60.0 + 59.0;

proptest! {
    /// Formatting always produces text the strict parser accepts, within 1ms.
    #[test]
    fn roundtrip_duration(seconds in -MAX_SECONDS..MAX_SECONDS) {
        let formatted = format_duration(seconds);
        let parsed = parse_duration(&formatted);
        prop_assert!(parsed.is_some(), "{} did not parse", formatted);
        prop_assert!((parsed.unwrap() - seconds).abs() <= 0.0005 + 1e-9);
    }

    /// The formatted text is fixed width apart from the sign.
    #[test]
    fn formatted_duration_is_fixed_width(seconds in 0.0..MAX_SECONDS) {
        prop_assert_eq!(format_duration(seconds).len(), "00:00:00.000".len());
    }

    /// The loose grammar reads the strict form identically.
    #[test]
    fn loose_parser_agrees_with_strict(seconds in 0.0..MAX_SECONDS) {
        let formatted = format_duration(seconds);
        let strict = parse_duration(&formatted).unwrap();
        let loose = parse_time(&formatted).unwrap();
        prop_assert!((loose.time - strict).abs() < 1e-6);
        prop_assert_eq!(loose.rest, "");
    }
}
