//! Timecode formatting and parsing.
//!
//! Two parsers live here. [`parse_duration`] is the strict inverse of
//! [`format_duration`] and is what text inputs use: anything that is not a
//! complete `HH:MM:SS.mmm` is rejected with `None` so the caller can keep
//! the raw text. [`parse_time`] is the loose grammar shared by the EDL
//! codecs; it tolerates missing hour/minute groups and returns whatever
//! text follows the timestamp.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?)(\d{2}):(\d{2}):(\d{2})\.(\d{3})$").expect("duration pattern is valid")
});

// Rightmost numeric group is always seconds: "1:02" is 62s, not 1h2m.
static LOOSE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^0-9]*(?:(?:([0-9]+):)?([0-9]{1,2}):)?([0-9]+)(?:\.([0-9]{1,3}))?:?")
        .expect("loose time pattern is valid")
});

// ── Formatting ──────────────────────────────────────────────────

/// Options for [`format_duration_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationFormat {
    /// When set, the fraction is a two-digit frame number instead of
    /// milliseconds.
    pub fps: Option<f64>,
    /// Append the `.fff` / `.ff` fraction.
    pub show_fraction: bool,
    /// Drop a zero hour component, unpad minutes and omit a zero fraction.
    pub shorten: bool,
    /// Use `.` between components so the result can go in a file name.
    pub file_name_friendly: bool,
}

impl Default for DurationFormat {
    fn default() -> Self {
        Self {
            fps: None,
            show_fraction: true,
            shorten: false,
            file_name_friendly: false,
        }
    }
}

impl DurationFormat {
    /// Frame-based fraction at the given rate.
    pub fn with_fps(fps: f64) -> Self {
        Self {
            fps: Some(fps),
            ..Self::default()
        }
    }

    /// The compact form used for chapter listings (`1:05`, `1:02:03`).
    pub fn shortened() -> Self {
        Self {
            show_fraction: false,
            shorten: true,
            ..Self::default()
        }
    }
}

/// Format seconds as `[-]HH:MM:SS.mmm`.
pub fn format_duration(seconds: f64) -> String {
    format_duration_with(seconds, &DurationFormat::default())
}

/// Format seconds with explicit options.
///
/// The sign is rendered separately from the magnitude, so `-0.0` and
/// every negative input get a leading `-`. Non-finite input renders as
/// zero.
pub fn format_duration_with(seconds: f64, format: &DurationFormat) -> String {
    let sign = if seconds.is_sign_negative() { "-" } else { "" };
    let total_seconds = if seconds.is_finite() {
        seconds.abs()
    } else {
        0.0
    };
    let units_per_sec = match format.fps {
        Some(fps) if fps > 0.0 => fps,
        _ => 1000.0,
    };

    // Round once in the target unit so carries propagate into seconds.
    let total_units = (total_seconds * units_per_sec).round();
    let whole_seconds = (total_units / units_per_sec).floor();
    let secs = whole_seconds as u64 % 60;
    let minutes = (whole_seconds / 60.0).floor() as u64 % 60;
    let hours = (whole_seconds / 3600.0).floor() as u64;
    let remainder = total_units % units_per_sec;

    let delim = if format.file_name_friendly { '.' } else { ':' };

    let mut out = String::from(sign);
    if !format.shorten || hours != 0 {
        if format.shorten {
            out.push_str(&hours.to_string());
        } else {
            out.push_str(&format!("{hours:02}"));
        }
        out.push(delim);
    }
    if format.shorten && hours == 0 {
        out.push_str(&minutes.to_string());
    } else {
        out.push_str(&format!("{minutes:02}"));
    }
    out.push(delim);
    out.push_str(&format!("{secs:02}"));

    if format.show_fraction && !(format.shorten && remainder == 0.0) {
        let digits = if format.fps.is_some() { 2 } else { 3 };
        out.push_str(&format!(".{:0digits$}", remainder.floor() as u64));
    }
    out
}

// ── Parsing ─────────────────────────────────────────────────────

/// Parse the strict `(-)HH:MM:SS.mmm` form.
///
/// Returns `None` for anything else, including components above 59.
pub fn parse_duration(input: &str) -> Option<f64> {
    let caps = DURATION_RE.captures(input.trim())?;
    let negative = &caps[1] == "-";
    let hours: u32 = caps[2].parse().ok()?;
    let minutes: u32 = caps[3].parse().ok()?;
    let seconds: u32 = caps[4].parse().ok()?;
    let millis: u32 = caps[5].parse().ok()?;

    if hours > 59 || minutes > 59 || seconds > 59 {
        return None;
    }

    let total =
        f64::from((hours * 60 + minutes) * 60 + seconds) + f64::from(millis) / 1000.0;
    Some(if negative { -total } else { total })
}

/// A timestamp found at the start of a string plus the text after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedTime<'a> {
    /// Seconds.
    pub time: f64,
    /// Unconsumed text following the timestamp.
    pub rest: &'a str,
}

/// Parse a loose `[(HH:)(MM:)]SS(.fff)(:)` timestamp at the start of `input`.
///
/// Leading non-digit characters are skipped. Hour and minute groups are
/// optional and default to zero; the seconds group may have any number of
/// digits so bare second counts are accepted.
pub fn parse_time(input: &str) -> Option<ParsedTime<'_>> {
    let caps = LOOSE_TIME_RE.captures(input)?;
    let matched = caps.get(0)?;

    let hours = caps.get(1).map_or(Ok(0.0), |m| m.as_str().parse::<f64>()).ok()?;
    let minutes = caps.get(2).map_or(Ok(0.0), |m| m.as_str().parse::<f64>()).ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    let fraction = caps
        .get(4)
        .map_or(Ok(0.0), |m| format!("0.{}", m.as_str()).parse::<f64>())
        .ok()?;

    Some(ParsedTime {
        time: (hours * 60.0 + minutes) * 60.0 + seconds + fraction,
        rest: &input[matched.end()..],
    })
}

// ── Frame rates ─────────────────────────────────────────────────

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build a rate from a probed floating point value.
    ///
    /// NTSC rates (23.976, 29.97, 59.94) map back to their `/1001` form,
    /// other fractional rates are kept to the millisecond. Returns `None`
    /// for non-finite, non-positive or out of range input.
    pub fn from_fps(fps: f64) -> Option<Self> {
        // outside these bounds the rational form cannot hold the rate
        if !fps.is_finite() || fps < 0.001 || fps > 4_000_000.0 {
            return None;
        }
        let whole = fps.round();
        if whole >= 1.0 && (fps - whole).abs() < 1e-9 {
            return Some(Self::new(whole as u32, 1));
        }
        let ntsc = (fps * 1001.0 / 1000.0).round();
        if ntsc >= 1.0 && ((ntsc * 1000.0 / 1001.0) - fps).abs() < 0.001 {
            return Some(Self::new(ntsc as u32 * 1000, 1001));
        }
        match (fps * 1000.0).round() as u32 {
            0 => None,
            millis => Some(Self::new(millis, 1000)),
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Time in seconds of a (possibly fractional) frame number.
    #[inline]
    pub fn frames_to_seconds(self, frames: f64) -> f64 {
        frames / self.to_fps_f64()
    }

    /// Nearest frame number for a time in seconds.
    #[inline]
    pub fn frame_count(self, seconds: f64) -> i64 {
        (seconds * self.to_fps_f64()).round() as i64
    }
}

/// Frame count at `seconds`, or `None` when the rate is not known yet.
pub fn get_frame_count(fps: Option<f64>, seconds: f64) -> Option<i64> {
    fps.and_then(FrameRate::from_fps)
        .map(|rate| rate.frame_count(seconds))
}
