//! Cutlist Core - Foundation types for segment editing
//!
//! This crate provides the leaf types used throughout cutlist:
//! - Timecode formatting and the strict/loose time parsers
//! - Frame rates and frame-count conversion
//! - The error taxonomy shared by every crate
//! - An explicit localization context for user-facing messages

pub mod error;
pub mod l10n;
pub mod time;

pub use error::{CutError, Result};
pub use l10n::{Catalog, English, Localizer, Message};
pub use time::{
    format_duration, format_duration_with, get_frame_count, parse_duration, parse_time,
    DurationFormat, FrameRate, ParsedTime,
};

/// Palette size used when assigning segment color indices.
pub const SEGMENT_COLOR_COUNT: usize = 12;
