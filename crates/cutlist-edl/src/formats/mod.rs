//! Parsers and formatters for each supported EDL dialect.

pub mod csv;
pub mod cue;
pub mod dv_analyzer;
pub mod fcpxml;
pub mod mplayer;
pub mod pbf;
pub mod srt;
pub mod xmeml;
pub mod youtube;

mod xml;

pub use csv::{
    format_csv_frames, format_csv_human, format_csv_seconds, format_delimited, format_tsv_human,
    parse_csv, parse_csv_frames, parse_csv_human, parse_csv_seconds, TimeColumn,
};
pub use cue::{parse_cue, parse_cue_sheet, CueFile, CueSheet, CueTrack};
pub use dv_analyzer::parse_dv_analyzer_summary;
pub use fcpxml::{parse_fcpxml, parse_rational_time};
pub use mplayer::parse_mplayer;
pub use pbf::{decode_utf16le, parse_pbf};
pub use srt::{format_srt, parse_srt};
pub use xmeml::parse_xmeml;
pub use youtube::{format_youtube, parse_youtube};

/// Shortest decimal form of a number of seconds (`2`, `2.5`).
pub(crate) fn format_seconds(seconds: f64) -> String {
    format!("{}", seconds)
}
