//! Cutlist EDL - Edit decision list interchange
//!
//! Converts between segment lists and third-party formats:
//! - CSV and TSV cut lists (seconds, frames, timecodes)
//! - MPlayer EDL, YouTube chapters, SubRip subtitles
//! - Final Cut Pro XML (`xmeml` and `fcpxml`)
//! - CUE sheets, PotPlayer bookmarks, DV Analyzer summaries
//! - The native `.llc` project file
//!
//! [`parse_edl`] and [`format_edl`] are pure; [`Interchange`] adds the
//! file system and dialog boundary.

pub mod format;
pub mod formats;
pub mod interchange;

pub use format::{
    format_edl, parse_edl, EdlFormat, EdlInput, ExportParams, ExportSpec, FormatDescriptor,
    ImportParams, ImportSpec, Param, DESCRIPTORS,
};
pub use interchange::{
    DialogFilter, ExportRequest, FileDialog, FileSystem, Interchange, MediaInfo, NoDialog,
    ReadRequest, StdFileSystem,
};
