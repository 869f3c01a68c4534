//! The EDL format registry and pure import/export routing.
//!
//! Every format is described once in [`DESCRIPTORS`]; import and export
//! support, required parameters and file extensions are all looked up
//! there.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use cutlist_core::{CutError, FrameRate, Message, Result};
use cutlist_segments::{ProjectFile, Segment};
use serde::{Deserialize, Serialize};

use crate::formats;

/// A supported file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdlFormat {
    Csv,
    CsvHuman,
    CsvFrames,
    TsvHuman,
    Mplayer,
    Youtube,
    Xmeml,
    Fcpxml,
    Cue,
    Pbf,
    Srt,
    DvAnalyzerSummaryTxt,
    /// Native project file.
    Llc,
}

/// A parameter some formats cannot do without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Fps,
}

impl Param {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fps => "frame rate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSpec {
    pub required: &'static [Param],
    /// File extensions offered in the open dialog.
    pub extensions: &'static [&'static str],
    /// Read as raw bytes rather than UTF-8 text.
    pub binary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSpec {
    pub required: &'static [Param],
    pub extension: &'static str,
    pub filter_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub format: EdlFormat,
    pub tag: &'static str,
    pub label: &'static str,
    pub import: Option<ImportSpec>,
    pub export: Option<ExportSpec>,
}

const NONE: &[Param] = &[];
const FPS: &[Param] = &[Param::Fps];

const fn text_import(extensions: &'static [&'static str]) -> Option<ImportSpec> {
    Some(ImportSpec {
        required: NONE,
        extensions,
        binary: false,
    })
}

const fn export(extension: &'static str, filter_label: &'static str) -> Option<ExportSpec> {
    Some(ExportSpec {
        required: NONE,
        extension,
        filter_label,
    })
}

/// One entry per [`EdlFormat`], in declaration order.
pub static DESCRIPTORS: [FormatDescriptor; 13] = [
    FormatDescriptor {
        format: EdlFormat::Csv,
        tag: "csv",
        label: "CSV (seconds)",
        import: text_import(&["csv"]),
        export: export("csv", "CSV files"),
    },
    FormatDescriptor {
        format: EdlFormat::CsvHuman,
        tag: "csv-human",
        label: "CSV (human readable timestamps)",
        import: text_import(&["csv"]),
        export: export("csv", "CSV files"),
    },
    FormatDescriptor {
        format: EdlFormat::CsvFrames,
        tag: "csv-frames",
        label: "CSV (frame numbers)",
        import: Some(ImportSpec {
            required: FPS,
            extensions: &["csv"],
            binary: false,
        }),
        export: Some(ExportSpec {
            required: FPS,
            extension: "csv",
            filter_label: "CSV files",
        }),
    },
    FormatDescriptor {
        format: EdlFormat::TsvHuman,
        tag: "tsv-human",
        label: "TSV (human readable timestamps)",
        import: None,
        export: export("tsv", "TSV files"),
    },
    FormatDescriptor {
        format: EdlFormat::Mplayer,
        tag: "mplayer",
        label: "MPlayer EDL",
        import: text_import(&["edl", "txt"]),
        export: None,
    },
    FormatDescriptor {
        format: EdlFormat::Youtube,
        tag: "youtube",
        label: "YouTube chapters",
        import: text_import(&["txt"]),
        export: export("txt", "Text files"),
    },
    FormatDescriptor {
        format: EdlFormat::Xmeml,
        tag: "xmeml",
        label: "Final Cut Pro 7 / Premiere XML",
        import: text_import(&["xml"]),
        export: None,
    },
    FormatDescriptor {
        format: EdlFormat::Fcpxml,
        tag: "fcpxml",
        label: "Final Cut Pro X XML",
        import: text_import(&["fcpxml", "xml"]),
        export: None,
    },
    FormatDescriptor {
        format: EdlFormat::Cue,
        tag: "cue",
        label: "CUE sheet",
        import: text_import(&["cue"]),
        export: None,
    },
    FormatDescriptor {
        format: EdlFormat::Pbf,
        tag: "pbf",
        label: "PotPlayer bookmarks",
        import: Some(ImportSpec {
            required: NONE,
            extensions: &["pbf"],
            binary: true,
        }),
        export: None,
    },
    FormatDescriptor {
        format: EdlFormat::Srt,
        tag: "srt",
        label: "SubRip subtitles",
        import: text_import(&["srt"]),
        export: export("srt", "Subtitles"),
    },
    FormatDescriptor {
        format: EdlFormat::DvAnalyzerSummaryTxt,
        tag: "dv-analyzer-summary-txt",
        label: "DV Analyzer summary",
        import: text_import(&["txt"]),
        export: None,
    },
    FormatDescriptor {
        format: EdlFormat::Llc,
        tag: "llc",
        label: "Cutlist project",
        import: text_import(&["llc"]),
        export: export("llc", "Cutlist projects"),
    },
];

impl EdlFormat {
    pub const ALL: [Self; 13] = [
        Self::Csv,
        Self::CsvHuman,
        Self::CsvFrames,
        Self::TsvHuman,
        Self::Mplayer,
        Self::Youtube,
        Self::Xmeml,
        Self::Fcpxml,
        Self::Cue,
        Self::Pbf,
        Self::Srt,
        Self::DvAnalyzerSummaryTxt,
        Self::Llc,
    ];

    pub fn descriptor(self) -> &'static FormatDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Stable identifier used on the command line and in config files.
    pub fn as_str(self) -> &'static str {
        self.descriptor().tag
    }

    pub fn can_import(self) -> bool {
        self.descriptor().import.is_some()
    }

    pub fn can_export(self) -> bool {
        self.descriptor().export.is_some()
    }

    fn import_spec(self) -> Result<&'static ImportSpec> {
        self.descriptor()
            .import
            .as_ref()
            .ok_or_else(|| CutError::format(Message::ImportNotSupported(self.to_string())))
    }

    fn export_spec(self) -> Result<&'static ExportSpec> {
        self.descriptor()
            .export
            .as_ref()
            .ok_or_else(|| CutError::format(Message::ExportNotSupported(self.to_string())))
    }
}

impl fmt::Display for EdlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdlFormat {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| CutError::UnknownFormat(s.to_string()))
    }
}

// ── Routing ─────────────────────────────────────────────────────

/// File contents handed to a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdlInput {
    Text(String),
    Bytes(Vec<u8>),
}

impl EdlInput {
    /// Contents as text without a UTF-8 byte order mark.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.trim_start_matches('\u{feff}')),
            Self::Bytes(bytes) => match String::from_utf8_lossy(bytes) {
                Cow::Borrowed(text) => Cow::Borrowed(text.trim_start_matches('\u{feff}')),
                Cow::Owned(text) => Cow::Owned(text.trim_start_matches('\u{feff}').to_string()),
            },
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportParams {
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportParams {
    pub fps: Option<f64>,
    /// Recorded in native project files.
    pub media_file_name: Option<String>,
}

fn require_frame_rate(format: EdlFormat, fps: Option<f64>) -> Result<FrameRate> {
    fps.and_then(FrameRate::from_fps).ok_or_else(|| {
        CutError::Parameter(Message::ParameterRequired {
            format: format.to_string(),
            parameter: Param::Fps.label(),
        })
    })
}

fn check_required(format: EdlFormat, required: &[Param], fps: Option<f64>) -> Result<()> {
    for param in required {
        match param {
            Param::Fps => {
                require_frame_rate(format, fps)?;
            }
        }
    }
    Ok(())
}

/// Parse file contents in the given format.
pub fn parse_edl(
    format: EdlFormat,
    input: &EdlInput,
    params: &ImportParams,
) -> Result<Vec<Segment>> {
    let spec = format.import_spec()?;
    check_required(format, spec.required, params.fps)?;

    match format {
        EdlFormat::Csv => formats::parse_csv_seconds(&input.text()),
        EdlFormat::CsvHuman => formats::parse_csv_human(&input.text()),
        EdlFormat::CsvFrames => {
            formats::parse_csv_frames(&input.text(), require_frame_rate(format, params.fps)?)
        }
        EdlFormat::Mplayer => formats::parse_mplayer(&input.text()),
        EdlFormat::Youtube => formats::parse_youtube(&input.text()),
        EdlFormat::Xmeml => formats::parse_xmeml(&input.text()),
        EdlFormat::Fcpxml => formats::parse_fcpxml(&input.text()),
        EdlFormat::Cue => formats::parse_cue(&input.text()),
        EdlFormat::Pbf => formats::parse_pbf(input.bytes()),
        EdlFormat::Srt => formats::parse_srt(&input.text()),
        EdlFormat::DvAnalyzerSummaryTxt => formats::parse_dv_analyzer_summary(&input.text()),
        EdlFormat::Llc => {
            ProjectFile::from_json(input.text().as_bytes()).map(|project| project.to_segments())
        }
        EdlFormat::TsvHuman => {
            Err(CutError::format(Message::ImportNotSupported(format.to_string())))
        }
    }
}

/// Render segments in the given format.
pub fn format_edl(
    format: EdlFormat,
    segments: &[Segment],
    params: &ExportParams,
) -> Result<String> {
    let spec = format.export_spec()?;
    check_required(format, spec.required, params.fps)?;

    match format {
        EdlFormat::Csv => Ok(formats::format_csv_seconds(segments)),
        EdlFormat::CsvHuman => Ok(formats::format_csv_human(segments)),
        EdlFormat::CsvFrames => Ok(formats::format_csv_frames(
            segments,
            require_frame_rate(format, params.fps)?,
        )),
        EdlFormat::TsvHuman => Ok(formats::format_tsv_human(segments)),
        EdlFormat::Youtube => Ok(formats::format_youtube(segments)),
        EdlFormat::Srt => Ok(formats::format_srt(segments)),
        EdlFormat::Llc => {
            let json = ProjectFile::new(params.media_file_name.clone(), segments).to_json()?;
            String::from_utf8(json).map_err(|e| CutError::Serialization(e.to_string()))
        }
        _ => Err(CutError::format(Message::ExportNotSupported(format.to_string()))),
    }
}
