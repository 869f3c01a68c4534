//! User-facing messages and the localization context they render through.
//!
//! Every error a user can see carries a [`Message`]. Rendering goes through
//! a [`Localizer`] passed in by the caller; there is no process-wide locale.

use std::collections::HashMap;
use std::fmt;

/// A user-facing message with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    NoRowsFound,
    WrongColumnCount,
    InvalidStartOrEnd,
    InvalidEdl,
    /// The document root element (e.g. `xmeml`) is missing.
    MissingRootElement(&'static str),
    /// A required element below the root is missing.
    MissingElement(&'static str),
    InvalidTimeAttribute(String),
    SegmentsOverlap,
    NoCueTracks,
    ParameterRequired {
        format: String,
        parameter: &'static str,
    },
    ImportNotSupported(String),
    ExportNotSupported(String),
    ProjectVersionTooNew { found: u64, supported: u32 },
}

impl Message {
    /// Stable catalog key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::NoRowsFound => "no-rows-found",
            Self::WrongColumnCount => "wrong-column-count",
            Self::InvalidStartOrEnd => "invalid-start-or-end",
            Self::InvalidEdl => "invalid-edl",
            Self::MissingRootElement(_) => "missing-root-element",
            Self::MissingElement(_) => "missing-element",
            Self::InvalidTimeAttribute(_) => "invalid-time-attribute",
            Self::SegmentsOverlap => "segments-overlap",
            Self::NoCueTracks => "no-cue-tracks",
            Self::ParameterRequired { .. } => "parameter-required",
            Self::ImportNotSupported(_) => "import-not-supported",
            Self::ExportNotSupported(_) => "export-not-supported",
            Self::ProjectVersionTooNew { .. } => "project-version-too-new",
        }
    }

    /// Positional arguments substituted into `{}` placeholders.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::MissingRootElement(name) | Self::MissingElement(name) => vec![name.to_string()],
            Self::InvalidTimeAttribute(value) => vec![value.clone()],
            Self::ParameterRequired { format, parameter } => {
                vec![parameter.to_string(), format.clone()]
            }
            Self::ImportNotSupported(format) | Self::ExportNotSupported(format) => {
                vec![format.clone()]
            }
            Self::ProjectVersionTooNew { found, supported } => {
                vec![found.to_string(), supported.to_string()]
            }
            _ => Vec::new(),
        }
    }

    fn english_template(&self) -> &'static str {
        match self {
            Self::NoRowsFound => "No rows found",
            Self::WrongColumnCount => "One or more rows does not have 3 columns",
            Self::InvalidStartOrEnd => {
                "Invalid start or end value. Must contain a number of seconds"
            }
            Self::InvalidEdl => "Invalid EDL data found",
            Self::MissingRootElement(_) => "Root element <{}> not found in file",
            Self::MissingElement(_) => "No <{}> element found",
            Self::InvalidTimeAttribute(_) => "Invalid time attribute: {}",
            Self::SegmentsOverlap => "Segments cannot overlap",
            Self::NoCueTracks => "No tracks found in cue sheet",
            Self::ParameterRequired { .. } => "The {} is required for the {} format",
            Self::ImportNotSupported(_) => "Importing {} is not supported",
            Self::ExportNotSupported(_) => "Exporting {} is not supported",
            Self::ProjectVersionTooNew { .. } => {
                "Project file version {} is newer than supported version {}"
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fill_template(self.english_template(), &self.args()))
    }
}

/// Renders [`Message`]s for display.
pub trait Localizer {
    fn translate(&self, message: &Message) -> String;
}

/// The built-in English text.
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl Localizer for English {
    fn translate(&self, message: &Message) -> String {
        message.to_string()
    }
}

/// A translation table keyed by [`Message::key`].
///
/// Missing keys fall back to English.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: HashMap<&'static str, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template. `{}` placeholders are filled in order.
    pub fn insert(&mut self, key: &'static str, template: impl Into<String>) -> &mut Self {
        self.templates.insert(key, template.into());
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Localizer for Catalog {
    fn translate(&self, message: &Message) -> String {
        match self.templates.get(message.key()) {
            Some(template) => fill_template(template, &message.args()),
            None => message.to_string(),
        }
    }
}

fn fill_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut pieces = template.split("{}").peekable();
    while let Some(piece) = pieces.next() {
        out.push_str(piece);
        if pieces.peek().is_some() {
            if let Some(arg) = args.next() {
                out.push_str(arg);
            }
        }
    }
    out
}
