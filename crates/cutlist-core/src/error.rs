//! Error types for cutlist.

use thiserror::Error;

use crate::l10n::{Localizer, Message};

/// Main error type for cutlist operations.
#[derive(Error, Debug)]
pub enum CutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural problem with an imported file (column count, missing
    /// element, nothing parsed).
    #[error("{0}")]
    Format(Message),

    /// Segment geometry that an operation refuses to work on.
    #[error("{0}")]
    Domain(Message),

    /// A format needs a parameter the caller did not supply.
    #[error("{0}")]
    Parameter(Message),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for cutlist operations.
pub type Result<T> = std::result::Result<T, CutError>;

impl CutError {
    /// Shorthand for a structural format error.
    pub fn format(message: Message) -> Self {
        Self::Format(message)
    }

    /// The user-facing message, if this error carries one.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Format(m) | Self::Domain(m) | Self::Parameter(m) => Some(m),
            _ => None,
        }
    }

    /// Render the error for display through the given localization context.
    ///
    /// Errors without a [`Message`] (I/O, XML, serialization) fall back to
    /// their English `Display` text.
    pub fn localized(&self, localizer: &dyn Localizer) -> String {
        match self.message() {
            Some(message) => localizer.translate(message),
            None => self.to_string(),
        }
    }
}
