//! Error types for the export engine.

use thiserror::Error;

use crate::schema::AttributeKind;

/// A value that the marshaler has no rule for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error("Unsupported value for attribute '{attribute}': expected {expected}, got {observed}")]
    UnsupportedAttributeKind {
        attribute: &'static str,
        expected: AttributeKind,
        observed: AttributeKind,
    },
}

/// Failures raised while reading events from the calendar source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Could not decode calendar source: {0}")]
    Decoding(String),

    #[error("Calendar source contains {0} calendars, only one is supported")]
    MultiCalendar(usize),

    #[error("Calendar source is not valid: {0}")]
    Malformed(String),

    #[error("Could not read calendar source: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by a spreadsheet host surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Spreadsheet host error: {0}")]
pub struct HostError(pub String);

/// Failures of an export sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    #[error("Sink write failed: {0}")]
    WriteFailed(#[from] std::io::Error),
}

impl From<HostError> for SinkError {
    fn from(err: HostError) -> Self {
        SinkError::Unavailable(err.0)
    }
}

impl From<csv::Error> for SinkError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(source) => SinkError::WriteFailed(source),
            other => SinkError::WriteFailed(std::io::Error::other(format!("{:?}", other))),
        }
    }
}

/// Position of a failure inside an export run.
fn at(event: &Option<usize>) -> String {
    match event {
        Some(i) => format!("event {}", i),
        None => "header/finalize".to_string(),
    }
}

/// The first fatal error of an export run.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Could not decode calendar source: {0}")]
    SourceDecoding(String),

    #[error("Calendar source contains {0} calendars, only one is supported")]
    MultiCalendarUnsupported(usize),

    #[error("Calendar source is not valid: {0}")]
    SourceMalformed(String),

    #[error("Could not read calendar source: {0}")]
    SourceUnreadable(#[source] std::io::Error),

    #[error("Event {event}: attribute '{attribute}' expected {expected}, got {observed}")]
    UnsupportedAttributeKind {
        event: usize,
        attribute: &'static str,
        expected: AttributeKind,
        observed: AttributeKind,
    },

    #[error("Export destination unavailable ({}): {message}", at(.event))]
    SinkUnavailable {
        event: Option<usize>,
        message: String,
    },

    #[error("Writing export destination failed ({}): {source}", at(.event))]
    SinkWriteFailed {
        event: Option<usize>,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn from_sink(err: SinkError, event: Option<usize>) -> Self {
        match err {
            SinkError::Unavailable(message) => ExportError::SinkUnavailable { event, message },
            SinkError::WriteFailed(source) => ExportError::SinkWriteFailed { event, source },
        }
    }

    pub(crate) fn from_marshal(err: MarshalError, event: usize) -> Self {
        match err {
            MarshalError::UnsupportedAttributeKind {
                attribute,
                expected,
                observed,
            } => ExportError::UnsupportedAttributeKind {
                event,
                attribute,
                expected,
                observed,
            },
        }
    }
}

impl From<SourceError> for ExportError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Decoding(msg) => ExportError::SourceDecoding(msg),
            SourceError::MultiCalendar(n) => ExportError::MultiCalendarUnsupported(n),
            SourceError::Malformed(msg) => ExportError::SourceMalformed(msg),
            SourceError::Io(io) => ExportError::SourceUnreadable(io),
        }
    }
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
