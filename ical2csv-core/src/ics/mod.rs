//! Reading events from iCalendar (.ics) sources.
//!
//! Parsing itself is done by the `icalendar` crate; this module decodes the
//! input, enforces the single-calendar rule and maps each VEVENT onto an
//! [`Event`](crate::event::Event).

mod parse;

use std::path::{Path, PathBuf};

use tracing::info;

pub use parse::parse_events;

use crate::error::SourceError;
use crate::event::Event;
use crate::source::EventSource;

enum Origin {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// An .ics file or in-memory .ics content.
pub struct IcsSource {
    origin: Origin,
}

impl IcsSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::Path(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_bytes(text.into().into_bytes())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            origin: Origin::Bytes(bytes),
        }
    }
}

impl EventSource for IcsSource {
    fn read_events(&mut self) -> Result<Vec<Event>, SourceError> {
        let bytes = match &mut self.origin {
            Origin::Path(path) => {
                info!(path = %path.display(), "reading iCalendar file");
                std::fs::read(path.as_path())?
            }
            Origin::Bytes(bytes) => std::mem::take(bytes),
        };

        let text = decode(bytes)?;
        let events = parse_events(&text)?;
        info!(events = events.len(), "iCalendar source read");
        Ok(events)
    }
}

/// UTF-8 decode, dropping a leading byte-order mark.
fn decode(bytes: Vec<u8>) -> Result<String, SourceError> {
    let text = String::from_utf8(bytes).map_err(|e| SourceError::Decoding(e.to_string()))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}
