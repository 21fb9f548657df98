//! Core export engine for ical2csv.
//!
//! This crate turns parsed calendar events into table rows:
//! - `schema`: the fixed, ordered set of exported attributes
//! - `marshal`: per-value conversion into display text plus a format hint
//! - `sink`: CSV and spreadsheet destinations
//! - `export`: the driver tying events, schema and sink together
//! - `ics`: reading events from .ics input via the icalendar crate

pub mod error;
pub mod event;
pub mod export;
pub mod ics;
pub mod marshal;
pub mod schema;
pub mod sink;
pub mod source;

pub use error::{ExportError, ExportResult, HostError, MarshalError, SinkError, SourceError};
pub use event::{AttributeValue, Event};
pub use export::{ExportJob, ExportReport, ExportState, export};
pub use ics::IcsSource;
pub use marshal::{FormatKind, MarshaledField, marshal};
pub use schema::{Attribute, AttributeKind};
pub use source::EventSource;
