//! Spreadsheet sink over a narrow host worksheet surface.
//!
//! The host (an office application, or [`super::MemoryWorksheet`]) is only
//! reached through [`Worksheet`], so the sink works without any office
//! runtime present.

use std::collections::HashMap;
use std::ops::Range;

use tracing::debug;

use super::ExportSink;
use crate::error::{HostError, SinkError};
use crate::marshal::MarshaledField;

/// Host-assigned identifier of a registered number format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatKey(pub i32);

/// Locale a number format pattern is interpreted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Locale {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: String::new(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::new("de")
    }
}

/// The host operations the spreadsheet sink relies on. Columns and rows are
/// zero-based.
pub trait Worksheet {
    fn set_cell_text(&mut self, column: usize, row: usize, text: &str) -> Result<(), HostError>;

    fn set_cell_format(&mut self, column: usize, row: usize, key: FormatKey)
    -> Result<(), HostError>;

    /// Look up an existing number format.
    fn query_format(&self, pattern: &str, locale: &Locale) -> Result<Option<FormatKey>, HostError>;

    /// Register a new number format.
    fn add_format(&mut self, pattern: &str, locale: &Locale) -> Result<FormatKey, HostError>;

    /// Size the given columns to fit their content.
    fn set_optimal_width(&mut self, columns: Range<usize>) -> Result<(), HostError>;
}

pub struct SpreadsheetSink<H: Worksheet> {
    host: H,
    locale: Locale,
    formats: HashMap<String, FormatKey>,
    row: usize,
    columns_used: usize,
}

impl<H: Worksheet> SpreadsheetSink<H> {
    pub fn new(host: H, locale: Locale) -> Self {
        Self {
            host,
            locale,
            formats: HashMap::new(),
            row: 0,
            columns_used: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Key of the number format `pattern` in this sink's locale, registering
    /// it with the host only if the host does not know it yet.
    pub fn register_or_reuse_format(&mut self, pattern: &str) -> Result<FormatKey, SinkError> {
        if let Some(key) = self.formats.get(pattern) {
            return Ok(*key);
        }

        let key = match self.host.query_format(pattern, &self.locale)? {
            Some(key) => key,
            None => {
                let key = self.host.add_format(pattern, &self.locale)?;
                debug!(pattern, language = %self.locale.language, ?key, "registered number format");
                key
            }
        };

        self.formats.insert(pattern.to_string(), key);
        Ok(key)
    }

    fn note_column(&mut self, column: usize) {
        self.columns_used = self.columns_used.max(column + 1);
    }
}

impl<H: Worksheet> ExportSink for SpreadsheetSink<H> {
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError> {
        for (column, name) in columns.iter().enumerate() {
            self.host.set_cell_text(column, 0, name)?;
            self.note_column(column);
        }
        Ok(())
    }

    fn begin_row(&mut self, row: usize) -> Result<(), SinkError> {
        self.row = row;
        Ok(())
    }

    fn write_field(&mut self, column: usize, field: &MarshaledField) -> Result<(), SinkError> {
        self.host.set_cell_text(column, self.row, &field.text)?;
        if let Some(pattern) = field.format.pattern() {
            let key = self.register_or_reuse_format(pattern)?;
            self.host.set_cell_format(column, self.row, key)?;
        }
        self.note_column(column);
        Ok(())
    }

    fn end_export(&mut self) -> Result<(), SinkError> {
        if self.columns_used > 0 {
            self.host.set_optimal_width(0..self.columns_used)?;
        }
        // Keys are only valid for the document they were registered in.
        self.formats.clear();
        Ok(())
    }
}
