//! Export destinations.
//!
//! A sink receives marshaled fields addressed by (row, column) and performs
//! the actual write. Row 0 is the header row; event `i` lands on row `i + 1`.

mod memory;
mod spreadsheet;
mod text;

pub use memory::{MemoryCell, MemoryWorksheet};
pub use spreadsheet::{FormatKey, Locale, SpreadsheetSink, Worksheet};
pub use text::{CsvOptions, CsvSink};

use crate::error::SinkError;
use crate::marshal::MarshaledField;

pub trait ExportSink {
    /// Write the column names into the header row.
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError>;

    /// Start row `row` (1-based for data rows).
    fn begin_row(&mut self, _row: usize) -> Result<(), SinkError> {
        Ok(())
    }

    fn write_field(&mut self, column: usize, field: &MarshaledField) -> Result<(), SinkError>;

    /// Finish row `row`.
    fn end_row(&mut self, _row: usize) -> Result<(), SinkError> {
        Ok(())
    }

    /// Finalize the output. Called once, after the last row.
    fn end_export(&mut self) -> Result<(), SinkError>;
}

impl<S: ExportSink + ?Sized> ExportSink for &mut S {
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError> {
        (**self).write_header(columns)
    }

    fn begin_row(&mut self, row: usize) -> Result<(), SinkError> {
        (**self).begin_row(row)
    }

    fn write_field(&mut self, column: usize, field: &MarshaledField) -> Result<(), SinkError> {
        (**self).write_field(column, field)
    }

    fn end_row(&mut self, row: usize) -> Result<(), SinkError> {
        (**self).end_row(row)
    }

    fn end_export(&mut self) -> Result<(), SinkError> {
        (**self).end_export()
    }
}

/// Feeds every call to two sinks, so both receive the same fields in the
/// same run.
#[derive(Debug)]
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: ExportSink, B: ExportSink> ExportSink for Tee<A, B> {
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError> {
        self.first.write_header(columns)?;
        self.second.write_header(columns)
    }

    fn begin_row(&mut self, row: usize) -> Result<(), SinkError> {
        self.first.begin_row(row)?;
        self.second.begin_row(row)
    }

    fn write_field(&mut self, column: usize, field: &MarshaledField) -> Result<(), SinkError> {
        self.first.write_field(column, field)?;
        self.second.write_field(column, field)
    }

    fn end_row(&mut self, row: usize) -> Result<(), SinkError> {
        self.first.end_row(row)?;
        self.second.end_row(row)
    }

    fn end_export(&mut self) -> Result<(), SinkError> {
        self.first.end_export()?;
        self.second.end_export()
    }
}
