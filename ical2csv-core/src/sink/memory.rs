//! In-memory worksheet host.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use super::spreadsheet::{FormatKey, Locale, Worksheet};
use crate::error::HostError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCell {
    pub text: String,
    pub format: Option<FormatKey>,
}

/// A worksheet held entirely in memory, with its own number format table.
#[derive(Debug, Default)]
pub struct MemoryWorksheet {
    cells: BTreeMap<(usize, usize), MemoryCell>,
    formats: Vec<(String, Locale)>,
    optimal_width: BTreeSet<usize>,
}

impl MemoryWorksheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&MemoryCell> {
        self.cells.get(&(row, column))
    }

    pub fn text(&self, column: usize, row: usize) -> Option<&str> {
        self.cell(column, row).map(|c| c.text.as_str())
    }

    pub fn format(&self, column: usize, row: usize) -> Option<FormatKey> {
        self.cell(column, row).and_then(|c| c.format)
    }

    pub fn format_pattern(&self, key: FormatKey) -> Option<&str> {
        usize::try_from(key.0)
            .ok()
            .and_then(|i| self.formats.get(i))
            .map(|(pattern, _)| pattern.as_str())
    }

    /// Number of formats registered so far
    pub fn formats_added(&self) -> usize {
        self.formats.len()
    }

    /// Columns flagged for optimal width, ascending
    pub fn optimal_width_columns(&self) -> Vec<usize> {
        self.optimal_width.iter().copied().collect()
    }

    /// Number of rows holding at least one cell
    pub fn row_count(&self) -> usize {
        self.cells.keys().map(|(row, _)| row + 1).max().unwrap_or(0)
    }

    /// Texts of one row, from column 0 up to the last written column
    pub fn row_texts(&self, row: usize) -> Vec<String> {
        let last = self
            .cells
            .range((row, 0)..(row + 1, 0))
            .map(|((_, col), _)| *col)
            .max();
        match last {
            Some(last) => (0..=last)
                .map(|col| self.text(col, row).unwrap_or_default().to_string())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Worksheet for MemoryWorksheet {
    fn set_cell_text(&mut self, column: usize, row: usize, text: &str) -> Result<(), HostError> {
        self.cells.entry((row, column)).or_default().text = text.to_string();
        Ok(())
    }

    fn set_cell_format(
        &mut self,
        column: usize,
        row: usize,
        key: FormatKey,
    ) -> Result<(), HostError> {
        if self.format_pattern(key).is_none() {
            return Err(HostError(format!("unknown number format {}", key.0)));
        }
        self.cells.entry((row, column)).or_default().format = Some(key);
        Ok(())
    }

    fn query_format(&self, pattern: &str, locale: &Locale) -> Result<Option<FormatKey>, HostError> {
        let found = self
            .formats
            .iter()
            .position(|(p, l)| p == pattern && l == locale)
            .map(|i| FormatKey(i as i32));
        Ok(found)
    }

    fn add_format(&mut self, pattern: &str, locale: &Locale) -> Result<FormatKey, HostError> {
        if self.query_format(pattern, locale)?.is_some() {
            return Err(HostError(format!("number format '{}' already exists", pattern)));
        }
        self.formats.push((pattern.to_string(), locale.clone()));
        Ok(FormatKey(self.formats.len() as i32 - 1))
    }

    fn set_optimal_width(&mut self, columns: Range<usize>) -> Result<(), HostError> {
        self.optimal_width.extend(columns);
        Ok(())
    }
}
