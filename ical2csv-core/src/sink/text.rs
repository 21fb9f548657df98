//! Delimited text (CSV) sink.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ExportSink;
use crate::error::SinkError;
use crate::marshal::MarshaledField;

/// Writer settings for the CSV sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Writes one CSV record per row. Fields are quoted only when needed and
/// records end with `\n`.
pub struct CsvSink<W: Write> {
    w: csv::Writer<W>,
    finished: bool,
}

impl CsvSink<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>, opts: CsvOptions) -> Result<Self, SinkError> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file), opts))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W, opts: CsvOptions) -> Self {
        let w = csv::WriterBuilder::new()
            .delimiter(opts.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(inner);
        Self { w, finished: false }
    }

    /// Recover the underlying writer, flushing anything still buffered.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.w.into_inner().map_err(|e| {
            let err = e.error();
            SinkError::WriteFailed(std::io::Error::new(err.kind(), err.to_string()))
        })
    }

    fn ensure_open(&self) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Unavailable("CSV output already closed".into()));
        }
        Ok(())
    }
}

impl<W: Write> ExportSink for CsvSink<W> {
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.w.write_record(columns)?;
        Ok(())
    }

    fn write_field(&mut self, _column: usize, field: &MarshaledField) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.w.write_field(&field.text)?;
        Ok(())
    }

    fn end_row(&mut self, _row: usize) -> Result<(), SinkError> {
        self.ensure_open()?;
        // An empty record terminates the fields written so far.
        self.w.write_record(None::<&[u8]>)?;
        Ok(())
    }

    fn end_export(&mut self) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.w.flush()?;
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::FormatKind;

    fn field(text: &str) -> MarshaledField {
        MarshaledField {
            text: text.to_string(),
            format: FormatKind::None,
        }
    }

    fn output(sink: CsvSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_rows_are_newline_terminated() {
        let mut sink = CsvSink::new(Vec::new(), CsvOptions::default());
        sink.write_header(&["a", "b"]).unwrap();
        sink.begin_row(1).unwrap();
        sink.write_field(0, &field("1")).unwrap();
        sink.write_field(1, &field("")).unwrap();
        sink.end_row(1).unwrap();
        sink.end_export().unwrap();

        assert_eq!(output(sink), "a,b\n1,\n");
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let mut sink = CsvSink::new(Vec::new(), CsvOptions::default());
        sink.write_field(0, &field("Work, Urgent")).unwrap();
        sink.write_field(1, &field("say \"hi\"")).unwrap();
        sink.write_field(2, &field("line\nbreak")).unwrap();
        sink.end_row(1).unwrap();

        assert_eq!(
            output(sink),
            "\"Work, Urgent\",\"say \"\"hi\"\"\",\"line\nbreak\"\n"
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let mut sink = CsvSink::new(Vec::new(), CsvOptions { delimiter: b';' });
        sink.write_header(&["x", "y"]).unwrap();
        sink.write_field(0, &field("a,b")).unwrap();
        sink.write_field(1, &field("c")).unwrap();
        sink.end_row(1).unwrap();

        assert_eq!(output(sink), "x;y\na,b;c\n");
    }

    #[test]
    fn test_writes_after_close_fail() {
        let mut sink = CsvSink::new(Vec::new(), CsvOptions::default());
        sink.end_export().unwrap();
        let err = sink.write_field(0, &field("late")).unwrap_err();
        assert!(matches!(err, SinkError::Unavailable(_)));
    }

    #[test]
    fn test_create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::create(&path, CsvOptions::default()).unwrap();
        sink.write_header(&["name"]).unwrap();
        sink.end_export().unwrap();
        drop(sink);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name\n");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = CsvSink::create(&path, CsvOptions::default()).err().unwrap();
        assert!(matches!(err, SinkError::WriteFailed(_)));
    }
}
