//! The export driver: events × attributes into a sink.

use tracing::{debug, error, info};

use crate::error::{ExportError, ExportResult};
use crate::event::Event;
use crate::marshal::marshal;
use crate::schema::{Attribute, column_names};
use crate::sink::ExportSink;
use crate::source::EventSource;

/// Lifecycle of one export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    NotStarted,
    HeaderWritten,
    /// Data rows written so far
    RowWritten(usize),
    Finalized,
    Aborted,
}

impl ExportState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ExportState::Finalized | ExportState::Aborted)
    }
}

/// Summary of a finished export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub rows: usize,
    pub columns: usize,
}

/// Mutable state of one export run over one sink.
pub struct ExportJob<'s, S: ExportSink + ?Sized> {
    sink: &'s mut S,
    state: ExportState,
    row: usize,
    failures: usize,
}

impl<'s, S: ExportSink + ?Sized> ExportJob<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
            state: ExportState::NotStarted,
            row: 0,
            failures: 0,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// 1 if the run stopped on a field that could not be marshaled, else 0
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Write the header row (row 0).
    pub fn write_header(&mut self) -> ExportResult<()> {
        self.expect_state(ExportState::NotStarted);
        let result = self
            .sink
            .write_header(&column_names())
            .map_err(|e| ExportError::from_sink(e, None));
        self.advance(result, ExportState::HeaderWritten)
    }

    /// Marshal and write the event at position `index`, on row `index + 1`.
    pub fn write_event(&mut self, index: usize, event: &Event) -> ExportResult<()> {
        debug_assert!(matches!(
            self.state,
            ExportState::HeaderWritten | ExportState::RowWritten(_)
        ));
        let result = self.write_row(index, event);
        let rows = index + 1;
        self.advance(result, ExportState::RowWritten(rows))
    }

    /// Finalize the sink.
    pub fn finish(&mut self) -> ExportResult<ExportReport> {
        let rows = match self.state {
            ExportState::RowWritten(n) => n,
            _ => 0,
        };
        let result = self
            .sink
            .end_export()
            .map_err(|e| ExportError::from_sink(e, None));
        self.advance(result, ExportState::Finalized)?;

        Ok(ExportReport {
            rows,
            columns: Attribute::ALL.len(),
        })
    }

    fn write_row(&mut self, index: usize, event: &Event) -> ExportResult<()> {
        self.row = index + 1;
        let sink_err = |e| ExportError::from_sink(e, Some(index));

        self.sink.begin_row(self.row).map_err(sink_err)?;
        for attr in Attribute::ALL {
            let field = match marshal(attr, event.get(attr)) {
                Ok(field) => field,
                Err(e) => {
                    self.failures += 1;
                    return Err(ExportError::from_marshal(e, index));
                }
            };
            self.sink.write_field(attr.column(), &field).map_err(sink_err)?;
        }
        self.sink.end_row(self.row).map_err(sink_err)?;

        debug!(row = self.row, "row written");
        Ok(())
    }

    fn advance(&mut self, result: ExportResult<()>, next: ExportState) -> ExportResult<()> {
        match result {
            Ok(()) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, row = self.row, failures = self.failures, "export aborted");
                self.state = ExportState::Aborted;
                Err(e)
            }
        }
    }

    fn expect_state(&self, expected: ExportState) {
        debug_assert_eq!(self.state, expected, "export steps out of order");
    }
}

/// Export every event of `source` into `sink`.
///
/// Events are read in full before the sink is touched, so a source error
/// leaves the sink untouched. The first marshal or sink error aborts the
/// run; rows already written stay where they are.
pub fn export<E, S>(mut source: E, sink: &mut S) -> ExportResult<ExportReport>
where
    E: EventSource,
    S: ExportSink + ?Sized,
{
    let events = source.read_events().map_err(|e| {
        error!(error = %e, "could not read events");
        ExportError::from(e)
    })?;
    info!(events = events.len(), "starting export");

    let mut job = ExportJob::new(sink);
    job.write_header()?;
    for (index, event) in events.iter().enumerate() {
        job.write_event(index, event)?;
    }
    let report = job.finish()?;

    info!(rows = report.rows, "export finished");
    Ok(report)
}
