use std::path::{Path, PathBuf};

use anyhow::Result;
use ical2csv_core::sink::CsvSink;
use ical2csv_core::{EventSource, ExportError, IcsSource, export};
use tracing::{error, info};

use crate::config::Config;

/// Convert `source` into a CSV file at `destination` (or `<source>.csv`).
pub fn run(source: &Path, destination: Option<PathBuf>, cfg: &Config) -> Result<()> {
    if !source.exists() {
        anyhow::bail!("iCalendar file not found: {}", source.display());
    }

    let destination = destination.unwrap_or_else(|| default_destination(source));
    let opts = cfg.export.csv_options()?;

    match convert(source, &destination, opts) {
        Ok(rows) => {
            info!(rows, path = %destination.display(), "CSV file written");
            Ok(())
        }
        Err(e) => {
            error!("{}", describe(&e));
            error!("{}", e);
            Err(e.into())
        }
    }
}

fn convert(
    source: &Path,
    destination: &Path,
    opts: ical2csv_core::sink::CsvOptions,
) -> Result<usize, ExportError> {
    // Read first so a bad source never truncates an existing destination.
    let events = IcsSource::from_path(source)
        .read_events()
        .map_err(ExportError::from)?;

    info!(path = %destination.display(), "Writing to CSV file");
    let mut sink =
        CsvSink::create(destination, opts).map_err(|e| ExportError::from_sink(e, None))?;
    let report = export(events, &mut sink)?;
    Ok(report.rows)
}

/// `<source>.csv`, keeping the original extension
pub fn default_destination(source: &Path) -> PathBuf {
    let mut path = source.as_os_str().to_os_string();
    path.push(".csv");
    PathBuf::from(path)
}

fn describe(err: &ExportError) -> &'static str {
    match err {
        ExportError::SourceDecoding(_) => "Error while reading file.",
        ExportError::MultiCalendarUnsupported(_) => {
            "iCalendar file contains multiple calendars. This is currently not supported."
        }
        ExportError::SourceMalformed(_) => "iCalendar file not valid.",
        ExportError::SourceUnreadable(_) => "iCalendar file could not be read.",
        ExportError::UnsupportedAttributeKind { .. } => {
            "iCalendar file contains a value that cannot be exported."
        }
        ExportError::SinkUnavailable { .. } | ExportError::SinkWriteFailed { .. } => {
            "CSV file could not be written."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDAR: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:standup-1\r\n\
SUMMARY:Standup\r\n\
DTSTART:20240102T090000Z\r\n\
DURATION:PT30M\r\n\
CATEGORIES:Work,Urgent\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_default_destination_appends_csv() {
        assert_eq!(
            default_destination(Path::new("/tmp/team.ics")),
            PathBuf::from("/tmp/team.ics.csv")
        );
        assert_eq!(default_destination(Path::new("cal")), PathBuf::from("cal.csv"));
    }

    #[test]
    fn test_run_writes_csv_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("team.ics");
        std::fs::write(&source, CALENDAR).unwrap();

        run(&source, None, &Config::default()).unwrap();

        let out = std::fs::read_to_string(dir.path().join("team.ics.csv")).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("name,begin,end,duration,uid,"));
        assert_eq!(
            lines[1],
            "Standup,02.01.2024 09:00:00,02.01.2024 09:30:00,0:30:00,standup-1,,,,,,,,,\"Urgent, Work\",,,"
        );
    }

    #[test]
    fn test_run_honours_explicit_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("team.ics");
        let destination = dir.path().join("out.csv");
        std::fs::write(&source, CALENDAR).unwrap();

        run(&source, Some(destination.clone()), &Config::default()).unwrap();

        assert!(destination.exists());
        assert!(!dir.path().join("team.ics.csv").exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("missing.ics"), None, &Config::default()).is_err());
    }

    #[test]
    fn test_bad_source_leaves_destination_alone() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("double.ics");
        let destination = dir.path().join("keep.csv");
        std::fs::write(&source, format!("{}{}", CALENDAR, CALENDAR)).unwrap();
        std::fs::write(&destination, "previous contents\n").unwrap();

        let err = run(&source, Some(destination.clone()), &Config::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ExportError>(),
            Some(ExportError::MultiCalendarUnsupported(2))
        ));
        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "previous contents\n"
        );
    }

    #[test]
    fn test_describe_covers_source_errors() {
        assert_eq!(
            describe(&ExportError::SourceMalformed("x".into())),
            "iCalendar file not valid."
        );
        assert_eq!(
            describe(&ExportError::MultiCalendarUnsupported(3)),
            "iCalendar file contains multiple calendars. This is currently not supported."
        );
    }
}
