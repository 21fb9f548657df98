//! Conversion of attribute values into sink-neutral display strings.
//!
//! Every sink shares this one conversion, so a CSV cell and the matching
//! worksheet cell always carry the same text.

use chrono::TimeDelta;

use crate::error::MarshalError;
use crate::event::AttributeValue;
use crate::schema::{Attribute, AttributeKind};

/// Display pattern for instants (day.month.year, 24h clock)
pub const INSTANT_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Native number format for date-time cells, German locale keywords
pub const DATETIME_PATTERN: &str = "TT.MM.JJJJ HH:MM:SS";

/// Native number format for duration cells
pub const DURATION_PATTERN: &str = "HH:MM:SS";

/// Separator placed between members of a tag set
pub const TAG_SEPARATOR: &str = ", ";

/// Hint telling typed sinks which native cell format to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatKind {
    #[default]
    None,
    DateTime,
    Duration,
}

impl FormatKind {
    /// Locale-specific number format pattern, if any.
    pub fn pattern(self) -> Option<&'static str> {
        match self {
            FormatKind::None => None,
            FormatKind::DateTime => Some(DATETIME_PATTERN),
            FormatKind::Duration => Some(DURATION_PATTERN),
        }
    }
}

/// One converted (event, attribute) pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarshaledField {
    pub text: String,
    pub format: FormatKind,
}

impl MarshaledField {
    fn plain(text: String) -> Self {
        Self {
            text,
            format: FormatKind::None,
        }
    }
}

/// Convert `value` for the column `attr`.
///
/// Empty values always yield an empty, unformatted field, whatever the
/// column kind. Otherwise the value's kind must match the column's kind.
pub fn marshal(attr: Attribute, value: &AttributeValue) -> Result<MarshaledField, MarshalError> {
    if value.is_empty() {
        return Ok(MarshaledField::default());
    }

    let field = match (attr.kind(), value) {
        (AttributeKind::Text, AttributeValue::Text(s)) => MarshaledField::plain(s.clone()),
        (AttributeKind::Instant, AttributeValue::Instant(dt)) => MarshaledField {
            text: dt.format(INSTANT_FORMAT).to_string(),
            format: FormatKind::DateTime,
        },
        (AttributeKind::Duration, AttributeValue::Duration(d)) => MarshaledField {
            text: format_duration(*d),
            format: FormatKind::Duration,
        },
        (AttributeKind::TagSet, AttributeValue::Tags(tags)) => {
            let joined = tags
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(TAG_SEPARATOR);
            MarshaledField::plain(joined)
        }
        (expected, other) => {
            return Err(MarshalError::UnsupportedAttributeKind {
                attribute: attr.name(),
                expected,
                // is_empty() above rules out the one kind-less value
                observed: other.kind().unwrap_or(expected),
            });
        }
    };

    Ok(field)
}

/// Render a duration as `[-]H:MM:SS`. Hours are not wrapped at 24 and
/// sub-second precision is dropped.
pub fn format_duration(d: TimeDelta) -> String {
    let sign = if d < TimeDelta::zero() { "-" } else { "" };
    let secs = d.num_seconds().unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}
