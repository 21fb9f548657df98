//! Event records as handed to the export driver.
//!
//! An `Event` is a bag of attribute values keyed by the fixed schema in
//! [`crate::schema`]. Anything not set reads back as [`AttributeValue::Empty`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::schema::{Attribute, AttributeKind};

/// The value of one attribute on one event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttributeValue {
    #[default]
    Empty,
    Text(String),
    /// Date, time and UTC offset
    Instant(DateTime<FixedOffset>),
    Duration(TimeDelta),
    /// Unordered tags; kept sorted so every sink sees the same order
    Tags(BTreeSet<String>),
}

impl AttributeValue {
    /// Observed kind of the value, `None` for `Empty`.
    pub fn kind(&self) -> Option<AttributeKind> {
        match self {
            AttributeValue::Empty => None,
            AttributeValue::Text(_) => Some(AttributeKind::Text),
            AttributeValue::Instant(_) => Some(AttributeKind::Instant),
            AttributeValue::Duration(_) => Some(AttributeKind::Duration),
            AttributeValue::Tags(_) => Some(AttributeKind::TagSet),
        }
    }

    /// True for absent values and for present-but-blank ones: empty text,
    /// a zero duration or an empty tag set.
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Empty => true,
            AttributeValue::Text(s) => s.is_empty(),
            AttributeValue::Instant(_) => false,
            AttributeValue::Duration(d) => *d == TimeDelta::zero(),
            AttributeValue::Tags(tags) => tags.is_empty(),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        AttributeValue::Text(s.into())
    }

    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::Tags(tags.into_iter().map(Into::into).collect())
    }
}

impl From<DateTime<FixedOffset>> for AttributeValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        AttributeValue::Instant(dt)
    }
}

impl From<TimeDelta> for AttributeValue {
    fn from(d: TimeDelta) -> Self {
        AttributeValue::Duration(d)
    }
}

impl From<Option<String>> for AttributeValue {
    fn from(s: Option<String>) -> Self {
        s.map(AttributeValue::Text).unwrap_or_default()
    }
}

/// A calendar event (one output row)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    values: BTreeMap<Attribute, AttributeValue>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, attr: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.set(attr, value);
        self
    }

    pub fn set(&mut self, attr: Attribute, value: impl Into<AttributeValue>) {
        let value = value.into();
        if value == AttributeValue::Empty {
            self.values.remove(&attr);
        } else {
            self.values.insert(attr, value);
        }
    }

    pub fn get(&self, attr: Attribute) -> &AttributeValue {
        static EMPTY: AttributeValue = AttributeValue::Empty;
        self.values.get(&attr).unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_attribute_reads_empty() {
        let event = Event::new().with(Attribute::Name, AttributeValue::text("Standup"));
        assert_eq!(event.get(Attribute::Name), &AttributeValue::text("Standup"));
        assert_eq!(event.get(Attribute::Location), &AttributeValue::Empty);
    }

    #[test]
    fn test_setting_empty_clears() {
        let mut event = Event::new().with(Attribute::Uid, AttributeValue::text("abc"));
        event.set(Attribute::Uid, AttributeValue::Empty);
        assert_eq!(event, Event::new());
    }

    #[test]
    fn test_falsy_values_are_empty() {
        assert!(AttributeValue::Empty.is_empty());
        assert!(AttributeValue::text("").is_empty());
        assert!(AttributeValue::Duration(TimeDelta::zero()).is_empty());
        assert!(AttributeValue::tags(Vec::<String>::new()).is_empty());
        assert!(!AttributeValue::Duration(TimeDelta::minutes(1)).is_empty());
        assert!(!AttributeValue::text("x").is_empty());
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let value = AttributeValue::tags(["Work", "Urgent", "Work"]);
        match value {
            AttributeValue::Tags(tags) => assert_eq!(tags.len(), 2),
            other => panic!("Expected tags, got {:?}", other),
        }
    }
}
