//! The fixed attribute schema shared by every export sink.
//!
//! Column `i` of the CSV file and column `i` of the worksheet always hold
//! `Attribute::ALL[i]`.

use std::fmt;

/// Semantic kind of an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Text,
    Instant,
    Duration,
    TagSet,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeKind::Text => "text",
            AttributeKind::Instant => "instant",
            AttributeKind::Duration => "duration",
            AttributeKind::TagSet => "tag-set",
        };
        f.write_str(s)
    }
}

/// An exported event attribute. Declaration order is column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Name,
    Begin,
    End,
    Duration,
    Uid,
    Description,
    Created,
    LastModified,
    Location,
    Url,
    Transparent,
    Alarms,
    Attendees,
    Categories,
    Status,
    Organizer,
    Classification,
}

impl Attribute {
    /// Every attribute, in column order.
    pub const ALL: [Attribute; 17] = [
        Attribute::Name,
        Attribute::Begin,
        Attribute::End,
        Attribute::Duration,
        Attribute::Uid,
        Attribute::Description,
        Attribute::Created,
        Attribute::LastModified,
        Attribute::Location,
        Attribute::Url,
        Attribute::Transparent,
        Attribute::Alarms,
        Attribute::Attendees,
        Attribute::Categories,
        Attribute::Status,
        Attribute::Organizer,
        Attribute::Classification,
    ];

    /// Column header name
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Begin => "begin",
            Attribute::End => "end",
            Attribute::Duration => "duration",
            Attribute::Uid => "uid",
            Attribute::Description => "description",
            Attribute::Created => "created",
            Attribute::LastModified => "last_modified",
            Attribute::Location => "location",
            Attribute::Url => "url",
            Attribute::Transparent => "transparent",
            Attribute::Alarms => "alarms",
            Attribute::Attendees => "attendees",
            Attribute::Categories => "categories",
            Attribute::Status => "status",
            Attribute::Organizer => "organizer",
            Attribute::Classification => "classification",
        }
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            Attribute::Begin | Attribute::End | Attribute::Created | Attribute::LastModified => {
                AttributeKind::Instant
            }
            Attribute::Duration => AttributeKind::Duration,
            Attribute::Alarms | Attribute::Attendees | Attribute::Categories => {
                AttributeKind::TagSet
            }
            _ => AttributeKind::Text,
        }
    }

    /// Zero-based column index of this attribute.
    pub fn column(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header row: attribute names in column order.
pub fn column_names() -> [&'static str; 17] {
    Attribute::ALL.map(Attribute::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_are_fixed() {
        assert_eq!(
            column_names(),
            [
                "name",
                "begin",
                "end",
                "duration",
                "uid",
                "description",
                "created",
                "last_modified",
                "location",
                "url",
                "transparent",
                "alarms",
                "attendees",
                "categories",
                "status",
                "organizer",
                "classification",
            ]
        );
    }

    #[test]
    fn test_column_matches_position_in_schema() {
        for (i, attr) in Attribute::ALL.iter().enumerate() {
            assert_eq!(attr.column(), i, "{} out of place", attr);
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Attribute::Begin.kind(), AttributeKind::Instant);
        assert_eq!(Attribute::LastModified.kind(), AttributeKind::Instant);
        assert_eq!(Attribute::Duration.kind(), AttributeKind::Duration);
        assert_eq!(Attribute::Categories.kind(), AttributeKind::TagSet);
        assert_eq!(Attribute::Organizer.kind(), AttributeKind::Text);
        assert_eq!(Attribute::Transparent.kind(), AttributeKind::Text);
    }
}
