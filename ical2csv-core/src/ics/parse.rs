//! VEVENT to `Event` mapping on top of the icalendar crate's parser.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::event::{AttributeValue, Event};
use crate::schema::Attribute;

/// Parse a single-calendar ICS document into events, in source order.
pub fn parse_events(content: &str) -> Result<Vec<Event>, SourceError> {
    let unfolded = unfold(content);

    let calendars = unfolded
        .lines()
        .filter(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR"))
        .count();
    match calendars {
        0 => return Err(SourceError::Malformed("no VCALENDAR found".into())),
        1 => {}
        n => return Err(SourceError::MultiCalendar(n)),
    }

    let calendar = read_calendar(&unfolded).map_err(SourceError::Malformed)?;

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    Ok(vevents.into_iter().map(to_event).collect())
}

/// VEVENTs at any depth, depth-first in document order
fn collect_vevents<'a, 'c>(components: &'c [Component<'a>], out: &mut Vec<&'c Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        } else {
            collect_vevents(&component.components, out);
        }
    }
}

fn to_event(vevent: &Component<'_>) -> Event {
    let text = |name: &str| -> AttributeValue {
        vevent
            .find_prop(name)
            .map(|p| unescape_text(p.val.as_ref()))
            .into()
    };
    let instant = |name: &str| -> AttributeValue {
        vevent.find_prop(name).map(parse_instant).unwrap_or_default()
    };

    let begin = instant("DTSTART");
    let mut end = instant("DTEND");
    let mut duration = vevent
        .find_prop("DURATION")
        .map(|p| match parse_duration(p.val.as_ref()) {
            Some(d) => AttributeValue::Duration(d),
            None => AttributeValue::text(p.val.to_string()),
        })
        .unwrap_or_default();

    // DTEND and DURATION are alternatives; fill in whichever is missing.
    match (&begin, &end, &duration) {
        (AttributeValue::Instant(b), AttributeValue::Empty, AttributeValue::Duration(d)) => {
            match b.checked_add_signed(*d) {
                Some(e) => end = AttributeValue::Instant(e),
                None => warn!(begin = %b, "DTSTART + DURATION out of range, leaving end empty"),
            }
        }
        (AttributeValue::Instant(b), AttributeValue::Instant(e), AttributeValue::Empty) => {
            duration = AttributeValue::Duration(e.signed_duration_since(*b));
        }
        _ => {}
    }

    let alarms: BTreeSet<String> = vevent
        .components
        .iter()
        .filter(|c| c.name == "VALARM")
        .filter_map(|alarm| alarm.find_prop("TRIGGER"))
        .map(|p| p.val.to_string())
        .collect();

    let attendees: BTreeSet<String> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "ATTENDEE")
        .map(format_participant)
        .collect();

    let categories: BTreeSet<String> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "CATEGORIES")
        .flat_map(|p| split_list(p.val.as_ref()))
        .collect();

    let event = Event::new()
        .with(Attribute::Name, text("SUMMARY"))
        .with(Attribute::Begin, begin)
        .with(Attribute::End, end)
        .with(Attribute::Duration, duration)
        .with(Attribute::Uid, text("UID"))
        .with(Attribute::Description, text("DESCRIPTION"))
        .with(Attribute::Created, instant("CREATED"))
        .with(Attribute::LastModified, instant("LAST-MODIFIED"))
        .with(Attribute::Location, text("LOCATION"))
        .with(Attribute::Url, text("URL"))
        .with(Attribute::Transparent, text("TRANSP"))
        .with(Attribute::Alarms, AttributeValue::Tags(alarms))
        .with(Attribute::Attendees, AttributeValue::Tags(attendees))
        .with(Attribute::Categories, AttributeValue::Tags(categories))
        .with(Attribute::Status, text("STATUS"))
        .with(
            Attribute::Organizer,
            vevent.find_prop("ORGANIZER").map(format_participant),
        )
        .with(Attribute::Classification, text("CLASS"));

    debug!(uid = ?event.get(Attribute::Uid), "parsed VEVENT");
    event
}

/// Date-valued property as an instant. Values the parser cannot read are
/// kept as raw text.
fn parse_instant(prop: &Property<'_>) -> AttributeValue {
    match DatePerhapsTime::try_from(prop) {
        Ok(dpt) => AttributeValue::Instant(to_instant(dpt)),
        Err(_) => {
            warn!(property = %prop.name, value = %prop.val, "unreadable date value");
            AttributeValue::text(prop.val.to_string())
        }
    }
}

/// Floating and all-day values are read as UTC wall-clock time.
fn to_instant(dpt: DatePerhapsTime) -> DateTime<FixedOffset> {
    match dpt {
        DatePerhapsTime::Date(d) => d.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.fixed_offset(),
            CalendarDateTime::Floating(naive) => naive.and_utc().fixed_offset(),
            CalendarDateTime::WithTimezone { date_time, tzid } => in_zone(date_time, &tzid),
        },
    }
}

fn in_zone(local: NaiveDateTime, tzid: &str) -> DateTime<FixedOffset> {
    let tz = match tzid.parse::<chrono_tz::Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(tzid, "unknown time zone, reading as UTC");
            return local.and_utc().fixed_offset();
        }
    };

    match tz.from_local_datetime(&local).earliest() {
        Some(dt) => dt.fixed_offset(),
        None => {
            warn!(tzid, %local, "local time does not exist in zone, reading as UTC");
            local.and_utc().fixed_offset()
        }
    }
}

/// Parse an ISO 8601 duration with optional sign (`PT30M`, `-P1D`).
pub(crate) fn parse_duration(value: &str) -> Option<TimeDelta> {
    let value = value.trim();
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let duration = iso8601::duration(unsigned).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let delta = TimeDelta::from_std(std_duration).ok()?;

    Some(if negative { -delta } else { delta })
}

/// ATTENDEE/ORGANIZER as `Name <address>` or the bare address.
fn format_participant(prop: &Property<'_>) -> String {
    let address: &str = prop.val.as_ref();
    let address = address
        .strip_prefix("mailto:")
        .or_else(|| address.strip_prefix("MAILTO:"))
        .unwrap_or(address);

    let name = prop
        .params
        .iter()
        .find(|p| p.key == "CN")
        .and_then(|p| p.val.as_ref())
        .map(|v| v.to_string().trim_matches('"').to_string());

    match name {
        Some(name) if !name.is_empty() => format!("{} <{}>", name, address),
        _ => address.to_string(),
    }
}

/// Split a comma-separated TEXT list, honouring `\,` escapes.
fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .iter()
        .map(|item| unescape_text(item.trim()))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Undo RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
