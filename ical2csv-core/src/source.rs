//! Where the export driver gets its events from.

use crate::error::SourceError;
use crate::event::Event;

/// A finite, already-parsed sequence of events.
pub trait EventSource {
    fn read_events(&mut self) -> Result<Vec<Event>, SourceError>;
}

impl EventSource for Vec<Event> {
    fn read_events(&mut self) -> Result<Vec<Event>, SourceError> {
        Ok(std::mem::take(self))
    }
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn read_events(&mut self) -> Result<Vec<Event>, SourceError> {
        (**self).read_events()
    }
}
