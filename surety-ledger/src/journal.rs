use surety_common::FlightEvent;
use tracing::debug;

/// Append-only log of protocol events. Readers keep their own cursor.
#[derive(Debug, Clone, Default)]
pub struct EventJournal {
    events: Vec<FlightEvent>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: FlightEvent) {
        debug!("journal[{}]: {:?}", self.events.len(), event);
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events appended at or after `cursor`.
    pub fn since(&self, cursor: usize) -> &[FlightEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlightEvent> {
        self.events.iter()
    }
}
