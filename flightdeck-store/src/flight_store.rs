use flightdeck_shared::Flight;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// An immutable copy of every flight, in creation order.
pub type FlightSnapshot = Arc<Vec<Flight>>;

/// Writer side of the flight list. There is exactly one, owned by the
/// command processor; every change replaces the whole snapshot at once so
/// readers see either the old list or the new one.
pub struct FlightStore {
    sender: watch::Sender<FlightSnapshot>,
}

impl FlightStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(Vec::new()));
        Self { sender }
    }

    pub fn snapshot(&self) -> FlightSnapshot {
        self.sender.borrow().clone()
    }

    pub fn reader(&self) -> FlightSnapshots {
        FlightSnapshots {
            receiver: self.sender.subscribe(),
        }
    }

    /// Position of the flight with the given identity in the current snapshot.
    pub fn position(&self, flight_id: &str, departure_time: chrono::DateTime<chrono::Utc>) -> Option<usize> {
        self.sender
            .borrow()
            .iter()
            .position(|flight| flight.matches(flight_id, departure_time))
    }

    /// Publish a snapshot with `flight` appended.
    pub fn append(&self, flight: Flight) {
        let mut flights = Vec::clone(&self.snapshot());
        flights.push(flight);
        self.publish(flights);
    }

    /// Publish a snapshot with the flight at `index` replaced by `flight`.
    pub fn replace(&self, index: usize, flight: Flight) {
        let mut flights = Vec::clone(&self.snapshot());
        if let Some(slot) = flights.get_mut(index) {
            *slot = flight;
            self.publish(flights);
        }
    }

    fn publish(&self, flights: Vec<Flight>) {
        debug!("Publishing flight snapshot with {} flights", flights.len());
        self.sender.send_replace(Arc::new(flights));
    }
}

impl Default for FlightStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only handle on the published snapshots. Cheap to clone.
#[derive(Clone)]
pub struct FlightSnapshots {
    receiver: watch::Receiver<FlightSnapshot>,
}

impl FlightSnapshots {
    pub fn current(&self) -> FlightSnapshot {
        self.receiver.borrow().clone()
    }

    /// Latest snapshot if one was published since the last call, otherwise `None`.
    /// Intermediate snapshots are skipped.
    pub fn latest_unseen(&mut self) -> Option<FlightSnapshot> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            _ => None,
        }
    }
}
