use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An aircraft and its seat map. Capacity is the number of seats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plane {
    pub tail_number: String,
    pub seats: BTreeSet<String>,
}

impl Plane {
    pub fn new<I, S>(tail_number: impl Into<String>, seats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tail_number: tail_number.into(),
            seats: seats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.seats.len()
    }
}

/// A sold seat. Never changes after it is issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub flight_id: String,
    pub departure_time: DateTime<Utc>,
    pub seat_no: String,
    pub passenger_id: String,
    pub passenger_name: String,
    pub passenger_email: String,
}

/// A scheduled departure, identified by `(flight_id, departure_time)`.
///
/// Values are never edited in place: every change produces a new `Flight`
/// through one of the `with_*` / `cancelled` / `delayed_to` constructors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flight {
    pub flight_id: String,
    pub departure_time: DateTime<Utc>,
    pub is_cancelled: bool,
    pub actual_departure_time: DateTime<Utc>,
    pub check_in_number: Option<String>,
    pub gate_number: Option<String>,
    pub plane: Plane,
    pub tickets: BTreeMap<String, Ticket>,
}

impl Flight {
    pub fn new(flight_id: impl Into<String>, departure_time: DateTime<Utc>, plane: Plane) -> Self {
        Self {
            flight_id: flight_id.into(),
            departure_time,
            is_cancelled: false,
            actual_departure_time: departure_time,
            check_in_number: None,
            gate_number: None,
            plane,
            tickets: BTreeMap::new(),
        }
    }

    /// Identity check: both the flight number and the scheduled departure must match.
    pub fn matches(&self, flight_id: &str, departure_time: DateTime<Utc>) -> bool {
        self.flight_id == flight_id && self.departure_time == departure_time
    }

    pub fn is_full(&self) -> bool {
        self.tickets.len() == self.plane.capacity()
    }

    /// A flight accepts changes until it is cancelled or has actually departed.
    pub fn accepts_changes(&self, now: DateTime<Utc>) -> bool {
        !self.is_cancelled && now < self.actual_departure_time
    }

    /// Whether the flight belongs in the sellable schedule at `now`.
    pub fn is_sellable(&self, now: DateTime<Utc>, ticket_sale_end: TimeDelta) -> bool {
        !self.is_full() && !self.is_cancelled && now < self.actual_departure_time - ticket_sale_end
    }

    pub fn is_seat_free(&self, seat_no: &str) -> bool {
        self.plane.seats.contains(seat_no) && !self.tickets.contains_key(seat_no)
    }

    pub fn free_seats(&self) -> BTreeSet<String> {
        self.plane
            .seats
            .iter()
            .filter(|seat| !self.tickets.contains_key(*seat))
            .cloned()
            .collect()
    }

    pub fn with_ticket(&self, ticket: Ticket) -> Self {
        let mut tickets = self.tickets.clone();
        tickets.insert(ticket.seat_no.clone(), ticket);
        Self {
            tickets,
            ..self.clone()
        }
    }

    pub fn cancelled(&self) -> Self {
        Self {
            is_cancelled: true,
            ..self.clone()
        }
    }

    pub fn delayed_to(&self, actual_departure_time: DateTime<Utc>) -> Self {
        Self {
            actual_departure_time,
            ..self.clone()
        }
    }

    pub fn with_check_in_number(&self, check_in_number: impl Into<String>) -> Self {
        Self {
            check_in_number: Some(check_in_number.into()),
            ..self.clone()
        }
    }

    pub fn with_gate_number(&self, gate_number: impl Into<String>) -> Self {
        Self {
            gate_number: Some(gate_number.into()),
            ..self.clone()
        }
    }

    pub fn info(&self) -> FlightInfo {
        FlightInfo {
            flight_id: self.flight_id.clone(),
            departure_time: self.departure_time,
            is_cancelled: self.is_cancelled,
            actual_departure_time: self.actual_departure_time,
            check_in_number: self.check_in_number.clone(),
            gate_number: self.gate_number.clone(),
            plane: self.plane.clone(),
        }
    }
}

/// Read-only view of a [`Flight`] handed to external callers (no ticket data).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightInfo {
    pub flight_id: String,
    pub departure_time: DateTime<Utc>,
    pub is_cancelled: bool,
    pub actual_departure_time: DateTime<Utc>,
    pub check_in_number: Option<String>,
    pub gate_number: Option<String>,
    pub plane: Plane,
}

/// Snapshot shown on the airport departures board.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InformationDisplay {
    pub departing: Vec<FlightInfo>,
}
