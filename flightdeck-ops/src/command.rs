use chrono::{DateTime, Utc};
use flightdeck_core::notices::ChangeNotice;
use flightdeck_shared::{Flight, Plane};

/// Every state-changing request. Consumed in arrival order by the
/// [`CommandProcessor`](crate::CommandProcessor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddFlight {
        flight_id: String,
        departure_time: DateTime<Utc>,
        plane: Plane,
    },
    BuyTicket {
        flight_id: String,
        departure_time: DateTime<Utc>,
        seat_no: String,
        passenger_id: String,
        passenger_name: String,
        passenger_email: String,
    },
    Cancel {
        flight_id: String,
        departure_time: DateTime<Utc>,
    },
    SetDelay {
        flight_id: String,
        departure_time: DateTime<Utc>,
        new_actual_departure_time: DateTime<Utc>,
    },
    SetCheckIn {
        flight_id: String,
        departure_time: DateTime<Utc>,
        value: String,
    },
    SetGate {
        flight_id: String,
        departure_time: DateTime<Utc>,
        value: String,
    },
}

impl Command {
    pub fn flight_id(&self) -> &str {
        match self {
            Command::AddFlight { flight_id, .. }
            | Command::BuyTicket { flight_id, .. }
            | Command::Cancel { flight_id, .. }
            | Command::SetDelay { flight_id, .. }
            | Command::SetCheckIn { flight_id, .. }
            | Command::SetGate { flight_id, .. } => flight_id,
        }
    }
}

/// Change to an existing flight that every ticket holder is told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightChange {
    Cancel,
    Delay(DateTime<Utc>),
    CheckIn(String),
    Gate(String),
}

impl FlightChange {
    /// Whether the change makes sense for `flight` beyond the common
    /// "not cancelled, not departed" guard. Delays only move forward.
    pub fn applies_to(&self, flight: &Flight) -> bool {
        match self {
            FlightChange::Delay(new_time) => *new_time > flight.actual_departure_time,
            FlightChange::Cancel | FlightChange::CheckIn(_) | FlightChange::Gate(_) => true,
        }
    }

    /// Notice text builder comparing the value in `before` with the new one.
    /// Delay notices quote the scheduled departure as the old time.
    pub fn notice(&self, before: &Flight) -> ChangeNotice {
        match self {
            FlightChange::Cancel => ChangeNotice::Cancelled,
            FlightChange::Delay(new_time) => ChangeNotice::changed(
                ChangeNotice::DEPARTURE_TIME,
                Some(&before.departure_time.to_rfc3339()),
                &new_time.to_rfc3339(),
            ),
            FlightChange::CheckIn(value) => ChangeNotice::changed(
                ChangeNotice::CHECK_IN_NUMBER,
                before.check_in_number.as_deref(),
                value,
            ),
            FlightChange::Gate(value) => ChangeNotice::changed(
                ChangeNotice::GATE_NUMBER,
                before.gate_number.as_deref(),
                value,
            ),
        }
    }

    pub fn apply(&self, before: &Flight) -> Flight {
        match self {
            FlightChange::Cancel => before.cancelled(),
            FlightChange::Delay(new_time) => before.delayed_to(*new_time),
            FlightChange::CheckIn(value) => before.with_check_in_number(value.clone()),
            FlightChange::Gate(value) => before.with_gate_number(value.clone()),
        }
    }
}
