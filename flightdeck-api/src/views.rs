use chrono::{DateTime, TimeDelta, Utc};
use flightdeck_core::{Clock, CoreError, CoreResult};
use flightdeck_ops::Command;
use flightdeck_shared::{FlightInfo, Plane};
use flightdeck_store::FlightSnapshots;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc;

async fn submit(commands: &mpsc::Sender<Command>, command: Command) -> CoreResult<()> {
    commands
        .send(command)
        .await
        .map_err(|_| CoreError::QueueClosed("commands"))
}

/// Passenger-facing side: the sellable schedule, seat maps, and purchases.
#[derive(Clone)]
pub struct BookingView {
    commands: mpsc::Sender<Command>,
    flights: FlightSnapshots,
    clock: Arc<dyn Clock>,
    ticket_sale_end: TimeDelta,
}

impl BookingView {
    pub(crate) fn new(
        commands: mpsc::Sender<Command>,
        flights: FlightSnapshots,
        clock: Arc<dyn Clock>,
        ticket_sale_end: TimeDelta,
    ) -> Self {
        Self {
            commands,
            flights,
            clock,
            ticket_sale_end,
        }
    }

    /// Flights still on sale, in the order they were scheduled.
    pub fn flight_schedule(&self) -> Vec<FlightInfo> {
        let now = self.clock.now();
        self.flights
            .current()
            .iter()
            .filter(|flight| flight.is_sellable(now, self.ticket_sale_end))
            .map(|flight| flight.info())
            .collect()
    }

    /// Unsold seats of the flight, or an empty set if there is no such flight.
    pub fn free_seats(&self, flight_id: &str, departure_time: DateTime<Utc>) -> BTreeSet<String> {
        self.flights
            .current()
            .iter()
            .find(|flight| flight.matches(flight_id, departure_time))
            .map(|flight| flight.free_seats())
            .unwrap_or_default()
    }

    /// Request a seat. The outcome arrives only as an e-mail to `passenger_email`.
    pub async fn buy_ticket(
        &self,
        flight_id: &str,
        departure_time: DateTime<Utc>,
        seat_no: &str,
        passenger_id: &str,
        passenger_name: &str,
        passenger_email: &str,
    ) -> CoreResult<()> {
        submit(
            &self.commands,
            Command::BuyTicket {
                flight_id: flight_id.to_string(),
                departure_time,
                seat_no: seat_no.to_string(),
                passenger_id: passenger_id.to_string(),
                passenger_name: passenger_name.to_string(),
                passenger_email: passenger_email.to_string(),
            },
        )
        .await
    }
}

/// Operations side. Every call only queues a command; requests that turn
/// out not to apply are ignored by the processor.
#[derive(Clone)]
pub struct ManagementView {
    commands: mpsc::Sender<Command>,
}

impl ManagementView {
    pub(crate) fn new(commands: mpsc::Sender<Command>) -> Self {
        Self { commands }
    }

    pub async fn schedule_flight(&self, flight_id: &str, departure_time: DateTime<Utc>, plane: Plane) -> CoreResult<()> {
        submit(
            &self.commands,
            Command::AddFlight {
                flight_id: flight_id.to_string(),
                departure_time,
                plane,
            },
        )
        .await
    }

    pub async fn delay_flight(
        &self,
        flight_id: &str,
        departure_time: DateTime<Utc>,
        actual_departure_time: DateTime<Utc>,
    ) -> CoreResult<()> {
        submit(
            &self.commands,
            Command::SetDelay {
                flight_id: flight_id.to_string(),
                departure_time,
                new_actual_departure_time: actual_departure_time,
            },
        )
        .await
    }

    pub async fn cancel_flight(&self, flight_id: &str, departure_time: DateTime<Utc>) -> CoreResult<()> {
        submit(
            &self.commands,
            Command::Cancel {
                flight_id: flight_id.to_string(),
                departure_time,
            },
        )
        .await
    }

    pub async fn set_check_in_number(
        &self,
        flight_id: &str,
        departure_time: DateTime<Utc>,
        check_in_number: &str,
    ) -> CoreResult<()> {
        submit(
            &self.commands,
            Command::SetCheckIn {
                flight_id: flight_id.to_string(),
                departure_time,
                value: check_in_number.to_string(),
            },
        )
        .await
    }

    pub async fn set_gate_number(&self, flight_id: &str, departure_time: DateTime<Utc>, gate_number: &str) -> CoreResult<()> {
        submit(
            &self.commands,
            Command::SetGate {
                flight_id: flight_id.to_string(),
                departure_time,
                value: gate_number.to_string(),
            },
        )
        .await
    }
}
