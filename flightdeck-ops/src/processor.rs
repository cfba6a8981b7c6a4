use chrono::{DateTime, TimeDelta, Utc};
use flightdeck_core::notices::{purchase_notice, PurchaseOutcome};
use flightdeck_core::{Clock, Email};
use flightdeck_shared::{Flight, Plane, Ticket};
use flightdeck_store::FlightStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::command::{Command, FlightChange};
use crate::email_buffer::EmailSender;
use crate::notification::PassengerNotifier;

/// The only writer of flight state.
///
/// Commands are taken off the queue one at a time and fully applied before
/// the next one is looked at. Commands that cannot apply (unknown flight,
/// cancelled, already departed) are dropped without any feedback, except
/// ticket purchases, whose buyer always gets exactly one e-mail.
pub struct CommandProcessor {
    store: FlightStore,
    commands: mpsc::Receiver<Command>,
    notifier: PassengerNotifier,
    emails: EmailSender,
    clock: Arc<dyn Clock>,
    ticket_sale_end: TimeDelta,
}

impl CommandProcessor {
    pub fn new(
        store: FlightStore,
        commands: mpsc::Receiver<Command>,
        notifier: PassengerNotifier,
        emails: EmailSender,
        clock: Arc<dyn Clock>,
        ticket_sale_end: TimeDelta,
    ) -> Self {
        Self {
            store,
            commands,
            notifier,
            emails,
            clock,
            ticket_sale_end,
        }
    }

    pub async fn run(mut self) {
        info!("Command processor started");

        while let Some(command) = self.commands.recv().await {
            self.apply(command).await;
        }

        info!("Command processor stopped");
    }

    pub async fn apply(&mut self, command: Command) {
        debug!("Applying command for flight {}", command.flight_id());

        match command {
            Command::AddFlight {
                flight_id,
                departure_time,
                plane,
            } => self.add_flight(flight_id, departure_time, plane),
            Command::BuyTicket {
                flight_id,
                departure_time,
                seat_no,
                passenger_id,
                passenger_name,
                passenger_email,
            } => {
                let ticket = Ticket {
                    flight_id,
                    departure_time,
                    seat_no,
                    passenger_id,
                    passenger_name,
                    passenger_email,
                };
                self.buy_ticket(ticket).await
            }
            Command::Cancel {
                flight_id,
                departure_time,
            } => {
                self.change_flight(&flight_id, departure_time, FlightChange::Cancel)
                    .await
            }
            Command::SetDelay {
                flight_id,
                departure_time,
                new_actual_departure_time,
            } => {
                self.change_flight(
                    &flight_id,
                    departure_time,
                    FlightChange::Delay(new_actual_departure_time),
                )
                .await
            }
            Command::SetCheckIn {
                flight_id,
                departure_time,
                value,
            } => {
                self.change_flight(&flight_id, departure_time, FlightChange::CheckIn(value))
                    .await
            }
            Command::SetGate {
                flight_id,
                departure_time,
                value,
            } => {
                self.change_flight(&flight_id, departure_time, FlightChange::Gate(value))
                    .await
            }
        }
    }

    fn add_flight(&mut self, flight_id: String, departure_time: DateTime<Utc>, plane: Plane) {
        if self.store.position(&flight_id, departure_time).is_some() {
            debug!("Flight {} at {} already scheduled, ignoring", flight_id, departure_time);
            return;
        }

        info!("Scheduling flight {} at {}", flight_id, departure_time);
        self.store.append(Flight::new(flight_id, departure_time, plane));
    }

    async fn buy_ticket(&mut self, ticket: Ticket) {
        let now = self.clock.now();
        let snapshot = self.store.snapshot();
        let target = snapshot.iter().position(|flight| {
            flight.matches(&ticket.flight_id, ticket.departure_time)
                && flight.is_sellable(now, self.ticket_sale_end)
                && flight.is_seat_free(&ticket.seat_no)
        });

        let outcome = match target {
            Some(index) => {
                let updated = snapshot[index].with_ticket(ticket.clone());
                self.store.replace(index, updated);
                info!("Sold seat {} on flight {}", ticket.seat_no, ticket.flight_id);
                PurchaseOutcome::Succeeded
            }
            None => {
                debug!(
                    "Seat {} on flight {} is not for sale",
                    ticket.seat_no, ticket.flight_id
                );
                PurchaseOutcome::Failed
            }
        };

        let text = purchase_notice(
            outcome,
            &ticket.passenger_name,
            &ticket.passenger_id,
            &ticket.seat_no,
            &ticket.flight_id,
        );
        if let Err(e) = self.emails.enqueue(Email::new(ticket.passenger_email, text)).await {
            warn!("Purchase notice for flight {} dropped: {}", ticket.flight_id, e);
        }
    }

    async fn change_flight(&mut self, flight_id: &str, departure_time: DateTime<Utc>, change: FlightChange) {
        let Some(index) = self.store.position(flight_id, departure_time) else {
            debug!("No flight {} at {}, ignoring {:?}", flight_id, departure_time, change);
            return;
        };

        let before = self.store.snapshot()[index].clone();
        if !before.accepts_changes(self.clock.now()) || !change.applies_to(&before) {
            debug!("Flight {} no longer accepts {:?}", flight_id, change);
            return;
        }

        let updated = change.apply(&before);
        let notice = change.notice(&before);
        if let Err(e) = self.notifier.notify_all(before, notice).await {
            warn!("Notices for flight {} dropped: {}", flight_id, e);
        }

        self.store.replace(index, updated);
    }
}
