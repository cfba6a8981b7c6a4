use chrono::{DateTime, TimeDelta, Utc};
use flightdeck_core::Clock;
use flightdeck_shared::{AlertEvent, Flight};
use flightdeck_store::{AirlineConfig, FlightSnapshots};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// How long each announcement window stays open.
pub const ALERT_LEAD: TimeDelta = TimeDelta::minutes(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertKind {
    RegistrationOpen,
    RegistrationClosing,
    BoardingOpened,
    BoardingClosing,
}

/// A window that opens `offset` before a flight's actual departure and
/// stays open for [`ALERT_LEAD`].
#[derive(Debug, Clone, Copy)]
struct AlertWindow {
    kind: AlertKind,
    offset: TimeDelta,
}

impl AlertWindow {
    fn contains(&self, now: DateTime<Utc>, actual_departure_time: DateTime<Utc>) -> bool {
        let elapsed = now - (actual_departure_time - self.offset);
        elapsed >= TimeDelta::zero() && elapsed <= ALERT_LEAD
    }

    fn event(&self, flight: &Flight) -> AlertEvent {
        let flight_id = flight.flight_id.clone();
        let check_in_number = || flight.check_in_number.clone().unwrap_or_default();
        let gate_number = || flight.gate_number.clone().unwrap_or_default();
        match self.kind {
            AlertKind::RegistrationOpen => AlertEvent::RegistrationOpen {
                flight_id,
                check_in_number: check_in_number(),
            },
            AlertKind::RegistrationClosing => AlertEvent::RegistrationClosing {
                flight_id,
                check_in_number: check_in_number(),
            },
            AlertKind::BoardingOpened => AlertEvent::BoardingOpened {
                flight_id,
                gate_number: gate_number(),
            },
            AlertKind::BoardingClosing => AlertEvent::BoardingClosing {
                flight_id,
                gate_number: gate_number(),
            },
        }
    }
}

/// The four announcement windows. Opening windows start at their anchor;
/// closing windows start one lead earlier so they end exactly at the anchor.
#[derive(Debug, Clone)]
pub struct AlertWindows {
    windows: [AlertWindow; 4],
}

impl AlertWindows {
    pub fn new(
        registration_opening: TimeDelta,
        registration_closing: TimeDelta,
        boarding_opening: TimeDelta,
        boarding_closing: TimeDelta,
    ) -> Self {
        Self {
            windows: [
                AlertWindow {
                    kind: AlertKind::RegistrationOpen,
                    offset: registration_opening,
                },
                AlertWindow {
                    kind: AlertKind::RegistrationClosing,
                    offset: registration_closing + ALERT_LEAD,
                },
                AlertWindow {
                    kind: AlertKind::BoardingOpened,
                    offset: boarding_opening,
                },
                AlertWindow {
                    kind: AlertKind::BoardingClosing,
                    offset: boarding_closing + ALERT_LEAD,
                },
            ],
        }
    }

    pub fn from_config(config: &AirlineConfig) -> Self {
        Self::new(
            config.registration_opening_time(),
            config.registration_closing_time(),
            config.boarding_opening_time(),
            config.boarding_closing_time(),
        )
    }
}

/// Every alert active at `now` for the non-cancelled flights in `flights`.
/// No memory between calls: an alert repeats for as long as its window is open.
pub fn scan_flights(flights: &[Flight], now: DateTime<Utc>, windows: &AlertWindows) -> Vec<AlertEvent> {
    flights
        .iter()
        .filter(|flight| !flight.is_cancelled)
        .flat_map(|flight| {
            windows
                .windows
                .iter()
                .filter(move |window| window.contains(now, flight.actual_departure_time))
                .map(move |window| window.event(flight))
        })
        .collect()
}

/// Periodic task that scans the latest flight snapshot for active alerts.
pub struct AlertScanner {
    flights: FlightSnapshots,
    clock: Arc<dyn Clock>,
    windows: AlertWindows,
    period: Duration,
}

impl AlertScanner {
    pub fn new(flights: FlightSnapshots, clock: Arc<dyn Clock>, windows: AlertWindows, period: Duration) -> Self {
        Self {
            flights,
            clock,
            windows,
            period,
        }
    }

    /// Scan once per period, starting one period from now, until `sink`
    /// has no listener left.
    pub async fn run(self, sink: mpsc::UnboundedSender<AlertEvent>) {
        info!("Audio alert scanner started, period {:?}", self.period);

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = sink.closed() => break,
            }

            let flights = self.flights.current();
            for alert in scan_flights(&flights, self.clock.now(), &self.windows) {
                debug!("Alert {:?}", alert);
                if sink.send(alert).is_err() {
                    break;
                }
            }
        }

        info!("Audio alert scanner stopped");
    }
}
