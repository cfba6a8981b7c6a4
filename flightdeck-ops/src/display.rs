use flightdeck_shared::{Flight, InformationDisplay};
use flightdeck_store::FlightSnapshots;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Samples the flight snapshots at a fixed period and republishes them as
/// the departures board. Snapshots published between two samples collapse
/// into the latest one.
pub struct DisplayProjector {
    flights: FlightSnapshots,
    period: Duration,
    board: watch::Sender<InformationDisplay>,
}

impl DisplayProjector {
    /// The returned receiver already holds an empty board.
    pub fn new(flights: FlightSnapshots, period: Duration) -> (Self, watch::Receiver<InformationDisplay>) {
        let (board, receiver) = watch::channel(InformationDisplay::default());
        (
            Self {
                flights,
                period,
                board,
            },
            receiver,
        )
    }

    pub async fn run(mut self) {
        info!("Information display started, period {:?}", self.period);

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.board.closed() => break,
            }

            if let Some(snapshot) = self.flights.latest_unseen() {
                debug!("Refreshing display with {} flights", snapshot.len());
                self.board.send_replace(InformationDisplay {
                    departing: snapshot.iter().map(Flight::info).collect(),
                });
            }
        }

        info!("Information display stopped");
    }
}
