use flightdeck_core::{Clock, CoreError, CoreResult, EmailService};
use flightdeck_ops::{
    email_buffer, notification_queue, AlertScanner, AlertWindows, Command, CommandProcessor,
    DisplayProjector,
};
use flightdeck_shared::{AlertEvent, InformationDisplay};
use flightdeck_store::{AirlineConfig, FlightSnapshots, FlightStore};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::info;

use crate::views::{BookingView, ManagementView};

/// A running airline: the command processor, both notification pipelines
/// and the departures board, each on its own task.
///
/// Dropping the value (or calling [`Airline::shutdown`]) cancels every task.
/// Each command is applied with a single snapshot swap, so cancellation never
/// leaves a half-applied change behind.
pub struct Airline {
    config: AirlineConfig,
    clock: Arc<dyn Clock>,
    commands: mpsc::Sender<Command>,
    flights: FlightSnapshots,
    display: watch::Receiver<InformationDisplay>,
    tasks: JoinSet<()>,
}

impl Airline {
    /// Spawn all background tasks. Must be called from within a tokio runtime.
    pub fn start(
        config: AirlineConfig,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn EmailService>,
    ) -> CoreResult<Self> {
        config
            .validate()
            .map_err(|e| CoreError::InvalidConfig(e.to_string()))?;

        let store = FlightStore::new();
        let flights = store.reader();

        let (commands, command_queue) = mpsc::channel(config.command_queue_capacity);
        let (emails, email_worker) = email_buffer(config.email_queue_capacity);
        let (notifier, notification_worker) =
            notification_queue(config.notification_queue_capacity, emails.clone());
        let processor = CommandProcessor::new(
            store,
            command_queue,
            notifier,
            emails,
            clock.clone(),
            config.ticket_sale_end_time(),
        );
        let (projector, display) = DisplayProjector::new(flights.clone(), config.display_update_interval());

        let mut tasks = JoinSet::new();
        tasks.spawn(email_worker.run(transport));
        tasks.spawn(notification_worker.run());
        tasks.spawn(processor.run());
        tasks.spawn(projector.run());

        info!("Airline started");

        Ok(Self {
            config,
            clock,
            commands,
            flights,
            display,
            tasks,
        })
    }

    pub fn booking(&self) -> BookingView {
        BookingView::new(
            self.commands.clone(),
            self.flights.clone(),
            self.clock.clone(),
            self.config.ticket_sale_end_time(),
        )
    }

    pub fn management(&self) -> ManagementView {
        ManagementView::new(self.commands.clone())
    }

    /// The departures board, refreshed every display interval.
    pub fn information_display(&self) -> watch::Receiver<InformationDisplay> {
        self.display.clone()
    }

    /// Start a scanner feeding a new alert stream. The scanner stops when
    /// the stream is dropped.
    pub fn audio_alerts(&mut self) -> UnboundedReceiverStream<AlertEvent> {
        let (sink, alerts) = mpsc::unbounded_channel();
        let scanner = AlertScanner::new(
            self.flights.clone(),
            self.clock.clone(),
            AlertWindows::from_config(&self.config),
            self.config.audio_alerts_interval(),
        );
        self.tasks.spawn(scanner.run(sink));
        UnboundedReceiverStream::new(alerts)
    }

    pub async fn shutdown(mut self) {
        info!("Airline shutting down");
        self.tasks.shutdown().await;
    }
}
