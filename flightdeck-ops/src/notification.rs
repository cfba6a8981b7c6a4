use flightdeck_core::notices::ChangeNotice;
use flightdeck_core::{CoreError, CoreResult, EmailService};
use flightdeck_shared::Flight;
use futures_util::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::email_buffer::EmailSender;

/// One fan-out: tell every ticket holder of `flight` about `notice`.
/// `flight` is the snapshot taken before the change was applied.
#[derive(Debug, Clone)]
pub struct NotificationJob {
    pub flight: Flight,
    pub notice: ChangeNotice,
}

pub fn notification_queue(capacity: usize, emails: EmailSender) -> (PassengerNotifier, NotificationWorker) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        PassengerNotifier { tx },
        NotificationWorker { jobs: rx, emails },
    )
}

#[derive(Clone)]
pub struct PassengerNotifier {
    tx: mpsc::Sender<NotificationJob>,
}

impl PassengerNotifier {
    /// Queue a fan-out job. Waits only while the job queue is full.
    pub async fn notify_all(&self, flight: Flight, notice: ChangeNotice) -> CoreResult<()> {
        self.tx
            .send(NotificationJob { flight, notice })
            .await
            .map_err(|_| CoreError::QueueClosed("passenger notifications"))
    }
}

pub struct NotificationWorker {
    pub(crate) jobs: mpsc::Receiver<NotificationJob>,
    emails: EmailSender,
}

impl NotificationWorker {
    /// Process jobs strictly one after another. Within a job all messages
    /// are handed to the email buffer concurrently, and the next job starts
    /// only once every one of them has been queued.
    pub async fn run(mut self) {
        info!("Passenger notification worker started");

        while let Some(job) = self.jobs.recv().await {
            self.dispatch(job).await;
        }

        info!("Passenger notification worker stopped");
    }

    async fn dispatch(&self, job: NotificationJob) {
        let NotificationJob { flight, notice } = job;
        debug!(
            "Notifying {} passengers of flight {}",
            flight.tickets.len(),
            flight.flight_id
        );

        let sends = flight.tickets.values().map(|ticket| {
            let text = notice.render(ticket);
            let emails = &self.emails;
            async move { emails.send(&ticket.passenger_email, &text).await }
        });

        let failed = join_all(sends)
            .await
            .into_iter()
            .filter(|result| result.is_err())
            .count();
        if failed > 0 {
            warn!(
                "{} notices for flight {} could not be queued",
                failed, flight.flight_id
            );
        }
    }
}
