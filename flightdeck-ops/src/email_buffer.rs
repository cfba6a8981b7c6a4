use async_trait::async_trait;
use flightdeck_core::{CoreError, CoreResult, Email, EmailService};
use flightdeck_shared::Masked;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Create a bounded mail queue in front of the real transport.
///
/// Producers get a cloneable [`EmailSender`]; the returned worker must be
/// run (usually on its own task) to drain the queue into the transport.
pub fn email_buffer(capacity: usize) -> (EmailSender, EmailBufferWorker) {
    let (tx, rx) = mpsc::channel(capacity);
    (EmailSender { tx }, EmailBufferWorker { queue: rx })
}

#[derive(Clone)]
pub struct EmailSender {
    tx: mpsc::Sender<Email>,
}

impl EmailSender {
    /// Queue a message. Waits only while the buffer is full.
    pub async fn enqueue(&self, email: Email) -> CoreResult<()> {
        self.tx
            .send(email)
            .await
            .map_err(|_| CoreError::QueueClosed("email buffer"))
    }
}

#[async_trait]
impl EmailService for EmailSender {
    async fn send(&self, to: &str, text: &str) -> CoreResult<()> {
        self.enqueue(Email::new(to, text)).await
    }
}

pub struct EmailBufferWorker {
    pub(crate) queue: mpsc::Receiver<Email>,
}

impl EmailBufferWorker {
    /// Forward queued messages to `transport` one at a time, in order.
    /// Returns once every sender is dropped and the queue is empty.
    pub async fn run(mut self, transport: Arc<dyn EmailService>) {
        info!("Email buffer started");

        while let Some(email) = self.queue.recv().await {
            if let Err(e) = transport.send(&email.to, &email.text).await {
                error!("Failed to deliver email to {}: {}", Masked(&email.to), e);
            }
        }

        info!("Email buffer stopped");
    }
}
