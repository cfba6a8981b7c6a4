use async_trait::async_trait;
use flightdeck_core::{CoreError, CoreResult, Email, EmailService};
use tokio::sync::mpsc;

/// Transport that records every delivered message on a channel.
pub struct RecordingEmailService {
    delivered: mpsc::UnboundedSender<Email>,
    failing_recipient: Option<String>,
}

impl RecordingEmailService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Email>) {
        let (delivered, rx) = mpsc::unbounded_channel();
        (
            Self {
                delivered,
                failing_recipient: None,
            },
            rx,
        )
    }

    pub fn failing_for(recipient: &str) -> (Self, mpsc::UnboundedReceiver<Email>) {
        let (mut service, rx) = Self::new();
        service.failing_recipient = Some(recipient.to_string());
        (service, rx)
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(&self, to: &str, text: &str) -> CoreResult<()> {
        if self.failing_recipient.as_deref() == Some(to) {
            return Err(CoreError::Transport(format!("mailbox {} unavailable", to)));
        }
        let _ = self.delivered.send(Email::new(to, text));
        Ok(())
    }
}
