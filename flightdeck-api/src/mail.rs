use async_trait::async_trait;
use flightdeck_core::{CoreResult, EmailService};
use flightdeck_shared::Masked;
use tracing::info;

/// Transport for local runs: writes each message to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmailService;

#[async_trait]
impl EmailService for LogEmailService {
    async fn send(&self, to: &str, text: &str) -> CoreResult<()> {
        info!("Email to {}: {}", Masked(to), text);
        Ok(())
    }
}
