pub mod clock;
pub mod mail;
pub mod notices;

pub use clock::{Clock, ManualClock, SystemClock};
pub use mail::{Email, EmailService};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Queue closed: {0}")]
    QueueClosed(&'static str),
    #[error("Mail transport failed: {0}")]
    Transport(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
