use async_trait::async_trait;
use flightdeck_shared::Masked;
use std::fmt;

use crate::CoreResult;

/// One outbound message.
#[derive(Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub text: String,
}

impl Email {
    pub fn new(to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            text: text.into(),
        }
    }
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Email")
            .field("to", &Masked(&self.to))
            .field("text", &self.text)
            .finish()
    }
}

/// The external mail transport.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Deliver `text` to `to`. May be slow; callers never hold state while waiting.
    async fn send(&self, to: &str, text: &str) -> CoreResult<()>;
}
