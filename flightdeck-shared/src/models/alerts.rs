use serde::{Deserialize, Serialize};

/// Audio announcements derived from flight timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertEvent {
    RegistrationOpen {
        flight_id: String,
        check_in_number: String,
    },
    RegistrationClosing {
        flight_id: String,
        check_in_number: String,
    },
    BoardingOpened {
        flight_id: String,
        gate_number: String,
    },
    BoardingClosing {
        flight_id: String,
        gate_number: String,
    },
}

impl AlertEvent {
    pub fn flight_id(&self) -> &str {
        match self {
            AlertEvent::RegistrationOpen { flight_id, .. }
            | AlertEvent::RegistrationClosing { flight_id, .. }
            | AlertEvent::BoardingOpened { flight_id, .. }
            | AlertEvent::BoardingClosing { flight_id, .. } => flight_id,
        }
    }
}
