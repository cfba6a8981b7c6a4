//! Passenger-facing message texts.

use flightdeck_shared::Ticket;

const UNASSIGNED: &str = "unassigned";

/// Outcome of a ticket purchase, as reported to the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Succeeded,
    Failed,
}

impl PurchaseOutcome {
    fn as_str(self) -> &'static str {
        match self {
            PurchaseOutcome::Succeeded => "Successfully",
            PurchaseOutcome::Failed => "Unsuccessfully",
        }
    }
}

pub fn purchase_notice(
    outcome: PurchaseOutcome,
    passenger_name: &str,
    passenger_id: &str,
    seat_no: &str,
    flight_id: &str,
) -> String {
    format!(
        "Dear {}(id: {}), you have {} bought a ticket for seat {} on flight: {}",
        passenger_name,
        passenger_id,
        outcome.as_str(),
        seat_no,
        flight_id
    )
}

/// What changed on a flight, captured from the pre-change snapshot when the
/// command is accepted. Rendered once per ticket holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeNotice {
    Cancelled,
    Changed {
        parameter: &'static str,
        old_value: String,
        new_value: String,
    },
}

impl ChangeNotice {
    pub const DEPARTURE_TIME: &'static str = "departure time";
    pub const CHECK_IN_NUMBER: &'static str = "check in number";
    pub const GATE_NUMBER: &'static str = "gate number";

    pub fn changed(parameter: &'static str, old_value: Option<&str>, new_value: &str) -> Self {
        ChangeNotice::Changed {
            parameter,
            old_value: old_value.unwrap_or(UNASSIGNED).to_string(),
            new_value: new_value.to_string(),
        }
    }

    pub fn render(&self, ticket: &Ticket) -> String {
        match self {
            ChangeNotice::Cancelled => format!(
                "Dear {}, your flight {} is cancelled",
                ticket.passenger_name, ticket.flight_id
            ),
            ChangeNotice::Changed {
                parameter,
                old_value,
                new_value,
            } => format!(
                "Dear {}, your flight {} {} changed from {} to {}",
                ticket.passenger_name, ticket.flight_id, parameter, old_value, new_value
            ),
        }
    }
}
