pub mod models;
pub mod pii;

pub use models::alerts::AlertEvent;
pub use models::flight::{Flight, FlightInfo, InformationDisplay, Plane, Ticket};
pub use pii::Masked;
