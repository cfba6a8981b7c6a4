pub mod airline;
pub mod mail;
pub mod views;

pub use airline::Airline;
pub use views::{BookingView, ManagementView};
