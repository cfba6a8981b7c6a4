pub mod alerts;
pub mod flight;
