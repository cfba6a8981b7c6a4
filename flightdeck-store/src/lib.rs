pub mod app_config;
pub mod flight_store;

pub use app_config::AirlineConfig;
pub use flight_store::{FlightSnapshot, FlightSnapshots, FlightStore};
