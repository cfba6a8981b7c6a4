pub mod alerts;
pub mod command;
pub mod display;
pub mod email_buffer;
pub mod notification;
pub mod processor;

#[cfg(test)]
mod test_support;

pub use alerts::{scan_flights, AlertScanner, AlertWindows};
pub use command::{Command, FlightChange};
pub use display::DisplayProjector;
pub use email_buffer::{email_buffer, EmailBufferWorker, EmailSender};
pub use notification::{notification_queue, NotificationJob, NotificationWorker, PassengerNotifier};
pub use processor::CommandProcessor;
