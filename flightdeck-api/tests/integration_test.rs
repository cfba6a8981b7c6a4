use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use flightdeck_api::Airline;
use flightdeck_core::{CoreError, CoreResult, Email, EmailService, ManualClock};
use flightdeck_shared::{AlertEvent, FlightInfo, Plane};
use flightdeck_store::AirlineConfig;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct InChannelEmailService {
    messages: mpsc::UnboundedSender<Email>,
}

#[async_trait]
impl EmailService for InChannelEmailService {
    async fn send(&self, to: &str, text: &str) -> CoreResult<()> {
        let _ = self.messages.send(Email::new(to, text));
        Ok(())
    }
}

struct Passenger {
    id: String,
    name: String,
    email: String,
}

const NAMES: [&str; 10] = [
    "Ada", "Bob", "Chuck", "David", "Elena", "Fil", "Grigory", "Henry", "Igor", "Jake",
];

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap()
}

fn test_config() -> AirlineConfig {
    AirlineConfig {
        audio_alerts_interval_ms: 200,
        display_update_interval_ms: 100,
        registration_opening_time_ms: 4500,
        registration_closing_time_ms: 1000,
        boarding_opening_time_ms: 2000,
        boarding_closing_time_ms: 1000,
        ticket_sale_end_time_ms: 1000,
        ..AirlineConfig::default()
    }
}

fn seats(rows: usize, columns: u8) -> Vec<String> {
    (1..=rows)
        .flat_map(|row| (0..columns).map(move |col| format!("{}{}", row, (b'A' + col) as char)))
        .collect()
}

fn passengers(count: usize) -> Vec<Passenger> {
    (1..=count)
        .map(|i| {
            let name = NAMES[(i - 1) % NAMES.len()];
            Passenger {
                id: i.to_string(),
                name: name.to_string(),
                email: format!("{}{}@example.com", name, i),
            }
        })
        .collect()
}

fn start(config: AirlineConfig) -> (Airline, Arc<ManualClock>, mpsc::UnboundedReceiver<Email>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let (messages, inbox) = mpsc::unbounded_channel();
    let airline = Airline::start(config, clock.clone(), Arc::new(InChannelEmailService { messages }))
        .expect("valid config");
    (airline, clock, inbox)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test(start_paused = true)]
async fn test_schedule_sell_and_delay_many_flights() {
    let (airline, _clock, mut inbox) = start(test_config());
    let booking = airline.booking();
    let management = airline.management();
    let display = airline.information_display();

    let mut sold: Vec<(FlightInfo, Vec<Passenger>)> = Vec::new();
    for i in 1..=3usize {
        let departure = start_time() + TimeDelta::hours(i as i64);
        let flight_id = i.to_string();
        management
            .schedule_flight(&flight_id, departure, Plane::new(format!("A3{}", i), seats(i, 4)))
            .await
            .unwrap();
        settle().await;

        let board = display.borrow().clone();
        assert_eq!(board.departing.len(), i);
        assert_eq!(board.departing[i - 1].flight_id, flight_id);

        let schedule = booking.flight_schedule();
        assert_eq!(schedule.len(), i);
        assert_eq!(schedule[i - 1].flight_id, flight_id);
        sold.push((schedule[i - 1].clone(), Vec::new()));
    }

    for (idx, passenger) in passengers(10).into_iter().enumerate() {
        let schedule = booking.flight_schedule();
        let flight = schedule[idx % schedule.len()].clone();
        let seat = booking
            .free_seats(&flight.flight_id, flight.departure_time)
            .into_iter()
            .next()
            .unwrap();

        booking
            .buy_ticket(
                &flight.flight_id,
                flight.departure_time,
                &seat,
                &passenger.id,
                &passenger.name,
                &passenger.email,
            )
            .await
            .unwrap();

        let email = inbox.recv().await.unwrap();
        assert_eq!(email.to, passenger.email);
        assert!(email.text.contains("Successfully"));
        assert!(email.text.contains("bought"));
        assert!(email.text.contains(&passenger.name));
        assert!(email.text.contains(&passenger.id));
        assert!(email.text.contains(&seat));
        assert!(email.text.contains(&flight.flight_id));

        let entry = sold
            .iter_mut()
            .find(|(info, _)| info.flight_id == flight.flight_id)
            .unwrap();
        entry.1.push(passenger);
    }

    for (idx, (flight, passengers)) in sold.iter().enumerate() {
        let new_time = flight.departure_time + TimeDelta::hours(1);
        management
            .delay_flight(&flight.flight_id, flight.departure_time, new_time)
            .await
            .unwrap();

        let mut received: HashMap<String, Vec<String>> = HashMap::new();
        for _ in 0..passengers.len() {
            let email = inbox.recv().await.unwrap();
            received.entry(email.to).or_default().push(email.text);
        }
        for passenger in passengers {
            let texts = &received[&passenger.email];
            assert_eq!(texts.len(), 1);
            assert!(texts[0].contains(&flight.flight_id));
            assert!(texts[0].contains("departure time"));
            assert!(texts[0].contains(&passenger.name));
        }

        settle().await;
        let board = display.borrow().clone();
        assert_eq!(board.departing.len(), 3);
        assert_eq!(board.departing[idx].flight_id, flight.flight_id);
        assert_eq!(board.departing[idx].departure_time, flight.departure_time);
        assert_eq!(board.departing[idx].actual_departure_time, new_time);
    }

    airline.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_cancel_notifies_each_holder_once() {
    let (airline, _clock, mut inbox) = start(test_config());
    let booking = airline.booking();
    let management = airline.management();
    let departure = start_time() + TimeDelta::hours(2);

    management
        .schedule_flight("SU1", departure, Plane::new("A320", seats(1, 4)))
        .await
        .unwrap();
    for (passenger, seat) in passengers(3).iter().zip(["1A", "1B", "1C"]) {
        booking
            .buy_ticket("SU1", departure, seat, &passenger.id, &passenger.name, &passenger.email)
            .await
            .unwrap();
        assert!(inbox.recv().await.unwrap().text.contains("Successfully"));
    }

    management.cancel_flight("SU1", departure).await.unwrap();
    let mut recipients = Vec::new();
    for _ in 0..3 {
        let email = inbox.recv().await.unwrap();
        assert!(email.text.contains("SU1"));
        assert!(email.text.contains("is cancelled"));
        recipients.push(email.to);
    }
    recipients.sort();
    assert_eq!(
        recipients,
        vec!["Ada1@example.com", "Bob2@example.com", "Chuck3@example.com"]
    );

    management.cancel_flight("SU1", departure).await.unwrap();
    booking
        .buy_ticket("SU1", departure, "1D", "4", "David", "David4@example.com")
        .await
        .unwrap();
    let email = inbox.recv().await.unwrap();
    assert_eq!(email.to, "David4@example.com");
    assert!(email.text.contains("Unsuccessfully"));

    settle().await;
    assert!(inbox.try_recv().is_err());
    assert!(booking.flight_schedule().is_empty());
    assert_eq!(booking.free_seats("SU1", departure).len(), 1);

    airline.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_unknown_and_departed_flights_are_ignored() {
    let (airline, clock, mut inbox) = start(test_config());
    let booking = airline.booking();
    let management = airline.management();
    let display = airline.information_display();
    let departure = start_time() + TimeDelta::hours(1);

    management
        .schedule_flight("SU1", departure, Plane::new("A320", seats(1, 2)))
        .await
        .unwrap();
    booking
        .buy_ticket("SU1", departure, "1A", "1", "Ada", "ada@example.com")
        .await
        .unwrap();
    inbox.recv().await.unwrap();

    management
        .set_gate_number("SU1", departure + TimeDelta::minutes(1), "G9")
        .await
        .unwrap();
    management.cancel_flight("XX9", departure).await.unwrap();

    clock.set(departure);
    management
        .delay_flight("SU1", departure, departure + TimeDelta::hours(1))
        .await
        .unwrap();

    settle().await;
    assert!(inbox.try_recv().is_err());
    let board = display.borrow().clone();
    assert_eq!(board.departing.len(), 1);
    assert_eq!(board.departing[0].actual_departure_time, departure);
    assert!(board.departing[0].gate_number.is_none());
    assert!(!board.departing[0].is_cancelled);

    airline.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_audio_alerts_repeat_inside_window() {
    let config = AirlineConfig {
        registration_opening_time_ms: 60 * 60 * 1000,
        registration_closing_time_ms: 30 * 60 * 1000,
        boarding_opening_time_ms: 20 * 60 * 1000,
        boarding_closing_time_ms: 5 * 60 * 1000,
        ..test_config()
    };
    let (mut airline, clock, _inbox) = start(config);
    let management = airline.management();
    let mut alerts = airline.audio_alerts();
    let departure = start_time() + TimeDelta::hours(2);

    management
        .schedule_flight("SU1", departure, Plane::new("A320", seats(1, 2)))
        .await
        .unwrap();
    management.set_check_in_number("SU1", departure, "C1").await.unwrap();
    management.set_gate_number("SU1", departure, "G1").await.unwrap();
    settle().await;

    clock.set(departure - TimeDelta::minutes(59));
    let expected = AlertEvent::RegistrationOpen {
        flight_id: "SU1".to_string(),
        check_in_number: "C1".to_string(),
    };
    assert_eq!(alerts.next().await.unwrap(), expected);
    assert_eq!(alerts.next().await.unwrap(), expected);

    airline.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_boarding_alert_carries_gate() {
    let config = AirlineConfig {
        registration_opening_time_ms: 60 * 60 * 1000,
        registration_closing_time_ms: 30 * 60 * 1000,
        boarding_opening_time_ms: 20 * 60 * 1000,
        boarding_closing_time_ms: 5 * 60 * 1000,
        ..test_config()
    };
    let (mut airline, clock, _inbox) = start(config);
    let management = airline.management();
    let departure = start_time() + TimeDelta::hours(2);

    management
        .schedule_flight("SU1", departure, Plane::new("A320", seats(1, 2)))
        .await
        .unwrap();
    management.set_gate_number("SU1", departure, "G1").await.unwrap();
    settle().await;

    clock.set(departure - TimeDelta::minutes(19));
    let mut alerts = airline.audio_alerts();
    assert_eq!(
        alerts.next().await.unwrap(),
        AlertEvent::BoardingOpened {
            flight_id: "SU1".to_string(),
            gate_number: "G1".to_string(),
        }
    );

    airline.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_commands_after_shutdown_report_closed_queue() {
    let (airline, _clock, _inbox) = start(test_config());
    let management = airline.management();
    airline.shutdown().await;

    let result = management.cancel_flight("SU1", start_time()).await;
    assert!(matches!(result, Err(CoreError::QueueClosed(_))));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = AirlineConfig {
        audio_alerts_interval_ms: 0,
        ..AirlineConfig::default()
    };
    let (messages, _inbox) = mpsc::unbounded_channel();
    let result = Airline::start(
        config,
        Arc::new(ManualClock::new(start_time())),
        Arc::new(InChannelEmailService { messages }),
    );
    assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
}
