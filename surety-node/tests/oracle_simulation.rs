use std::time::Duration;

use surety_bank::Purchase;
use surety_common::{params::ONE_ETHER, Address, FlightEvent, StatusCode};
use surety_node::{
    runtime::driver::{settle_flight, RetryPolicy},
    build_runtime, Config,
};

const DEPARTURE: u64 = 1_700_000_000;

fn config(oracles: usize, silent: usize, forced: StatusCode) -> Config {
    Config {
        seed: Some(2024),
        oracle_count: oracles,
        silent_oracles: silent,
        min_latency_ms: 0,
        max_latency_ms: 5,
        forced_status: Some(forced),
        purchases: Vec::new(),
        ..Config::default()
    }
}

fn purchase(config: &Config, passenger: Address, amount: u128) -> Purchase {
    let flight = &config.flights[0];
    Purchase {
        passenger,
        airline: flight.airline,
        flight: flight.flight.clone(),
        timestamp: DEPARTURE,
        amount,
    }
}

fn retries() -> RetryPolicy {
    RetryPolicy {
        attempts: 10,
        attempt_timeout: Duration::from_millis(500),
        poll_interval: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_airline_delay_pays_one_and_a_half() {
    let config = config(50, 0, StatusCode::LateAirline);
    let runtime = build_runtime(&config).await.unwrap();
    let app = runtime.app.clone();

    let alice = Address::from_bytes([0xc1; 20]);
    let bob = Address::from_bytes([0xc2; 20]);
    app.buy_insurance(&purchase(&config, alice, 100)).await.unwrap();
    app.buy_insurance(&purchase(&config, bob, ONE_ETHER)).await.unwrap();

    let flight = &config.flights[0];
    let status = settle_flight(&app, &config.owner, flight.airline, &flight.flight, DEPARTURE, &retries())
        .await
        .unwrap();
    assert_eq!(status, Some(StatusCode::LateAirline));

    // Let straggling votes land; they must not pay twice.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.balance_of(&alice).await, 150);
    assert_eq!(app.balance_of(&bob).await, ONE_ETHER + ONE_ETHER / 2);

    let settlements = app
        .events_since(0)
        .await
        .into_iter()
        .filter(|e| matches!(e, FlightEvent::InsureesCredited { .. }))
        .count();
    assert_eq!(settlements, 1);

    assert_eq!(app.withdraw(alice).await.unwrap(), 150);
    assert_eq!(app.withdraw(alice).await.unwrap(), 0);

    runtime.shutdown().await;
}

#[tokio::test]
async fn test_on_time_flight_pays_nothing() {
    let config = config(50, 0, StatusCode::OnTime);
    let runtime = build_runtime(&config).await.unwrap();
    let app = runtime.app.clone();

    let alice = Address::from_bytes([0xc1; 20]);
    app.buy_insurance(&purchase(&config, alice, 100)).await.unwrap();

    let flight = &config.flights[0];
    let status = settle_flight(&app, &config.owner, flight.airline, &flight.flight, DEPARTURE, &retries())
        .await
        .unwrap();
    assert_eq!(status, Some(StatusCode::OnTime));
    assert_eq!(
        app.flight_status(&flight.airline, &flight.flight, DEPARTURE).await,
        Some(StatusCode::OnTime)
    );
    assert_eq!(app.balance_of(&alice).await, 0);

    runtime.shutdown().await;
}

#[tokio::test]
async fn test_silent_oracles_never_settle() {
    let config = config(6, 6, StatusCode::LateAirline);
    let runtime = build_runtime(&config).await.unwrap();
    let app = runtime.app.clone();

    let flight = &config.flights[0];
    let policy = RetryPolicy {
        attempts: 2,
        attempt_timeout: Duration::from_millis(100),
        poll_interval: Duration::from_millis(10),
    };
    let status = settle_flight(&app, &config.owner, flight.airline, &flight.flight, DEPARTURE, &policy)
        .await
        .unwrap();

    assert_eq!(status, None);
    assert_eq!(app.flight_status(&flight.airline, &flight.flight, DEPARTURE).await, None);

    runtime.shutdown().await;
}
