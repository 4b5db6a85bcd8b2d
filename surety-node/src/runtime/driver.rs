use std::time::Duration;

use surety_common::{Address, FlightEvent, FlightKey, Result, StatusCode};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::app::FlightSuretyApp;

/// How long the client side waits for oracles before asking again. The
/// protocol itself never expires a request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub attempt_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            attempt_timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(25),
        }
    }
}

/// Requests a status for the flight until one request settles or the
/// attempts run out. Each retry is a fresh request with a new index.
///
/// Returns the settled status, or `None` when no request reached quorum.
pub async fn settle_flight(
    app: &FlightSuretyApp,
    requester: &Address,
    airline: Address,
    flight: &str,
    timestamp: u64,
    policy: &RetryPolicy,
) -> Result<Option<StatusCode>> {
    let key = FlightKey::new(&airline, flight, timestamp);
    let mut cursor = app.event_cursor().await;

    for attempt in 1..=policy.attempts {
        let request = app.fetch_flight_status(requester, airline, flight, timestamp).await?;
        debug!("Attempt {}/{} for {}: {}", attempt, policy.attempts, flight, request);

        let deadline = Instant::now() + policy.attempt_timeout;
        while Instant::now() < deadline {
            tokio::time::sleep(policy.poll_interval).await;

            let events = app.events_since(cursor).await;
            cursor += events.len();
            if let Some(status) = settled_status(&events, &key) {
                info!("✅ {} settled as {} after {} attempt(s)", flight, status, attempt);
                return Ok(Some(status));
            }
        }
        warn!("⏳ No quorum for {} on index {}, asking again", flight, request.index);
    }

    Ok(None)
}

fn settled_status(events: &[FlightEvent], key: &FlightKey) -> Option<StatusCode> {
    events.iter().find_map(|event| match event {
        FlightEvent::FlightStatusSettled { request, status, .. } if request.flight_key() == *key => Some(*status),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::OracleRequest;

    #[test]
    fn test_settled_status_matches_flight() {
        let airline = Address::from_bytes([3; 20]);
        let other = OracleRequest::new(1, airline, "OTHER", 1);
        let ours = OracleRequest::new(2, airline, "ND1309", 1);
        let events = vec![
            FlightEvent::OracleRequested(ours.clone()),
            FlightEvent::FlightStatusSettled {
                request: other,
                status: StatusCode::OnTime,
                votes: 3,
            },
            FlightEvent::FlightStatusSettled {
                request: ours.clone(),
                status: StatusCode::LateAirline,
                votes: 3,
            },
        ];

        assert_eq!(settled_status(&events, &ours.flight_key()), Some(StatusCode::LateAirline));
        assert_eq!(settled_status(&events[..2], &ours.flight_key()), None);
    }
}
