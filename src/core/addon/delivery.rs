// Sending requests to the activity event API, with an optional retry loop.

use std::time::Duration;

use super::addon_ports::{ActivityRequest, ActivityTransport};

/// Only a 200 counts as delivered.
const SUCCESS_STATUS: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The last attempt's status, if the API answered at all, and its body or transport error.
    Failed { status: Option<u16>, detail: String },
}

/// Posts `request` until it succeeds or the attempts run out.
pub async fn deliver<T>(transport: &T, request: &ActivityRequest, policy: RetryPolicy) -> DeliveryOutcome
where
    T: ActivityTransport + ?Sized,
{
    let attempts = policy.max_attempts.max(1);
    let mut outcome = DeliveryOutcome::Failed {
        status: None,
        detail: String::new(),
    };

    for attempt in 1..=attempts {
        outcome = match transport.post(request).await {
            Ok(response) if response.status == SUCCESS_STATUS => {
                tracing::info!(attempt, url = %request.url, "Activity request delivered");
                return DeliveryOutcome::Delivered;
            }
            Ok(response) => DeliveryOutcome::Failed {
                status: Some(response.status),
                detail: response.body,
            },
            Err(err) => DeliveryOutcome::Failed {
                status: None,
                detail: err.to_string(),
            },
        };

        if attempt < attempts {
            tracing::warn!(attempt, "Request failed. Retrying...");
            tokio::time::sleep(policy.delay).await;
        } else {
            tracing::warn!(attempt, "Request failed. No attempts left");
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::addon::{ApiResponse, TransportError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays the queued results in order and counts calls.
    struct ScriptedTransport {
        results: Mutex<Vec<Result<ApiResponse, TransportError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedTransport {
        fn new(mut results: Vec<Result<ApiResponse, TransportError>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ActivityTransport for ScriptedTransport {
        async fn post(&self, _request: &ActivityRequest) -> Result<ApiResponse, TransportError> {
            *self.calls.lock().unwrap() += 1;
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(TransportError::Request("no response queued".to_string())))
        }
    }

    fn response(status: u16, body: &str) -> Result<ApiResponse, TransportError> {
        Ok(ApiResponse {
            status,
            body: body.to_string(),
        })
    }

    fn request() -> ActivityRequest {
        ActivityRequest {
            url: "https://api.example.com/activityevents".to_string(),
            api_key: "k".to_string(),
            api_token: "t".to_string(),
            body: serde_json::json!({}),
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_first_success_stops() {
        let transport = ScriptedTransport::new(vec![response(200, "")]);

        let outcome = deliver(&transport, &request(), fast_policy()).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(*transport.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let transport = ScriptedTransport::new(vec![
            response(500, "boom"),
            Err(TransportError::Request("timeout".to_string())),
            response(200, ""),
        ]);

        let outcome = deliver(&transport, &request(), fast_policy()).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(*transport.calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let transport = ScriptedTransport::new(vec![
            response(500, "first"),
            response(500, "second"),
            response(503, "third"),
            response(200, ""),
        ]);

        let outcome = deliver(&transport, &request(), fast_policy()).await;

        assert_eq!(
            outcome,
            DeliveryOutcome::Failed {
                status: Some(503),
                detail: "third".to_string()
            }
        );
        assert_eq!(*transport.calls.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_policy_pauses_between_attempts_only() {
        let transport = ScriptedTransport::new(vec![
            response(500, "first"),
            response(500, "second"),
            response(500, "third"),
        ]);
        let started = tokio::time::Instant::now();

        let outcome = deliver(&transport, &request(), RetryPolicy::default()).await;

        // Two 500 ms pauses; none after the last attempt.
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
        assert_eq!(*transport.calls.lock().unwrap(), 3);
        assert!(matches!(outcome, DeliveryOutcome::Failed { status: Some(500), .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_retry_stops_waiting() {
        let transport = ScriptedTransport::new(vec![response(502, "busy"), response(200, "")]);
        let started = tokio::time::Instant::now();

        let outcome = deliver(&transport, &request(), RetryPolicy::default()).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(started.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let transport = ScriptedTransport::new(vec![response(400, "bad"), response(200, "")]);

        let outcome = deliver(&transport, &request(), RetryPolicy::single_attempt()).await;

        assert!(matches!(outcome, DeliveryOutcome::Failed { status: Some(400), .. }));
        assert_eq!(*transport.calls.lock().unwrap(), 1);
    }
}
