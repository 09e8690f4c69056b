//! Tests for `RetryPolicy`.

use std::time::Duration;

use http::StatusCode;

use super::{CallError, RetryPolicy};
use crate::payload::EncodeError;
use crate::test_fixtures::{
    connection_refused, invalid_url, timed_out, tls_failure, unexpected_eof, unknown_host,
};
use crate::transport::HttpError;

fn status(code: u16) -> CallError {
    CallError::Status {
        status: StatusCode::from_u16(code).unwrap(),
        body: String::new(),
    }
}

mod defaults {
    use super::*;

    #[test]
    fn new_creates_policy_with_defaults() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.retry_delay, Duration::from_secs(1));
        assert_eq!(
            policy.retry_on_status.iter().copied().collect::<Vec<_>>(),
            vec![500, 502, 503, 504]
        );
    }

    #[test]
    fn default_trait_matches_new() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::new());
    }

    #[test]
    fn default_makes_a_single_attempt() {
        assert_eq!(RetryPolicy::new().max_attempts(), 1);
    }
}

mod builder {
    use super::*;

    #[test]
    fn with_max_retries_sets_attempts() {
        let policy = RetryPolicy::new().with_max_retries(3);

        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn max_attempts_saturates() {
        assert_eq!(
            RetryPolicy::new().with_max_retries(u32::MAX).max_attempts(),
            u32::MAX
        );
    }

    #[test]
    fn with_retry_delay_sets_delay() {
        let policy = RetryPolicy::new().with_retry_delay(Duration::from_millis(250));
        assert_eq!(policy.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn with_retry_on_status_replaces_set() {
        let policy = RetryPolicy::new().with_retry_on_status([429, 429, 503]);

        assert!(policy.is_retryable_status(429));
        assert!(policy.is_retryable_status(503));
        assert!(!policy.is_retryable_status(500));
        assert_eq!(policy.retry_on_status.len(), 2);
    }
}

mod should_retry {
    use super::*;

    #[test]
    fn configured_server_errors_retry() {
        let policy = RetryPolicy::new();
        for code in [500, 502, 503, 504] {
            assert!(policy.should_retry(&status(code)), "{code} should retry");
        }
    }

    #[test]
    fn unlisted_statuses_do_not_retry() {
        let policy = RetryPolicy::new();
        for code in [400, 401, 404, 429, 501] {
            assert!(!policy.should_retry(&status(code)), "{code} should not retry");
        }
    }

    #[test]
    fn too_many_requests_retries_only_when_listed() {
        let default = RetryPolicy::new();
        let with_429 = RetryPolicy::new().with_retry_on_status([429, 500, 502, 503, 504]);

        assert!(!default.should_retry(&status(429)));
        assert!(with_429.should_retry(&status(429)));
    }

    #[test]
    fn transient_transport_failures_retry() {
        let policy = RetryPolicy::new();

        assert!(policy.should_retry(&connection_refused().into()));
        assert!(policy.should_retry(&timed_out().into()));
        assert!(policy.should_retry(&unexpected_eof().into()));
    }

    #[test]
    fn permanent_transport_failures_do_not_retry() {
        let policy = RetryPolicy::new();
        let request = HttpError::Request(Box::new(std::io::Error::other("redirect loop")));

        assert!(!policy.should_retry(&invalid_url().into()));
        assert!(!policy.should_retry(&request.into()));
    }

    #[test]
    fn tls_and_dns_failures_do_not_retry() {
        let policy = RetryPolicy::new().with_max_retries(3);

        assert!(!policy.should_retry(&tls_failure().into()));
        assert!(!policy.should_retry(&unknown_host().into()));
    }

    #[test]
    fn invalid_url_does_not_retry() {
        let error = CallError::InvalidUrl {
            url: "::".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(!RetryPolicy::new().should_retry(&error));
    }

    #[test]
    fn encoding_failure_does_not_retry() {
        let error = CallError::from(EncodeError::QueryNotObject {
            method: http::Method::GET,
        });
        assert!(!RetryPolicy::new().should_retry(&error));
    }

    #[test]
    fn deadline_never_retries() {
        let error = CallError::Deadline {
            timeout: Duration::from_secs(30),
        };
        assert!(!RetryPolicy::new().should_retry(&error));
    }
}

mod call_error {
    use super::*;

    #[test]
    fn status_message_embeds_the_code() {
        assert_eq!(
            status(503).to_string(),
            "received non-2xx response code: 503"
        );
    }

    #[test]
    fn status_carries_body() {
        let error = CallError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };

        assert_eq!(error.body(), Some("upstream down"));
        assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn other_variants_have_no_body() {
        let error: CallError = timed_out().into();

        assert_eq!(error.body(), None);
        assert_eq!(error.status(), None);
        assert!(!error.is_deadline());
    }

    #[test]
    fn invalid_url_encode_error_maps_to_invalid_url() {
        let error = CallError::from(EncodeError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        });

        assert!(matches!(error, CallError::InvalidUrl { ref url, .. } if url == "nope"));
    }

    #[test]
    fn deadline_message_names_the_budget() {
        let error = CallError::Deadline {
            timeout: Duration::from_millis(1500),
        };

        assert!(error.is_deadline());
        assert_eq!(error.to_string(), "Request deadline of 1500ms exceeded");
    }
}
