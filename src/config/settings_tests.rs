//! Tests for `ClientConfig` and its sub-structures.

use super::{ClientConfig, ConnectionConfig, LoggingConfig, TimeoutConfig, TlsConfig};
use crate::pipeline::RetryPolicy;
use std::time::Duration;

mod defaults {
    use super::*;

    #[test]
    fn default_base_timeout_is_30_seconds() {
        assert_eq!(ClientConfig::default().base_timeout, Duration::from_secs(30));
    }

    #[test]
    fn default_transport_timeouts() {
        let timeouts = TimeoutConfig::default();

        assert_eq!(timeouts.dial, Duration::from_secs(5));
        assert_eq!(timeouts.tls_handshake, Duration::from_secs(10));
        assert_eq!(timeouts.response_header, Duration::from_secs(10));
        assert_eq!(timeouts.idle, Duration::from_secs(90));
        assert_eq!(timeouts.expect_continue, Duration::from_secs(1));
    }

    #[test]
    fn default_pool_limits() {
        let connection = ConnectionConfig::default();

        assert_eq!(connection.max_idle, 100);
        assert_eq!(connection.max_idle_per_host, 10);
        assert_eq!(connection.max_per_host, 0);
    }

    #[test]
    fn default_tls_verifies_peer() {
        let tls = TlsConfig::default();

        assert!(tls.verify_peer);
        assert!(tls.ca_path.is_none());
        assert!(tls.cert_path.is_none());
        assert!(tls.key_path.is_none());
    }

    #[test]
    fn default_logging_is_fully_on() {
        let logging = LoggingConfig::default();

        assert!(logging.enabled);
        assert!(logging.log_request_body);
        assert!(logging.log_response_body);
        assert!(logging.log_headers);
        assert!(logging.sanitize_headers);
    }

    #[test]
    fn disabled_logging_is_off() {
        assert!(!LoggingConfig::disabled().enabled);
    }

    #[test]
    fn default_retry_policy() {
        assert_eq!(ClientConfig::default().retry, RetryPolicy::new());
    }
}

mod mutators {
    use super::*;

    #[test]
    fn mutators_replace_whole_sub_structures() {
        let timeouts = TimeoutConfig {
            dial: Duration::from_secs(1),
            ..TimeoutConfig::default()
        };
        let connection = ConnectionConfig {
            max_idle: 1,
            max_idle_per_host: 1,
            max_per_host: 1,
        };
        let retry = RetryPolicy::new().with_max_retries(4);

        let config = ClientConfig::new(Duration::from_secs(5))
            .with_timeouts(timeouts)
            .with_connection(connection)
            .with_retry(retry.clone())
            .with_logging(LoggingConfig::disabled());

        assert_eq!(config.timeouts, timeouts);
        assert_eq!(config.connection, connection);
        assert_eq!(config.retry, retry);
        assert_eq!(config.logging, LoggingConfig::disabled());
    }

    #[test]
    fn with_tls_replaces_tls() {
        let tls = TlsConfig {
            ca_path: Some("ca.pem".into()),
            ..TlsConfig::default()
        };

        let config = ClientConfig::default().with_tls(tls.clone());
        assert_eq!(config.tls, tls);
    }

    #[test]
    fn with_insecure_tls_only_disables_verification() {
        let config = ClientConfig::default().with_insecure_tls();

        assert!(!config.tls.verify_peer);
        assert_eq!(config.timeouts, TimeoutConfig::default());
    }
}

mod validation {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_base_timeout_is_rejected() {
        let error = ClientConfig::new(Duration::ZERO).validate().unwrap_err();
        assert_eq!(error.to_string(), "baseTimeout must be greater than 0");
    }

    #[test]
    fn zero_dial_timeout_is_rejected() {
        let config = ClientConfig::default().with_timeouts(TimeoutConfig {
            dial: Duration::ZERO,
            ..TimeoutConfig::default()
        });

        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "dialTimeout must be greater than 0"
        );
    }

    #[test]
    fn zero_tls_handshake_timeout_is_rejected() {
        let config = ClientConfig::default().with_timeouts(TimeoutConfig {
            tls_handshake: Duration::ZERO,
            ..TimeoutConfig::default()
        });

        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "tlsHandshakeTimeout must be greater than 0"
        );
    }

    #[test]
    fn first_violation_is_reported() {
        let config = ClientConfig::new(Duration::ZERO).with_timeouts(TimeoutConfig {
            dial: Duration::ZERO,
            tls_handshake: Duration::ZERO,
            ..TimeoutConfig::default()
        });

        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "baseTimeout must be greater than 0"
        );
    }

    #[test]
    fn optional_timeouts_may_be_zero() {
        let config = ClientConfig::default().with_timeouts(TimeoutConfig {
            response_header: Duration::ZERO,
            idle: Duration::ZERO,
            expect_continue: Duration::ZERO,
            ..TimeoutConfig::default()
        });

        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_retries_and_pool_sizes_are_valid() {
        let config = ClientConfig::default()
            .with_connection(ConnectionConfig {
                max_idle: 0,
                max_idle_per_host: 0,
                max_per_host: 0,
            })
            .with_retry(RetryPolicy::new().with_max_retries(0));

        assert!(config.validate().is_ok());
    }
}

#[test]
fn display_summarizes_config() {
    let display = ClientConfig::default().to_string();

    assert!(display.contains("timeout: 30000ms"));
    assert!(display.contains("retry: 0x/1000ms"));
}
