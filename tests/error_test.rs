use std::time::Duration;

use scholargate::{ErrorKind, ScholarGateError};

#[test]
fn test_error_display() {
    let err = ScholarGateError::Offline;
    assert_eq!(
        err.to_string(),
        "You're offline. Please connect to the internet for AI features."
    );

    let err = ScholarGateError::QuotaExhausted;
    assert!(err.to_string().starts_with("Daily AI limit reached."));

    let err = ScholarGateError::Remote {
        status: Some(500),
        message: "No AI response generated".into(),
    };
    assert_eq!(err.to_string(), "No AI response generated");

    let err = ScholarGateError::Timeout(Duration::from_secs(15));
    assert_eq!(err.to_string(), "Request timed out after 15s. Please try again.");
}

#[test]
fn test_error_kinds() {
    let cases = [
        (ScholarGateError::Offline, ErrorKind::Offline),
        (ScholarGateError::QuotaExhausted, ErrorKind::QuotaExhausted),
        (
            ScholarGateError::Remote {
                status: None,
                message: "x".into(),
            },
            ErrorKind::RemoteService,
        ),
        (
            ScholarGateError::Timeout(Duration::from_secs(1)),
            ErrorKind::Timeout,
        ),
        (
            ScholarGateError::MalformedResponse("x".into()),
            ErrorKind::MalformedResponse,
        ),
        (
            ScholarGateError::InvalidInput("x".into()),
            ErrorKind::InvalidInput,
        ),
        (ScholarGateError::Storage("x".into()), ErrorKind::Storage),
        (
            ScholarGateError::Configuration("x".into()),
            ErrorKind::Configuration,
        ),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind, "{err:?}");
    }
}

#[test]
fn test_status_helpers() {
    let limited = ScholarGateError::Remote {
        status: Some(429),
        message: "slow down".into(),
    };
    assert!(limited.is_rate_limited());
    assert!(!limited.is_credits_exhausted());

    let broke = ScholarGateError::Remote {
        status: Some(402),
        message: "credits".into(),
    };
    assert!(broke.is_credits_exhausted());
    assert!(!ScholarGateError::Offline.is_rate_limited());
}

#[test]
fn test_json_error_is_malformed() {
    let err: ScholarGateError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}
