use std::sync::Arc;

use super::*;
use crate::events::MemorySink;
use crate::mx::MxRecord;
use crate::mx::tests::StubResolver;
use crate::probe::tests::{
    GREETING, closed_port, spawn_mock_server, spawn_raw_mock_server, spawn_silent_server,
};

pub(crate) const HOSTNAME: &str = "probe.local";
pub(crate) const SENDER: &str = "tester@example.com";

/// Validator whose DNS answers with a single loopback exchanger listening on
/// `port`.
pub(crate) fn loopback_validator(port: u16) -> (Validator, Arc<MemorySink>) {
    validator_with(StubResolver::with_records(vec![MxRecord::new(10, "127.0.0.1")]), port)
}

pub(crate) fn validator_with(resolver: StubResolver, port: u16) -> (Validator, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let options = ProbeOptions::default().with_timeout_ms(5_000).with_port(port);
    let validator = Validator::new(Arc::new(resolver), options, sink.clone());
    (validator, sink)
}

pub(crate) fn request(email: &str) -> ValidationRequest {
    ValidationRequest::new(email, HOSTNAME, SENDER)
}

pub(crate) const ACCEPTING_SCRIPT: [(&str, &str); 4] = [
    ("EHLO probe.local", "250 mock.smtp.test\r\n"),
    ("MAIL FROM:<tester@example.com>", "250 2.1.0 Ok\r\n"),
    ("RCPT TO:", "250 2.1.5 Ok\r\n"),
    ("QUIT", "221 2.0.0 Bye\r\n"),
];

fn states(sink: &MemorySink) -> Vec<PipelineState> {
    sink.events()
        .into_iter()
        .filter_map(|event| match event {
            ValidationEvent::StateChanged { state, .. } => Some(state),
            _ => None,
        })
        .collect()
}

fn failure_kind(sink: &MemorySink) -> Option<FailureKind> {
    sink.events().into_iter().find_map(|event| match event {
        ValidationEvent::StageFailed { kind, .. } => Some(kind),
        _ => None,
    })
}

#[test]
fn malformed_address_fails_format_validation() {
    let (validator, sink) = validator_with(
        StubResolver::new(|_| panic!("malformed input must not reach DNS")),
        closed_port(),
    );

    let result = validator.validate(&request("not-an-email"));
    assert!(!result.is_valid);
    assert_eq!(result.email, "not-an-email");
    assert_eq!(result.description, "Format validation failed");
    assert!(result.error.starts_with("invalid email: "), "{}", result.error);
    assert_eq!(failure_kind(&sink), Some(FailureKind::MalformedAddress));
    assert_eq!(
        states(&sink),
        vec![PipelineState::Pending, PipelineState::Invalid]
    );
}

#[test]
fn missing_exchanger_is_reported() {
    let (validator, sink) = validator_with(StubResolver::with_records(Vec::new()), closed_port());

    let result = validator.validate(&request("user@nomx.example"));
    assert!(!result.is_valid);
    assert_eq!(result.description, "Couldn't find MX server for this address");
    assert_eq!(result.error, "no MX records found for nomx.example");
    assert_eq!(failure_kind(&sink), Some(FailureKind::NoExchangerFound));
}

#[test]
fn null_mx_counts_as_no_exchanger() {
    let (validator, sink) =
        validator_with(StubResolver::with_records(vec![MxRecord::new(0, "")]), closed_port());

    let result = validator.validate(&request("user@null.example"));
    assert_eq!(result.description, "Couldn't find MX server for this address");
    assert_eq!(failure_kind(&sink), Some(FailureKind::NoExchangerFound));
}

#[test]
fn lookup_failure_shares_the_no_exchanger_description() {
    let (validator, sink) = validator_with(StubResolver::failing(), closed_port());

    let result = validator.validate(&request("user@broken.example"));
    assert_eq!(result.description, "Couldn't find MX server for this address");
    assert!(
        result.error.starts_with("MX lookup failed for broken.example"),
        "{}",
        result.error
    );
    assert_eq!(failure_kind(&sink), Some(FailureKind::ExchangerLookupFailed));
}

#[test]
fn refused_connection_is_unreachable() {
    let (validator, sink) = loopback_validator(closed_port());

    let result = validator.validate(&request("user@example.com"));
    assert!(!result.is_valid);
    assert_eq!(result.description, "MX server is unreachable");
    assert!(result.error.starts_with("can't connect to 127.0.0.1"), "{}", result.error);
    assert_eq!(failure_kind(&sink), Some(FailureKind::ConnectFailed));
    assert_eq!(
        states(&sink),
        vec![
            PipelineState::Pending,
            PipelineState::Parsed,
            PipelineState::Resolved,
            PipelineState::Invalid,
        ]
    );
}

#[test]
fn rejected_recipient_surfaces_server_reply() {
    let server = spawn_mock_server(
        GREETING,
        vec![
            ("EHLO", "250 mock.smtp.test\r\n"),
            ("MAIL FROM:", "250 Ok\r\n"),
            ("RCPT TO:", "550 5.1.1 User unknown\r\n"),
        ],
    );
    let (validator, sink) = loopback_validator(server.port);

    let result = validator.validate(&request("ghost@example.com"));
    assert!(!result.is_valid);
    assert_eq!(result.description, "550 5.1.1 User unknown");
    assert_eq!(
        result.error,
        "RCPT failed for ghost@example.com: 550 5.1.1 User unknown"
    );
    assert_eq!(failure_kind(&sink), Some(FailureKind::RecipientRejected));
    server.join();
}

#[test]
fn accepted_recipient_is_valid() {
    let server = spawn_mock_server(GREETING, ACCEPTING_SCRIPT.to_vec());
    let (validator, sink) = loopback_validator(server.port);

    let result = validator.validate(&request("Jane Doe <jane@example.com>"));
    assert_eq!(
        result,
        ValidationResult::valid("Jane Doe <jane@example.com>")
    );
    assert_eq!(result.description, "Ok");
    assert!(result.error.is_empty());
    assert_eq!(
        states(&sink),
        vec![
            PipelineState::Pending,
            PipelineState::Parsed,
            PipelineState::Resolved,
            PipelineState::Probed,
            PipelineState::Valid,
        ]
    );

    let commands = server.join();
    assert_eq!(commands[2], "RCPT TO:<jane@example.com>");
}

#[test]
fn quit_failure_keeps_result_valid() {
    let server = spawn_mock_server(
        GREETING,
        vec![
            ("EHLO", "250 mock.smtp.test\r\n"),
            ("MAIL FROM:", "250 Ok\r\n"),
            ("RCPT TO:", "250 Ok\r\n"),
            ("QUIT", "500 Nope\r\n"),
        ],
    );
    let (validator, sink) = loopback_validator(server.port);

    let result = validator.validate(&request("user@example.com"));
    assert!(result.is_valid);
    assert!(result.error.is_empty());
    assert!(sink.events().iter().any(|event| matches!(
        event,
        ValidationEvent::QuitFailed { detail, .. } if detail == "QUIT failed: 500 Nope"
    )));
    server.join();
}

#[test]
fn completion_event_carries_the_result() {
    let (validator, sink) = validator_with(StubResolver::with_records(Vec::new()), closed_port());

    let result = validator.validate(&request("user@nomx.example"));
    let completed = sink.events().into_iter().find_map(|event| match event {
        ValidationEvent::Completed { result } => Some(result),
        _ => None,
    });
    assert_eq!(completed, Some(result));
}

#[test]
fn repeated_validation_yields_the_same_kind() {
    let (validator, sink) = loopback_validator(closed_port());

    let first = validator.validate(&request("user@example.com"));
    let second = validator.validate(&request("user@example.com"));
    assert_eq!(first.description, second.description);
    assert_eq!(first.is_valid, second.is_valid);

    let kinds: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ValidationEvent::StageFailed { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![FailureKind::ConnectFailed; 2]);
}

#[test]
fn result_serializes_with_four_keys_in_order() {
    let result = ValidationResult::invalid(
        "user@example.com",
        "550 5.1.1 User unknown",
        "RCPT failed for user@example.com: 550 5.1.1 User unknown",
    );
    let json = serde_json::to_string(&result).expect("serialize");
    insta::assert_snapshot!(json, @r#"{"email":"user@example.com","is_valid":false,"description":"550 5.1.1 User unknown","error":"RCPT failed for user@example.com: 550 5.1.1 User unknown"}"#);

    let back: ValidationResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, result);
}

#[test]
fn crlf_in_quoted_local_part_never_reaches_smtp() {
    let (validator, sink) = validator_with(
        StubResolver::new(|_| panic!("rejected input must not reach DNS")),
        closed_port(),
    );

    let result = validator.validate(&request("\"x\\\r\\\nRSET\"@example.com"));
    assert!(!result.is_valid);
    assert_eq!(result.description, "Format validation failed");
    assert_eq!(
        result.error,
        "invalid email: invalid character '\\r' in quoted-string"
    );
    assert!(!sink
        .events()
        .iter()
        .any(|event| matches!(event, ValidationEvent::Smtp { .. })));
}

#[test]
fn non_utf8_rejection_is_described_by_the_reply() {
    let server = spawn_raw_mock_server(
        GREETING.as_bytes(),
        vec![
            ("EHLO", b"250 mock.smtp.test\r\n".as_slice()),
            ("MAIL FROM:", b"250 Ok\r\n".as_slice()),
            ("RCPT TO:", b"550 Empf\xe4nger unbekannt\r\n".as_slice()),
        ],
    );
    let (validator, sink) = loopback_validator(server.port);

    let result = validator.validate(&request("user@example.com"));
    assert!(!result.is_valid);
    assert_eq!(result.description, "550 Empf\u{FFFD}nger unbekannt");
    assert_eq!(
        result.error,
        "RCPT failed for user@example.com: 550 Empf\u{FFFD}nger unbekannt"
    );
    assert_eq!(failure_kind(&sink), Some(FailureKind::RecipientRejected));
    server.join();
}

#[test]
fn silent_exchanger_is_unreachable_after_timeout() {
    let server = spawn_silent_server(Some(GREETING));
    let sink = Arc::new(MemorySink::default());
    let validator = Validator::new(
        Arc::new(StubResolver::with_records(vec![MxRecord::new(10, "127.0.0.1")])),
        ProbeOptions::default().with_timeout_ms(200).with_port(server.port),
        sink.clone(),
    );

    let result = validator.validate(&request("user@example.com"));
    assert!(!result.is_valid);
    assert_eq!(result.description, "MX server is unreachable");
    assert!(result.error.starts_with("HELO failed: "), "{}", result.error);
    assert_eq!(failure_kind(&sink), Some(FailureKind::GreetingFailed));
    server.join();
}
