use std::sync::Arc;

use tokio::task::yield_now;

use super::common::*;
use crate::forms::busy::BusyCoordinator;
use crate::forms::domain::{FieldValue, SubmissionOutcome, SubmitStatus};
use crate::forms::session::{FieldError, FormSession};

#[test]
fn new_session_starts_idle_with_full_snapshot() {
    let (session, _, _) = session_with(contact_schema(), SubmissionOutcome::Accepted);

    assert_eq!(session.status(), SubmitStatus::Idle);

    let fields = session.fields();
    assert_eq!(fields.len(), session.schema().fields.len());
    for spec in &session.schema().fields {
        assert!(fields.contains(&spec.name), "missing entry for {}", spec.name);
    }
}

#[test]
fn set_field_rejects_unknown_names() {
    let (session, _, _) = session_with(contact_schema(), SubmissionOutcome::Accepted);

    match session.set_text("favouriteColour", "teal") {
        Err(FieldError::Unknown { form, name }) => {
            assert_eq!(form, "contact");
            assert_eq!(name, "favouriteColour");
        }
        other => panic!("expected unknown field error, got {other:?}"),
    }
}

#[test]
fn set_field_rejects_kind_mismatches() {
    let catalog = catalog();
    let application = Arc::clone(catalog.get("application").expect("application form"));
    let (session, _, _) = session_with(application, SubmissionOutcome::Accepted);

    match session.set_text("terms", "yes") {
        Err(FieldError::WrongKind { name, expected }) => {
            assert_eq!(name, "terms");
            assert_eq!(expected, "boolean");
        }
        other => panic!("expected kind mismatch, got {other:?}"),
    }

    match session.set_flag("firstName", true) {
        Err(FieldError::WrongKind { expected, .. }) => assert_eq!(expected, "text"),
        other => panic!("expected kind mismatch, got {other:?}"),
    }
}

#[test]
fn set_field_keeps_the_declared_key_set() {
    let (session, _, _) = session_with(mini_schema(), SubmissionOutcome::Accepted);

    session.set_text("firstName", "Ann").expect("field exists");
    session.set_text("email", "ann@example.com").expect("field exists");

    let fields = session.fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(
        fields.get("firstName"),
        Some(&FieldValue::Text("Ann".to_string()))
    );
}

#[tokio::test]
async fn missing_required_field_fails_before_the_transport() {
    let (session, transport, busy) = session_with(mini_schema(), SubmissionOutcome::Accepted);
    session.set_text("firstName", "Ann").expect("field exists");

    let status = session.submit().await;

    match status {
        SubmitStatus::Failed(message) => {
            assert!(message.contains("Email Address"), "unexpected: {message}");
            assert!(message.contains("resubmit"), "unexpected: {message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(transport.calls(), 0, "validation failures never hit the network");
    assert_eq!(busy.in_flight(), 0);
    assert_eq!(
        session.fields().get("firstName"),
        Some(&FieldValue::Text("Ann".to_string()))
    );
}

#[tokio::test]
async fn accepted_submission_resets_fields_to_the_initial_snapshot() {
    let (session, transport, busy) = session_with(contact_schema(), SubmissionOutcome::Accepted);
    fill_contact(&session);
    let filled = session.fields();

    let status = session.submit().await;

    match status {
        SubmitStatus::Succeeded(message) => {
            assert!(message.starts_with("Thank you!"), "unexpected: {message}")
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(session.fields(), session.schema().initial_fields());
    assert_eq!(busy.in_flight(), 0);
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.seen(), vec![filled], "payload is the pre-submit snapshot");
}

#[tokio::test]
async fn transport_failure_keeps_the_entered_fields() {
    let (session, transport, busy) = session_with(
        contact_schema(),
        SubmissionOutcome::TransportFailure {
            cause: "timeout".to_string(),
        },
    );
    fill_contact(&session);
    let filled = session.fields();

    let status = session.submit().await;

    match status {
        SubmitStatus::Failed(message) => {
            assert!(message.contains("try again"), "unexpected: {message}");
            assert!(!message.contains("timeout"), "cause must not leak: {message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(session.fields(), filled);
    assert_eq!(busy.in_flight(), 0);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn rejection_surfaces_the_endpoint_reason() {
    let (session, _, busy) = session_with(
        contact_schema(),
        SubmissionOutcome::Rejected {
            reason: "Submission flagged as spam.".to_string(),
        },
    );
    fill_contact(&session);
    let filled = session.fields();

    let status = session.submit().await;

    assert_eq!(
        status,
        SubmitStatus::Failed("Submission flagged as spam.".to_string())
    );
    assert_eq!(session.fields(), filled);
    assert_eq!(busy.in_flight(), 0);
}

#[tokio::test]
async fn submit_while_submitting_is_a_no_op() {
    let (transport, release) = GatedTransport::new();
    let busy = BusyCoordinator::new();
    let session = Arc::new(FormSession::new(
        contact_schema(),
        transport.clone(),
        busy.clone(),
    ));
    fill_contact(&session);
    let filled = session.fields();

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.submit().await }
    });
    while !session.status().is_submitting() {
        yield_now().await;
    }

    let second = session.submit().await;

    assert_eq!(second, SubmitStatus::Submitting);
    assert_eq!(transport.calls(), 1, "second submit must not reach the transport");
    assert_eq!(busy.in_flight(), 1, "second submit must not touch the busy count");
    assert_eq!(session.fields(), filled);

    release
        .send(SubmissionOutcome::Accepted)
        .expect("transport still waiting");
    let settled = first.await.expect("submit task completes");
    assert!(matches!(settled, SubmitStatus::Succeeded(_)));
    assert_eq!(busy.in_flight(), 0);
}

#[tokio::test]
async fn edits_during_flight_do_not_reach_the_captured_payload() {
    let (transport, release) = GatedTransport::new();
    let busy = BusyCoordinator::new();
    let session = Arc::new(FormSession::new(
        contact_schema(),
        transport.clone(),
        busy.clone(),
    ));
    fill_contact(&session);
    let captured = session.fields();

    let in_flight = tokio::spawn({
        let session = session.clone();
        async move { session.submit().await }
    });
    while !session.status().is_submitting() {
        yield_now().await;
    }

    session
        .set_text("message", "Actually, please ignore my question.")
        .expect("edits stay legal while submitting");

    release
        .send(SubmissionOutcome::TransportFailure {
            cause: "connection reset".to_string(),
        })
        .expect("transport still waiting");
    in_flight.await.expect("submit task completes");

    assert_eq!(transport.seen(), vec![captured], "payload was captured at submit time");
    assert_eq!(
        session.fields().get("message"),
        Some(&FieldValue::Text(
            "Actually, please ignore my question.".to_string()
        )),
        "failure leaves the newer edit in place"
    );
}

#[tokio::test]
async fn failed_attempts_can_be_resubmitted() {
    let (session, transport, busy) = session_with(mini_schema(), SubmissionOutcome::Accepted);

    session.set_text("firstName", "Ann").expect("field exists");
    let first = session.submit().await;
    assert!(matches!(first, SubmitStatus::Failed(_)));

    session.set_text("email", "ann@example.com").expect("field exists");
    let second = session.submit().await;

    assert!(matches!(second, SubmitStatus::Succeeded(_)));
    assert_eq!(transport.calls(), 1);
    assert_eq!(busy.in_flight(), 0);
}
