use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::forms::busy::BusyCoordinator;
use crate::forms::catalog::FormCatalog;
use crate::forms::domain::{FieldSet, SubmissionOutcome};
use crate::forms::schema::{FieldSpec, FormSchema};
use crate::forms::session::{FormGateway, FormSession};
use crate::forms::transport::IntakeTransport;

pub(super) const TEST_ACCESS_KEY: &str = "test-access-key";

pub(super) fn catalog() -> FormCatalog {
    FormCatalog::standard(TEST_ACCESS_KEY)
}

pub(super) fn contact_schema() -> Arc<FormSchema> {
    Arc::clone(catalog().get("contact").expect("contact form present"))
}

/// Two-field schema used where the full catalog would just add noise.
pub(super) fn mini_schema() -> Arc<FormSchema> {
    Arc::new(FormSchema {
        slug: "mini".to_string(),
        subject: "Mini Form Submission".to_string(),
        access_key: TEST_ACCESS_KEY.to_string(),
        success_message: "Thanks!".to_string(),
        fields: vec![
            FieldSpec::text("firstName", "First Name").required(),
            FieldSpec::email("email", "Email Address").required(),
        ],
    })
}

pub(super) fn session_with(
    schema: Arc<FormSchema>,
    outcome: SubmissionOutcome,
) -> (FormSession<StubTransport>, Arc<StubTransport>, BusyCoordinator) {
    let transport = Arc::new(StubTransport::returning(outcome));
    let busy = BusyCoordinator::new();
    let session = FormSession::new(schema, transport.clone(), busy.clone());
    (session, transport, busy)
}

pub(super) fn fill_contact<T: IntakeTransport>(session: &FormSession<T>) {
    session.set_text("firstName", "Ann").expect("field exists");
    session.set_text("lastName", "Okafor").expect("field exists");
    session
        .set_text("email", "ann.okafor@example.com")
        .expect("field exists");
    session
        .set_text("subjectField", "Course enquiry")
        .expect("field exists");
    session
        .set_text("message", "Do evening classes run in September?")
        .expect("field exists");
}

pub(super) fn gateway_with(
    outcome: SubmissionOutcome,
) -> (Arc<FormGateway<StubTransport>>, Arc<StubTransport>, BusyCoordinator) {
    let transport = Arc::new(StubTransport::returning(outcome));
    let busy = BusyCoordinator::new();
    let gateway = Arc::new(FormGateway::new(catalog(), transport.clone(), busy.clone()));
    (gateway, transport, busy)
}

/// Transport double that records what it was asked to send and answers with
/// a fixed outcome.
pub(super) struct StubTransport {
    outcome: SubmissionOutcome,
    calls: AtomicUsize,
    seen: Mutex<Vec<FieldSet>>,
}

impl StubTransport {
    pub(super) fn returning(outcome: SubmissionOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    pub(super) fn seen(&self) -> Vec<FieldSet> {
        self.seen.lock().expect("stub mutex poisoned").clone()
    }
}

#[async_trait]
impl IntakeTransport for StubTransport {
    async fn send(&self, _schema: &FormSchema, fields: &FieldSet) -> SubmissionOutcome {
        self.calls.fetch_add(1, Ordering::AcqRel);
        self.seen
            .lock()
            .expect("stub mutex poisoned")
            .push(fields.clone());
        self.outcome.clone()
    }
}

/// Transport double that parks the request until the test releases it, for
/// exercising in-flight behavior.
pub(super) struct GatedTransport {
    gate: Mutex<Option<oneshot::Receiver<SubmissionOutcome>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<FieldSet>>,
}

impl GatedTransport {
    pub(super) fn new() -> (Arc<Self>, oneshot::Sender<SubmissionOutcome>) {
        let (release, gate) = oneshot::channel();
        let transport = Arc::new(Self {
            gate: Mutex::new(Some(gate)),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });
        (transport, release)
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    pub(super) fn seen(&self) -> Vec<FieldSet> {
        self.seen.lock().expect("gate mutex poisoned").clone()
    }
}

#[async_trait]
impl IntakeTransport for GatedTransport {
    async fn send(&self, _schema: &FormSchema, fields: &FieldSet) -> SubmissionOutcome {
        self.calls.fetch_add(1, Ordering::AcqRel);
        self.seen
            .lock()
            .expect("gate mutex poisoned")
            .push(fields.clone());
        let gate = self
            .gate
            .lock()
            .expect("gate mutex poisoned")
            .take()
            .expect("gated transport used once per instance");
        gate.await.unwrap_or(SubmissionOutcome::TransportFailure {
            cause: "gate dropped".to_string(),
        })
    }
}
