use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::busy::BusyCoordinator;
use super::catalog::FormCatalog;
use super::domain::{FieldSet, FieldValue, SubmissionOutcome, SubmitStatus};
use super::schema::FormSchema;
use super::transport::IntakeTransport;
use super::validation::validate;

const TRANSPORT_FAILURE_MESSAGE: &str =
    "Sorry, we couldn't reach the submission service. Please try again later.";

/// Errors raised when view code hands a session a bad field mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("form '{form}' has no field named '{name}'")]
    Unknown { form: String, name: String },
    #[error("field '{name}' expects a {expected} value")]
    WrongKind { name: String, expected: &'static str },
}

struct SessionState {
    fields: FieldSet,
    status: SubmitStatus,
}

/// Controller owning one form instance's field values and submit lifecycle.
///
/// The session is the only writer of its field set and status: view code
/// mutates fields through [`FormSession::set_field`] and triggers
/// [`FormSession::submit`], never touching the state directly. All other
/// state is instance-local; only the busy coordinator is shared.
pub struct FormSession<T> {
    schema: Arc<FormSchema>,
    transport: Arc<T>,
    busy: BusyCoordinator,
    state: Mutex<SessionState>,
}

impl<T> FormSession<T>
where
    T: IntakeTransport,
{
    pub fn new(schema: Arc<FormSchema>, transport: Arc<T>, busy: BusyCoordinator) -> Self {
        let state = SessionState {
            fields: schema.initial_fields(),
            status: SubmitStatus::Idle,
        };

        Self {
            schema,
            transport,
            busy,
            state: Mutex::new(state),
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn status(&self) -> SubmitStatus {
        self.state().status.clone()
    }

    /// Snapshot of the current field values.
    pub fn fields(&self) -> FieldSet {
        self.state().fields.clone()
    }

    /// Replace one field's value. The name must exist in the schema and the
    /// value must match the field's kind; format constraints are checked at
    /// submit time, not here, and partially typed input stays legal.
    pub fn set_field(&self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        let spec = self
            .schema
            .field(name)
            .ok_or_else(|| FieldError::Unknown {
                form: self.schema.slug.clone(),
                name: name.to_string(),
            })?;

        let matches_kind = match value {
            FieldValue::Text(_) => !spec.expects_flag(),
            FieldValue::Flag(_) => spec.expects_flag(),
        };
        if !matches_kind {
            return Err(FieldError::WrongKind {
                name: name.to_string(),
                expected: if spec.expects_flag() { "boolean" } else { "text" },
            });
        }

        self.state().fields.replace(name, value);
        Ok(())
    }

    pub fn set_text(&self, name: &str, value: impl Into<String>) -> Result<(), FieldError> {
        self.set_field(name, FieldValue::Text(value.into()))
    }

    pub fn set_flag(&self, name: &str, value: bool) -> Result<(), FieldError> {
        self.set_field(name, FieldValue::Flag(value))
    }

    /// Run one submission attempt and return the settled status.
    ///
    /// Invoking this while a submission is already in flight is a no-op that
    /// returns `Submitting`: the fields, the transport, and the busy count
    /// are all left alone. A validation failure settles as `Failed` before
    /// the busy count is raised or the transport contacted. Otherwise the
    /// payload is captured up front and field edits made while the request
    /// is in flight do not reach it; on acceptance the fields reset to the
    /// schema's initial snapshot, on any failure they are left as entered.
    pub async fn submit(&self) -> SubmitStatus {
        let captured = {
            let mut state = self.state();

            if state.status.is_submitting() {
                debug!(form = %self.schema.slug, "submission already in flight");
                return state.status.clone();
            }

            if let Err(violation) = validate(&self.schema, &state.fields) {
                let status = SubmitStatus::Failed(format!("{violation}. Please fix it and resubmit."));
                state.status = status.clone();
                return status;
            }

            state.status = SubmitStatus::Submitting;
            state.fields.clone()
        };

        // Lowered when the guard drops, whatever happens below.
        let _busy = self.busy.begin();
        let outcome = self.transport.send(&self.schema, &captured).await;

        let mut state = self.state();
        let status = match outcome {
            SubmissionOutcome::Accepted => {
                state.fields = self.schema.initial_fields();
                SubmitStatus::Succeeded(self.schema.success_message.clone())
            }
            SubmissionOutcome::Rejected { reason } => {
                warn!(form = %self.schema.slug, %reason, "intake endpoint declined submission");
                SubmitStatus::Failed(reason)
            }
            SubmissionOutcome::TransportFailure { cause } => {
                warn!(form = %self.schema.slug, %cause, "intake request failed");
                SubmitStatus::Failed(TRANSPORT_FAILURE_MESSAGE.to_string())
            }
        };
        state.status = status.clone();
        status
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Entry point tying the form catalog, the shared transport, and the shared
/// busy coordinator together; every embedded form gets its session from here.
pub struct FormGateway<T> {
    catalog: FormCatalog,
    transport: Arc<T>,
    busy: BusyCoordinator,
}

impl<T> FormGateway<T>
where
    T: IntakeTransport,
{
    pub fn new(catalog: FormCatalog, transport: Arc<T>, busy: BusyCoordinator) -> Self {
        Self {
            catalog,
            transport,
            busy,
        }
    }

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    pub fn busy(&self) -> &BusyCoordinator {
        &self.busy
    }

    /// Fresh session for one form instance, sharing the gateway's transport
    /// and busy coordinator.
    pub fn session(&self, slug: &str) -> Option<FormSession<T>> {
        let schema = self.catalog.get(slug)?;
        Some(FormSession::new(
            Arc::clone(schema),
            Arc::clone(&self.transport),
            self.busy.clone(),
        ))
    }
}
