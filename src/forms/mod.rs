//! Shared form submission workflow behind the site's contact, application,
//! and careers forms.
//!
//! One parameterized session controller replaces the three near-identical
//! per-form implementations: a [`FormSchema`] value describes each form, a
//! [`FormSession`] owns its field state and submit lifecycle, the shared
//! [`BusyCoordinator`] drives the page-wide loading indicator, and an
//! [`IntakeTransport`] performs the actual outbound request.

pub mod busy;
pub mod catalog;
pub mod domain;
pub mod router;
pub mod schema;
pub mod session;
pub mod transport;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use busy::{BusyCoordinator, BusyGuard};
pub use catalog::FormCatalog;
pub use domain::{FieldSet, FieldValue, SubmissionOutcome, SubmitStatus};
pub use router::forms_router;
pub use schema::{ChoiceOption, FieldKind, FieldSpec, FormSchema};
pub use session::{FieldError, FormGateway, FormSession};
pub use transport::{IntakeTransport, TransportError, Web3FormsClient, HONEYPOT_FIELD};
pub use validation::ValidationError;
