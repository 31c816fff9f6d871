//! Form intake gateway for the college brochure site.
//!
//! The site's three public forms (contact, application, careers) share one
//! submission pipeline: a session owning field state and validation, a
//! process-wide busy signal, and a transport adapter that forwards accepted
//! payloads to the external intake endpoint.

pub mod config;
pub mod error;
pub mod forms;
pub mod telemetry;
