use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::domain::FieldValue;
use super::schema::{FieldSpec, FormSchema};
use super::session::{FormGateway, FormSession};
use super::transport::IntakeTransport;

/// Router builder exposing the form catalog and submission endpoints.
pub fn forms_router<T>(gateway: Arc<FormGateway<T>>) -> Router
where
    T: IntakeTransport + 'static,
{
    Router::new()
        .route("/api/v1/forms", get(list_handler::<T>))
        .route(
            "/api/v1/forms/:form",
            get(describe_handler::<T>).post(submit_handler::<T>),
        )
        .with_state(gateway)
}

/// Schema as exposed over HTTP; the access key stays server-side.
#[derive(Debug, Serialize)]
struct FormView<'a> {
    slug: &'a str,
    subject: &'a str,
    fields: &'a [FieldSpec],
}

impl<'a> FormView<'a> {
    fn from_schema(schema: &'a FormSchema) -> Self {
        Self {
            slug: &schema.slug,
            subject: &schema.subject,
            fields: &schema.fields,
        }
    }
}

#[derive(Debug, Serialize)]
struct SubmitStatusView {
    form: String,
    status: &'static str,
    message: Option<String>,
}

async fn list_handler<T>(State(gateway): State<Arc<FormGateway<T>>>) -> Response
where
    T: IntakeTransport + 'static,
{
    let forms: Vec<FormView<'_>> = gateway
        .catalog()
        .iter()
        .map(|schema| FormView::from_schema(schema))
        .collect();

    (StatusCode::OK, Json(forms)).into_response()
}

async fn describe_handler<T>(
    State(gateway): State<Arc<FormGateway<T>>>,
    Path(form): Path<String>,
) -> Response
where
    T: IntakeTransport + 'static,
{
    match gateway.catalog().get(&form) {
        Some(schema) => (StatusCode::OK, Json(FormView::from_schema(schema))).into_response(),
        None => unknown_form_response(&form),
    }
}

/// Accept a JSON object of field values, run it through a fresh session, and
/// report the settled status. Submission-path failures (validation, rejection,
/// transport) are absorbed into the status view; only a malformed request is
/// an HTTP error.
async fn submit_handler<T>(
    State(gateway): State<Arc<FormGateway<T>>>,
    Path(form): Path<String>,
    Json(values): Json<BTreeMap<String, Value>>,
) -> Response
where
    T: IntakeTransport + 'static,
{
    let Some(session) = gateway.session(&form) else {
        return unknown_form_response(&form);
    };

    if let Err(response) = apply_values(&session, values) {
        return response;
    }

    let status = session.submit().await;
    let view = SubmitStatusView {
        form,
        status: status.label(),
        message: status.message().map(str::to_string),
    };

    (StatusCode::OK, Json(view)).into_response()
}

fn apply_values<T>(
    session: &FormSession<T>,
    values: BTreeMap<String, Value>,
) -> Result<(), Response>
where
    T: IntakeTransport,
{
    for (name, value) in values {
        let field_value = match value {
            Value::String(text) => FieldValue::Text(text),
            Value::Bool(flag) => FieldValue::Flag(flag),
            other => {
                let payload = json!({
                    "error": format!("field '{name}' must be a string or boolean, got {other}"),
                });
                return Err(
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
                );
            }
        };

        if let Err(err) = session.set_field(&name, field_value) {
            let payload = json!({ "error": err.to_string() });
            return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response());
        }
    }

    Ok(())
}

fn unknown_form_response(form: &str) -> Response {
    let payload = json!({ "error": format!("unknown form '{form}'") });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}
