use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use campus_intake::config::AppConfig;
use campus_intake::error::AppError;
use campus_intake::forms::schema::{FieldKind, FieldSpec};
use campus_intake::forms::session::FieldError;
use campus_intake::forms::{
    forms_router, BusyCoordinator, FieldValue, FormCatalog, FormGateway, SubmitStatus,
    Web3FormsClient,
};
use campus_intake::telemetry;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    busy: BusyCoordinator,
}

#[derive(Parser, Debug)]
#[command(
    name = "Campus Intake Gateway",
    about = "Serve and exercise the website form intake pipeline from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect and submit the built-in forms
    Forms {
        #[command(subcommand)]
        command: FormsCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum FormsCommand {
    /// List the built-in form schemas
    List,
    /// Submit a form through the live intake endpoint
    Submit(SubmitArgs),
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Form slug (contact, application, careers)
    form: String,
    /// Field assignment as name=value; repeat per field. Checkbox fields
    /// take true/false.
    #[arg(long = "field", value_parser = parse_field_pair)]
    fields: Vec<(String, String)>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Forms {
            command: FormsCommand::List,
        } => run_forms_list(),
        Command::Forms {
            command: FormsCommand::Submit(args),
        } => run_forms_submit(args).await,
    }
}

fn parse_field_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let access_key = config.intake.require_access_key()?.to_string();
    let transport = Arc::new(Web3FormsClient::new(&config.intake)?);
    let busy = BusyCoordinator::new();
    let gateway = Arc::new(FormGateway::new(
        FormCatalog::standard(&access_key),
        transport,
        busy.clone(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        busy,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(forms_router(gateway))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "form intake gateway ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_forms_list() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = FormCatalog::standard(&config.intake.access_key);

    println!("Built-in forms");
    for schema in catalog.iter() {
        println!("\n{} ({})", schema.slug, schema.subject);
        for field in &schema.fields {
            let marker = if field.required { "*" } else { " " };
            println!("  {marker} {} [{}] {}", field.name, kind_label(field), field.label);
        }
    }

    Ok(())
}

async fn run_forms_submit(args: SubmitArgs) -> Result<(), AppError> {
    let SubmitArgs { form, fields } = args;

    let config = AppConfig::load()?;
    let access_key = config.intake.require_access_key()?.to_string();
    let transport = Arc::new(Web3FormsClient::new(&config.intake)?);
    let gateway = FormGateway::new(
        FormCatalog::standard(&access_key),
        transport,
        BusyCoordinator::new(),
    );

    let session = gateway
        .session(&form)
        .ok_or_else(|| AppError::UnknownForm(form.clone()))?;

    for (name, raw) in fields {
        let spec = session
            .schema()
            .field(&name)
            .ok_or_else(|| FieldError::Unknown {
                form: form.clone(),
                name: name.clone(),
            })?;
        session.set_field(&name, field_value_for(spec, &raw)?)?;
    }

    println!(
        "Submitting '{}' to {}",
        session.schema().subject,
        config.intake.endpoint
    );

    match session.submit().await {
        SubmitStatus::Succeeded(message) => {
            println!("{message}");
            Ok(())
        }
        SubmitStatus::Failed(message) => Err(AppError::SubmissionFailed(message)),
        other => Err(AppError::SubmissionFailed(format!(
            "submission settled in unexpected state '{}'",
            other.label()
        ))),
    }
}

fn field_value_for(spec: &FieldSpec, raw: &str) -> Result<FieldValue, AppError> {
    if !spec.expects_flag() {
        return Ok(FieldValue::Text(raw.to_string()));
    }

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(FieldValue::Flag(true)),
        "false" => Ok(FieldValue::Flag(false)),
        _ => Err(AppError::Field(FieldError::WrongKind {
            name: spec.name.clone(),
            expected: "boolean",
        })),
    }
}

fn kind_label(field: &FieldSpec) -> &'static str {
    match field.kind {
        FieldKind::Text => "text",
        FieldKind::MultiLine => "multi-line",
        FieldKind::Email => "email",
        FieldKind::Phone => "phone",
        FieldKind::Date => "date",
        FieldKind::Choice { .. } => "choice",
        FieldKind::Checkbox => "checkbox",
    }
}

async fn healthcheck(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "busy": state.busy.is_busy(),
        "in_flight": state.busy.in_flight(),
    }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
