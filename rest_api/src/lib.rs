// rest_api/src/lib.rs
//
// Router assembly and the server entry point. All state is shared through
// one cloneable AppState; handlers live under handlers/, one module per
// resource.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod uploads;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use notifications_service::Notifier;
use storage::ClinicStore;

use crate::config::ApiConfig;
use crate::gateway::{HttpGateway, MockGateway, PaymentGateway};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ClinicStore>,
    pub notifier: Notifier,
    pub gateway: Arc<dyn PaymentGateway>,
    pub jwt_secret: Arc<Vec<u8>>,
    pub token_ttl_hours: i64,
    pub uploads_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        store: Arc<ClinicStore>,
        gateway: Arc<dyn PaymentGateway>,
        jwt_secret: Vec<u8>,
        token_ttl_hours: i64,
        uploads_dir: PathBuf,
    ) -> Self {
        AppState {
            notifier: Notifier::new(Arc::clone(&store)),
            store,
            gateway,
            jwt_secret: Arc::new(jwt_secret),
            token_ttl_hours,
            uploads_dir: Arc::new(uploads_dir),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({"success": true, "message": "Clinic backend is healthy"}))
}

/// Builds the full application router. Static `/me` routes are registered
/// alongside their `/:id` siblings; axum prefers the static match.
pub fn app(state: AppState) -> Router {
    let uploads_service = ServeDir::new(state.uploads_dir.as_path().to_path_buf());

    let auth_routes = Router::new()
        .route("/admin/login", post(handlers::auth::admin_login))
        .route("/doctor/login", post(handlers::auth::doctor_login))
        .route("/patient/login", post(handlers::auth::patient_login));

    let patient_routes = Router::new()
        .route("/", post(handlers::patients::create).get(handlers::patients::list))
        .route("/dashboard/stats", get(handlers::patients::dashboard_stats))
        .route(
            "/:id",
            get(handlers::patients::get)
                .put(handlers::patients::update)
                .delete(handlers::patients::delete),
        )
        .route("/:id/appointments", get(handlers::patients::appointments))
        .route("/:id/medical-records", get(handlers::patients::medical_records))
        .route("/:id/payments", get(handlers::patients::payments))
        .route("/:id/eye-tests", get(handlers::patients::eye_tests));

    let doctor_routes = Router::new()
        .route("/", post(handlers::doctors::create).get(handlers::doctors::list))
        .route("/dashboard/stats", get(handlers::doctors::dashboard_stats))
        .route(
            "/:id",
            get(handlers::doctors::get)
                .put(handlers::doctors::update)
                .delete(handlers::doctors::delete),
        )
        .route("/:id/appointments", get(handlers::doctors::appointments))
        .route("/:id/patients", get(handlers::doctors::patients))
        .route("/:id/medical-records", get(handlers::doctors::medical_records));

    let admin_routes = Router::new()
        .route("/", post(handlers::admins::create).get(handlers::admins::list))
        .route("/dashboard/stats", get(handlers::admins::dashboard_stats))
        .route(
            "/:id",
            get(handlers::admins::get)
                .put(handlers::admins::update)
                .delete(handlers::admins::delete),
        );

    let appointment_routes = Router::new()
        .route(
            "/",
            post(handlers::appointments::create).get(handlers::appointments::list),
        )
        .route("/date/:date", get(handlers::appointments::on_date))
        .route("/doctor/me", get(handlers::appointments::for_own_doctor))
        .route("/doctor/:doctor_id", get(handlers::appointments::for_doctor))
        .route("/patient/me", get(handlers::appointments::for_own_patient))
        .route("/patient/:patient_id", get(handlers::appointments::for_patient))
        .route(
            "/:id",
            get(handlers::appointments::get)
                .put(handlers::appointments::update)
                .delete(handlers::appointments::delete),
        )
        .route("/:id/status", patch(handlers::appointments::update_status));

    let time_slot_routes = Router::new()
        .route(
            "/",
            post(handlers::time_slots::create).get(handlers::time_slots::list),
        )
        .route("/doctor/me", get(handlers::time_slots::for_own_doctor))
        .route("/doctor/:doctor_id", get(handlers::time_slots::for_doctor))
        .route("/available/me/:date", get(handlers::time_slots::available_own))
        .route(
            "/available/:doctor_id/:date",
            get(handlers::time_slots::available),
        )
        .route(
            "/:id",
            get(handlers::time_slots::get)
                .put(handlers::time_slots::update)
                .delete(handlers::time_slots::delete),
        );

    let payment_routes = Router::new()
        .route("/", post(handlers::payments::create).get(handlers::payments::list))
        .route("/patient/me", get(handlers::payments::for_own_patient))
        .route("/patient/:patient_id", get(handlers::payments::for_patient))
        .route(
            "/appointment/:appointment_id",
            get(handlers::payments::for_appointment),
        )
        .route("/date/:date", get(handlers::payments::on_date))
        .route("/status/:status", get(handlers::payments::with_status))
        .route(
            "/:id",
            get(handlers::payments::get)
                .put(handlers::payments::update)
                .delete(handlers::payments::delete),
        )
        .route("/:id/process", post(handlers::payments::process))
        .route("/:id/status", patch(handlers::payments::update_status));

    let medical_record_routes = Router::new()
        .route(
            "/",
            post(handlers::medical_records::create).get(handlers::medical_records::list),
        )
        .route("/patient/me", get(handlers::medical_records::for_own_patient))
        .route(
            "/patient/:patient_id",
            get(handlers::medical_records::for_patient),
        )
        .route("/doctor/me", get(handlers::medical_records::for_own_doctor))
        .route(
            "/doctor/:doctor_id",
            get(handlers::medical_records::for_doctor),
        )
        .route(
            "/appointment/:appointment_id",
            get(handlers::medical_records::for_appointment),
        )
        .route("/date/:date", get(handlers::medical_records::on_date))
        .route(
            "/:id",
            get(handlers::medical_records::get)
                .put(handlers::medical_records::update)
                .delete(handlers::medical_records::delete),
        );

    let medication_routes = Router::new()
        .route(
            "/",
            post(handlers::medications::create).get(handlers::medications::list),
        )
        .route(
            "/:id",
            get(handlers::medications::get)
                .put(handlers::medications::update)
                .delete(handlers::medications::delete),
        );

    let eye_test_routes = Router::new()
        .route("/", post(handlers::eye_tests::create).get(handlers::eye_tests::list))
        .route("/patient/me", get(handlers::eye_tests::for_own_patient))
        .route("/patient/:patient_id", get(handlers::eye_tests::for_patient))
        .route("/date/:date", get(handlers::eye_tests::on_date))
        .route(
            "/:id",
            get(handlers::eye_tests::get)
                .put(handlers::eye_tests::update)
                .delete(handlers::eye_tests::delete),
        );

    let feedback_routes = Router::new()
        .route("/", post(handlers::feedback::create).get(handlers::feedback::list))
        .route("/doctor/me", get(handlers::feedback::for_own_doctor))
        .route("/doctor/:doctor_id", get(handlers::feedback::for_doctor))
        .route("/patient/me", get(handlers::feedback::for_own_patient))
        .route("/patient/:patient_id", get(handlers::feedback::for_patient))
        .route(
            "/appointment/:appointment_id",
            get(handlers::feedback::for_appointment),
        )
        .route(
            "/:id",
            get(handlers::feedback::get)
                .put(handlers::feedback::update)
                .delete(handlers::feedback::delete),
        );

    let notification_routes = Router::new()
        .route(
            "/",
            post(handlers::notifications::create).get(handlers::notifications::list),
        )
        .route(
            "/patient/:patient_id",
            get(handlers::notifications::for_patient),
        )
        .route(
            "/patient/:patient_id/unread",
            get(handlers::notifications::unread_for_patient),
        )
        .route(
            "/patient/:patient_id/read-all",
            patch(handlers::notifications::mark_all_read),
        )
        .route("/:id/read", patch(handlers::notifications::mark_read))
        .route(
            "/:id",
            get(handlers::notifications::get).delete(handlers::notifications::delete),
        );

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/patients", patient_routes)
        .nest("/doctors", doctor_routes)
        .nest("/admins", admin_routes)
        .nest("/appointments", appointment_routes)
        .nest("/time-slots", time_slot_routes)
        .nest("/payments", payment_routes)
        .nest("/medical-records", medical_record_routes)
        .nest("/medications", medication_routes)
        .nest("/eye-tests", eye_test_routes)
        .nest("/feedback", feedback_routes)
        .nest("/notifications", notification_routes);

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .nest_service("/uploads", uploads_service)
        .layer(cors)
        .with_state(state)
}

/// Opens the store, builds the router and serves until ctrl-c.
pub async fn start_server(config: ApiConfig, jwt_secret: Vec<u8>) -> anyhow::Result<()> {
    let store = Arc::new(
        ClinicStore::open(&config.data_directory)
            .with_context(|| format!("Failed to open store at {}", config.data_directory))?,
    );

    let gateway: Arc<dyn PaymentGateway> = match &config.payment_gateway_url {
        Some(url) => Arc::new(HttpGateway::new(url.clone())),
        None => {
            tracing::warn!("no payment gateway configured, using mock gateway");
            Arc::new(MockGateway)
        }
    };

    let state = AppState::new(
        store,
        gateway,
        jwt_secret,
        config.token_ttl_hours,
        PathBuf::from(&config.uploads_directory),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("clinic backend listening on http://{addr}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("server error")?;
    Ok(())
}
