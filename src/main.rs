mod accounts;
mod config;
mod db;
mod error;
mod notify;
mod pdf;
mod routes;
mod state;
mod storage;
mod workflow;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gcx_supplier_portal=info,tower_http=info".into()),
        )
        .init();

    let config = Arc::new(config::Config::from_env()?);

    storage::ensure_dirs(&config.upload_dir)?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(pool.as_ref()).await?;
    accounts::ensure_bootstrap_admin(pool.as_ref(), &config).await?;

    let (notify, notify_rx) = notify::channel(256);
    let _notify_worker = notify::spawn_worker(pool.clone(), config.clone(), notify_rx);

    let state = Arc::new(state::AppState {
        pool,
        config: config.clone(),
        notify,
    });

    let app = Router::new()
        // Public surface
        .route("/api/reference-data", get(routes::public::reference_data))
        .route("/api/applications", post(routes::public::submit_application))
        .route(
            "/api/applications/:tracking_code/status",
            get(routes::public::application_status),
        )
        .route(
            "/api/documents/:token",
            get(routes::public::document_submission_context)
                .post(routes::public::upload_documents),
        )
        // Authentication
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/change-password", post(routes::auth::change_password))
        // Back office
        .route("/backoffice/dashboard", get(routes::backoffice::dashboard))
        .route(
            "/backoffice/applications",
            get(routes::backoffice::list_applications),
        )
        .route(
            "/backoffice/applications/:id",
            get(routes::backoffice::application_detail)
                .delete(routes::backoffice::delete_application),
        )
        .route(
            "/backoffice/applications/:id/approve",
            post(routes::backoffice::approve_application),
        )
        .route(
            "/backoffice/applications/:id/reject",
            post(routes::backoffice::reject_application),
        )
        .route(
            "/backoffice/applications/:id/request-documents",
            post(routes::backoffice::request_documents),
        )
        .route(
            "/backoffice/applications/:id/documents.zip",
            get(routes::backoffice::download_application_documents),
        )
        .route(
            "/backoffice/applications/:id/pdf",
            get(routes::backoffice::download_application_pdf)
                .post(routes::backoffice::generate_application_pdf),
        )
        .route(
            "/backoffice/applications/:id/contracts",
            get(routes::backoffice::application_contracts),
        )
        .route(
            "/backoffice/documents/:id/verify",
            post(routes::backoffice::verify_document),
        )
        .route(
            "/backoffice/documents/:id/download",
            get(routes::backoffice::download_document),
        )
        .route("/backoffice/audit-logs", get(routes::backoffice::audit_logs))
        .route(
            "/backoffice/notifications",
            get(routes::backoffice::notification_logs),
        )
        .route(
            "/backoffice/contracts",
            post(routes::backoffice::create_contract),
        )
        .route(
            "/backoffice/contracts/:id/status",
            post(routes::backoffice::update_contract_status),
        )
        .route(
            "/backoffice/contracts/:id/documents",
            post(routes::backoffice::attach_contract_document),
        )
        .route(
            "/backoffice/deliveries",
            get(routes::backoffice::list_deliveries),
        )
        .route(
            "/backoffice/deliveries/:id/verify",
            post(routes::backoffice::verify_delivery),
        )
        .route(
            "/backoffice/srvs/:id/status",
            post(routes::backoffice::update_srv_status),
        )
        .route(
            "/backoffice/invoices/:id/status",
            post(routes::backoffice::update_invoice_status),
        )
        // Supplier dashboard
        .route(
            "/supplier/reference-data",
            get(routes::supplier::reference_data),
        )
        .route("/supplier/profile", get(routes::supplier::profile))
        .route("/supplier/contracts", get(routes::supplier::contracts))
        .route(
            "/supplier/contracts/:id/sign",
            post(routes::supplier::sign_contract),
        )
        .route(
            "/supplier/deliveries",
            get(routes::supplier::deliveries).post(routes::supplier::create_delivery),
        )
        .route(
            "/supplier/deliveries/:id/status",
            post(routes::supplier::update_delivery_status),
        )
        .route(
            "/supplier/srvs",
            get(routes::supplier::srvs).post(routes::supplier::create_srv),
        )
        .route("/supplier/srvs/:id/submit", post(routes::supplier::submit_srv))
        .route(
            "/supplier/invoices",
            get(routes::supplier::invoices).post(routes::supplier::create_invoice),
        )
        .route(
            "/supplier/invoices/:id/submit",
            post(routes::supplier::submit_invoice),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("GCX supplier portal listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
