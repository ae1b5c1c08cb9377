use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use configuration::Settings;
use database::DbRepository;
use service::EmployeeService;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
}

/// Assembles the full router: `/health` plus the `/api/employees` resource.
///
/// Requests still running after `request_timeout` are aborted; dropping the
/// handler future also drops any query it was awaiting.
pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    // CORS only applies to the API, not to the health probe.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api = Router::new()
        .route(
            "/employees",
            get(handlers::get_all_employees).post(handlers::create_employee),
        )
        .route("/employees/search", get(handlers::search_employees))
        .route("/employees/stats", get(handlers::employee_stats))
        .route("/employees/city/:city", get(handlers::employees_by_city))
        .route("/employees/phone/:phone", get(handlers::employee_by_phone))
        .route(
            "/employees/:id",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Connects the pool, applies migrations, then serves until Ctrl-C or SIGTERM.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let repository = Arc::new(DbRepository::new(db_pool));

    let app_state = Arc::new(AppState {
        employees: EmployeeService::new(repository),
    });
    let app = build_router(app_state, settings.server.request_timeout());

    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        environment = ?settings.environment,
        "Web server started and listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received.");
}
