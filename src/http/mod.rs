//! HTTP surface
//!
//! A small axum router over the plan operations. Handlers run the blocking
//! SQLite work on the blocking pool.

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::nutrition::{ingredient_table, IngredientTable};

mod routes;

pub use routes::ApiResponse;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub table: &'static IngredientTable,
    /// Used when a request does not set `strictIngredients`
    pub strict_ingredients: bool,
}

impl AppState {
    pub fn new(db: Database, strict_ingredients: bool) -> Self {
        Self {
            db,
            table: ingredient_table(),
            strict_ingredients,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/meal-plans", get(routes::meal_plans))
        .route(
            "/api/nutrition-plan-dynamic-v2",
            get(routes::nutrition_plan_dynamic),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(config: &Config, db: Database) -> std::io::Result<()> {
    let app = create_router(AppState::new(db, config.strict_ingredients));

    let address = config.address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
}
