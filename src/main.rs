mod clubs;
mod dashboard;
mod error;
mod events;
mod members;
mod reports;
mod sessions;
mod settings;
mod sqlite;

use error::AppResult;
use sessions::SessionStore;

use anyhow::Result;
use sqlx::SqlitePool;
use tokio::{net::TcpListener, time::Instant};

use axum::{
    middleware,
    routing::{get, post},
    serve, Router,
};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    db: SqlitePool,
    sessions: SessionStore,
}

async fn build_state(settings: &sqlite::Settings) -> Result<AppState> {
    let db = sqlite::create_pool(settings).await?;

    Ok(AppState {
        db,
        sessions: SessionStore::new(),
    })
}

fn create_app(state: AppState) -> Router {
    let member_area = Router::new()
        .route("/member", get(members::member_activity))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            sessions::require_member,
        ));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/clubs", get(clubs::clubs_page))
        .route("/events", get(events::events_page))
        .route("/events/create", post(events::create_event))
        .route("/login", get(members::login_page).post(members::login))
        .route("/no-show", get(reports::no_show_report))
        .merge(member_area)
        .with_state(state)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenv::dotenv().ok();

    let start = Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = settings::Settings::load()?;
    let state = build_state(&settings.sqlite).await?;
    let app = create_app(state);

    let port = std::env::var("PORT").unwrap_or("3000".to_string());
    let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Listening on {}", listener.local_addr()?);

    // Create a shutdown signal handler
    let shutdown = async move {
        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = signal::ctrl_c() => {},
            _ = terminate => {},
        }
        let duration = start.elapsed();
        info!("Shutting down gracefully... in {:?}", duration);
    };

    // Start the server with graceful shutdown
    let server = serve(listener, app).with_graceful_shutdown(shutdown);

    if let Err(e) = server.await {
        eprintln!("Server error: {}", e);
    }

    Ok(())
}
