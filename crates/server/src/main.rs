mod routes;
mod storage;

use storage::LogStore;

#[derive(Clone, Default)]
pub struct AppState {
    pub store: LogStore,
}

const DEFAULT_ADDR: &str = "0.0.0.0:3001";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailmark_server=info".into()),
        )
        .init();

    let addr = std::env::var("TRAILMARK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let app = routes::router(AppState::default());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{addr}");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
    }
}
