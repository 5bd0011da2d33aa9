mod config;
mod routes;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let config = config::HostConfig::from_env().expect("invalid host configuration");
    let app = routes::leptos_app().expect("leptos app init failed");
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "mindset listening");
    axum::serve(listener, app).await.expect("server failed");
}
