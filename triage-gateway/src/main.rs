use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use triage_gateway::create_app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let backend_url =
        std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);

    let app = create_app(backend_url.clone());
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let addr = listener.local_addr()?;

    info!("Symptom Triage Gateway starting on {}", addr);
    info!("Relaying to backend at {}", backend_url);
    info!("Extract endpoint: POST http://{}/api/extract", addr);
    info!("Predict endpoint: POST http://{}/api/predict", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
