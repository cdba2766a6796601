use std::error::Error;
use std::sync::Arc;
use stream_picker::utils::display::DisplayFormatter;
use stream_picker::{create_router, AppState, Config, StreamService};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Stream Picker");

    let config = Config::from_env()?;
    let service = StreamService::from_config(&config)?;
    let display = DisplayFormatter::new(&config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;
    println!("{}", display.format_banner(addr));
    info!("Listening on {} (upstream {})", addr, config.streams_url());

    let state = AppState {
        service: Arc::new(service),
        display: Arc::new(display),
    };

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
