// Blog post API entry point
use tokio::signal;

use blog_api::{config, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    dotenvy::dotenv().ok();
    let config = config::load();

    let mut server = run_server(&config).await?;
    tracing::info!(addr = %server.local_addr(), "Blog post API started");

    let shutdown_requested = tokio::select! {
        result = server.stopped() => {
            if let Err(e) = &result {
                tracing::error!(error = %e, "REST server stopped unexpectedly");
            }
            result?;
            false
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, gracefully shutting down...");
            true
        }
    };

    if shutdown_requested {
        server.close().await?;
    }

    tracing::info!("Application shutdown complete");
    Ok(())
}
