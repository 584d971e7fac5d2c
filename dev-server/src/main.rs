//! Development backend for working on a host of the hooks.
//!
//! Serves the in-memory backend on a fixed port and fills it with seed data
//! created through the real client, so a host started with the printed
//! `BACKEND_URL` has something to list, filter and mutate.
//!
//! Usage: cargo run -p dev-server

use anyhow::Result;
use hooks::{Config, telemetry};
use test_helpers::backend::BackendConfig;
use test_helpers::mock::DevDataset;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    info!("🚀 Starting development backend");
    let config = BackendConfig::from_env()?;
    let app = test_helpers::spawn_app_with(config).await;
    info!("✅ Backend running on {}", app.address);

    info!("📊 Setting up development data...");
    let dataset = match DevDataset::create(&app).await {
        Ok(dataset) => dataset,
        Err(e) => {
            telemetry::log_error(e);
            anyhow::bail!("could not seed the development backend");
        }
    };
    // the seeding session is not meant to be reused by the host
    app.client.logout().await?;

    // the host reads the same .env; tell it where to point
    let client = Config::from_env()?;
    if client.backend_url != app.address {
        tracing::warn!(
            configured = %client.backend_url,
            "BACKEND_URL does not point at this backend"
        );
    }

    info!("🎯 Development backend ready!");
    info!("   BACKEND_URL={}", app.address);
    info!("   API_PREFIX={}", client.api_prefix);
    match client.poll_interval {
        Some(interval) => info!("   polling every {interval:?}"),
        None => info!("   polling disabled"),
    }
    info!("   toasts dismiss after {:?}", client.toast_duration);
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development backend");
    Ok(())
}
