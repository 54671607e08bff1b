//! Pitwall - main entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pitwall::{
    ExitOutcome, HttpSdkClient, Supervisor, announce_player_capacity,
    cli::Cli,
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pitwall=info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::resolve(&cli)?;
    tracing::info!(
        "Starting sidecar for game server on port {}",
        config.server.port
    );

    // A missing gateway is a startup failure, not a surprise at the first
    // ready call.
    let control_plane = Arc::new(HttpSdkClient::connect(&config.orchestration).await?);

    announce_player_capacity(control_plane.as_ref(), &config.orchestration).await?;

    let supervisor = Supervisor::new(
        config.server,
        config.heartbeat,
        control_plane,
        config.orchestration.player_tracking,
    );

    match supervisor.run().await? {
        ExitOutcome::ShutdownRequested => {
            tracing::info!("Shutdown acknowledged by the control plane, exiting");
            Ok(())
        }
        ExitOutcome::ChildExited(status) if status.success() => {
            tracing::info!("Game server exited cleanly");
            Ok(())
        }
        ExitOutcome::ChildExited(status) => {
            tracing::warn!(%status, "Game server exited abnormally");
            std::process::exit(status.code().unwrap_or(1));
        }
    }
}
