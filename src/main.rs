// Main entry point for the terminal video player
// This is where the application starts

use anyhow::Context;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_playlist_player::config::Config;
use video_playlist_player::settings;
use video_playlist_player::ui::app::VideoPlayerApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to a file, anything on stdout/stderr would tear up the TUI
    let log_path = match &config.log_file {
        Some(path) => path.clone(),
        None => settings::config_dir()?.join("player.log"),
    };
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_playlist_player=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    tracing::info!(playlist = %config.playlist, player = %config.player, "Starting");

    let mut app = VideoPlayerApp::new(&config)?;

    // Run the TUI event loop
    app.run()
        .await
        .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    Ok(())
}
