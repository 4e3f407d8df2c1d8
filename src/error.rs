// Error types shared across the player
// Library code returns crate::error::Result, main.rs wraps it in anyhow

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// playlist.json could not be read or had the wrong shape
    #[error("Playlist error: {0}")]
    Playlist(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external media player could not be started or crashed
    #[error("Player error: {0}")]
    Player(String),

    /// yt-dlp failed to resolve a stream URL
    #[error("Extractor error: {0}")]
    Extractor(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
