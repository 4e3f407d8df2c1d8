// Playlist loading
// playlist.json is either served over HTTP or read from disk. Either way the
// body must be a JSON array; each entry is decoded on its own so one broken
// entry doesn't take the whole library down.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::playlist::item::PlaylistItem;

pub const DEFAULT_PLAYLIST: &str = "playlist.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSource {
    Url(String),
    File(PathBuf),
}

impl PlaylistSource {
    /// Anything starting with http:// or https:// is fetched, everything else is a path
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            PlaylistSource::Url(trimmed.to_string())
        } else {
            PlaylistSource::File(PathBuf::from(trimmed))
        }
    }

    pub async fn load(&self) -> Result<Vec<PlaylistItem>> {
        let body = match self {
            PlaylistSource::Url(url) => fetch_body(url).await?,
            PlaylistSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                Error::Playlist(format!("failed to read {}: {}", path.display(), e))
            })?,
        };

        let items = parse_playlist(&body)?;
        info!(source = %self, count = items.len(), "Playlist loaded");
        Ok(items)
    }
}

impl Default for PlaylistSource {
    fn default() -> Self {
        PlaylistSource::File(PathBuf::from(DEFAULT_PLAYLIST))
    }
}

impl fmt::Display for PlaylistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistSource::Url(url) => write!(f, "{}", url),
            PlaylistSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

async fn fetch_body(url: &str) -> Result<String> {
    debug!(url, "Fetching playlist");
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.text().await?)
}

// ==========================================
// parse_playlist()
// ==========================================
// - body isn't valid JSON        -> Err
// - body is JSON but not array   -> empty playlist
// - entry fails to decode        -> skipped with a warning
pub fn parse_playlist(body: &str) -> Result<Vec<PlaylistItem>> {
    let value: Value = serde_json::from_str(body)?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            warn!(kind = json_kind(&other), "Playlist body is not an array, treating as empty");
            return Ok(Vec::new());
        }
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<PlaylistItem>(entry) {
            Ok(item) => items.push(item),
            Err(e) => warn!(index, error = %e, "Skipping malformed playlist entry"),
        }
    }
    Ok(items)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
