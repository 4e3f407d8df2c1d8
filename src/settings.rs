// Persisted playback mode flags
// Stored as "1"/"0" strings in settings.json so the file stays compatible
// with the flags the web version of the player kept in local storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::playlist::PlaybackMode;

pub const APP_DIR: &str = "video-playlist-player";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredFlags {
    #[serde(rename = "repeatOne", default)]
    repeat_one: Option<String>,
    #[serde(rename = "autoNext", default)]
    auto_next: Option<String>,
    #[serde(rename = "savedAt", default)]
    saved_at: Option<DateTime<Utc>>,
}

impl StoredFlags {
    // repeat is opt-in ("1"), auto next is opt-out ("0")
    fn mode(&self) -> PlaybackMode {
        PlaybackMode {
            repeat_one: self.repeat_one.as_deref() == Some("1"),
            auto_next: self.auto_next.as_deref() != Some("0"),
        }
    }

    fn from_mode(mode: PlaybackMode) -> Self {
        StoredFlags {
            repeat_one: Some(flag(mode.repeat_one)),
            auto_next: Some(flag(mode.auto_next)),
            saved_at: Some(Utc::now()),
        }
    }
}

fn flag(on: bool) -> String {
    let value = if on { "1" } else { "0" };
    value.to_string()
}

/// Platform config dir for this app, e.g. ~/.config/video-playlist-player
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| Error::Settings("Could not find config directory".to_string()))?
        .join(APP_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub struct Settings {
    path: PathBuf,
}

impl Settings {
    pub fn new(path: PathBuf) -> Self {
        Settings { path }
    }

    pub fn in_config_dir() -> Result<Self> {
        Ok(Settings::new(config_dir()?.join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable settings fall back to the defaults
    pub fn load_mode(&self) -> PlaybackMode {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No saved settings, using defaults");
                return StoredFlags::default().mode();
            }
        };

        match serde_json::from_str::<StoredFlags>(&data) {
            Ok(flags) => flags.mode(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Settings file is corrupt, using defaults");
                StoredFlags::default().mode()
            }
        }
    }

    pub fn save_mode(&self, mode: PlaybackMode) -> Result<()> {
        let json = serde_json::to_string_pretty(&StoredFlags::from_mode(mode))?;
        fs::write(&self.path, json)
            .map_err(|e| Error::Settings(format!("Failed to write {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}
