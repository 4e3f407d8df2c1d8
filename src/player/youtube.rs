// YouTube surface
// Lives only while the current item is a YouTube item: the controller creates
// it on the way into the YouTube tab and drops it on the way out. Switching
// between YouTube items reuses the same surface via load_video_by_id().
//
// Playback is two steps:
// 1. yt-dlp resolves the watch URL to a direct stream URL (blocking, so it
//    runs on tokio's blocking pool)
// 2. the stream URL is handed to the media player command

use std::process::Command;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::player::process::{MediaLauncher, MediaProcess, ProcessExit};
use crate::player::surface::{PlayerSurface, SurfaceEvent, SurfaceKind};
use crate::playlist::item::youtube_watch_url;
use crate::playlist::PlaylistItem;

#[derive(Debug, Clone)]
pub struct StreamExtractor {
    command: String,
}

impl StreamExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        StreamExtractor {
            command: command.into(),
        }
    }

    // ==========================================
    // resolve_stream_url()
    // ==========================================
    // Runs `yt-dlp --get-url -f best <watch url>` and returns the first line
    // of output. Blocks until yt-dlp exits.
    pub fn resolve_stream_url(&self, youtube_id: &str) -> Result<String> {
        let watch_url = youtube_watch_url(youtube_id);
        debug!(url = %watch_url, "Resolving stream URL");

        let output = Command::new(&self.command)
            .arg("--get-url")
            .arg("-f")
            .arg("best")
            .arg("--no-playlist")
            .arg(&watch_url)
            .output()
            .map_err(|e| {
                Error::Extractor(format!("Failed to run {}: {}. Is yt-dlp installed?", self.command, e))
            })?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extractor(format!("yt-dlp failed: {}", error.trim())));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::Extractor(format!("Invalid UTF-8 from yt-dlp: {}", e)))?;

        first_url(&stdout).ok_or_else(|| Error::Extractor("yt-dlp returned empty URL".to_string()))
    }
}

fn first_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

pub struct YouTubeSurface {
    launcher: MediaLauncher,
    extractor: StreamExtractor,
    video_id: Option<String>,
    stream_url: Option<String>,
    pending: Option<oneshot::Receiver<Result<String>>>,
    process: Option<MediaProcess>,
}

impl YouTubeSurface {
    pub fn new(launcher: MediaLauncher, extractor: StreamExtractor) -> Self {
        info!("YouTube surface created");
        YouTubeSurface {
            launcher,
            extractor,
            video_id: None,
            stream_url: None,
            pending: None,
            process: None,
        }
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    /// Swap the video without tearing the surface down
    pub fn load_video_by_id(&mut self, youtube_id: &str) {
        self.stop();
        self.video_id = Some(youtube_id.to_string());
        self.stream_url = None;

        let (tx, rx) = oneshot::channel();
        let extractor = self.extractor.clone();
        let id = youtube_id.to_string();
        tokio::task::spawn_blocking(move || {
            // Receiver is gone if another video was loaded meanwhile
            let _ = tx.send(extractor.resolve_stream_url(&id));
        });
        self.pending = Some(rx);
    }

    fn poll_pending(&mut self) -> Option<SurfaceEvent> {
        let rx = self.pending.as_mut()?;
        let resolved = match rx.try_recv() {
            Err(TryRecvError::Empty) => return Some(SurfaceEvent::Loading),
            Err(TryRecvError::Closed) => Err(Error::Extractor("stream resolution was cancelled".to_string())),
            Ok(resolved) => resolved,
        };
        self.pending = None;

        let started = resolved.and_then(|url| {
            let process = self.launcher.launch(&url)?;
            self.stream_url = Some(url);
            Ok(process)
        });

        match started {
            Ok(process) => {
                self.process = Some(process);
                Some(SurfaceEvent::Playing)
            }
            Err(e) => {
                warn!(video = ?self.video_id(), error = %e, "YouTube playback failed");
                Some(SurfaceEvent::Failed(e.to_string()))
            }
        }
    }
}

impl PlayerSurface for YouTubeSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::YouTube
    }

    fn load(&mut self, item: &PlaylistItem) -> Result<()> {
        let youtube_id = item
            .youtube_id()
            .ok_or_else(|| Error::Player(format!("'{}' is not a YouTube item", item.id)))?;
        self.load_video_by_id(youtube_id);
        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        // Stream URLs expire, but one that just finished playing is still good
        if let Some(url) = self.stream_url.clone() {
            self.stop();
            self.process = Some(self.launcher.launch(&url)?);
            return Ok(());
        }
        match self.video_id.clone() {
            Some(id) => {
                self.load_video_by_id(&id);
                Ok(())
            }
            None => Err(Error::Player("Nothing loaded to restart".to_string())),
        }
    }

    fn stop(&mut self) {
        self.pending = None;
        self.process = None;
    }

    fn poll(&mut self) -> SurfaceEvent {
        if let Some(event) = self.poll_pending() {
            return event;
        }

        let exit = match self.process.as_mut() {
            None => return SurfaceEvent::Idle,
            Some(process) => process.try_exit(),
        };

        match exit {
            None => SurfaceEvent::Playing,
            Some(exit) => {
                self.process = None;
                match exit {
                    ProcessExit::Finished => SurfaceEvent::Ended,
                    ProcessExit::Crashed(msg) => SurfaceEvent::Failed(msg),
                }
            }
        }
    }
}

impl Drop for YouTubeSurface {
    fn drop(&mut self) {
        info!("YouTube surface destroyed");
    }
}
