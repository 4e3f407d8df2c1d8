// Native surface: file and hls items
// The media URL goes straight to the player command.

use tracing::debug;

use crate::error::{Error, Result};
use crate::player::process::{MediaLauncher, MediaProcess, ProcessExit};
use crate::player::surface::{PlayerSurface, SurfaceEvent, SurfaceKind};
use crate::playlist::PlaylistItem;

pub struct NativeSurface {
    launcher: MediaLauncher,
    process: Option<MediaProcess>,
    // Kept after the process exits so restart() can replay it
    url: Option<String>,
}

impl NativeSurface {
    pub fn new(launcher: MediaLauncher) -> Self {
        NativeSurface {
            launcher,
            process: None,
            url: None,
        }
    }

    fn start(&mut self, url: String) -> Result<()> {
        self.stop();
        let process = self.launcher.launch(&url);
        self.url = Some(url);
        self.process = Some(process?);
        Ok(())
    }
}

impl PlayerSurface for NativeSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Native
    }

    fn load(&mut self, item: &PlaylistItem) -> Result<()> {
        let url = item
            .media_url()
            .ok_or_else(|| Error::Player(format!("'{}' has no media URL", item.id)))?;
        self.start(url.to_string())
    }

    fn restart(&mut self) -> Result<()> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| Error::Player("Nothing loaded to restart".to_string()))?;
        debug!(url = %url, "Restarting from the top");
        self.start(url)
    }

    fn stop(&mut self) {
        // Dropping the process kills it
        self.process = None;
    }

    fn poll(&mut self) -> SurfaceEvent {
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
