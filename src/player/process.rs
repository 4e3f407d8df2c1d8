// External media player process
// Both surfaces hand a URL to the same player command (mpv by default) and
// watch the child to find out when playback ends.

use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MediaLauncher {
    command: String,
    args: Vec<String>,
}

impl MediaLauncher {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        MediaLauncher {
            command: command.into(),
            args,
        }
    }

    pub fn launch(&self, url: &str) -> Result<MediaProcess> {
        info!(player = %self.command, url, "Starting media player");

        // Output is discarded so it can't scribble over the TUI
        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                Error::Player(format!("Failed to run {}: {}. Is it installed?", self.command, e))
            })?;

        Ok(MediaProcess {
            child,
            url: url.to_string(),
        })
    }
}

/// Exit of a finished player process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessExit {
    Finished,
    Crashed(String),
}

pub struct MediaProcess {
    child: Child,
    url: String,
}

impl MediaProcess {
    /// None while the player is still running
    pub fn try_exit(&mut self) -> Option<ProcessExit> {
        match self.child.try_wait() {
            Ok(None) => None,
            Ok(Some(status)) => Some(classify(status)),
            Err(e) => Some(ProcessExit::Crashed(format!("wait failed: {}", e))),
        }
    }

    pub fn kill(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            debug!(url = %self.url, "Killing media player");
            if let Err(e) = self.child.kill() {
                warn!(error = %e, "Failed to kill media player");
            }
        }
        // Reap so we don't leave a zombie behind
        let _ = self.child.wait();
    }
}

impl Drop for MediaProcess {
    fn drop(&mut self) {
        self.kill();
    }
}

fn classify(status: ExitStatus) -> ProcessExit {
    if status.success() {
        ProcessExit::Finished
    } else {
        ProcessExit::Crashed(format!("media player exited with {}", status))
    }
}
