// ==========================================
// PLAYER SURFACE TRAIT
// ==========================================
// A surface is "the thing on screen that plays the current item".
// There are two of them:
// - NativeSurface:  file/hls items, URL handed straight to the media player
// - YouTubeSurface: youtube items, stream URL resolved with yt-dlp first
//
// The controller only ever talks to this trait, so tests can swap in a
// scripted surface without launching any processes.

use crate::error::Result;
use crate::playlist::PlaylistItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Native,
    YouTube,
}

/// What a surface reports when polled by the UI loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Nothing loaded
    Idle,
    /// Resolving / buffering before playback starts
    Loading,
    Playing,
    /// The item played to completion
    Ended,
    /// The item could not be played
    Failed(String),
}

pub trait PlayerSurface {
    fn kind(&self) -> SurfaceKind;

    /// Replace whatever is playing with `item` and start it
    fn load(&mut self, item: &PlaylistItem) -> Result<()>;

    /// Play the loaded item again from the start
    fn restart(&mut self) -> Result<()>;

    fn stop(&mut self);

    /// Non-blocking. Ended/Failed are reported once per load.
    fn poll(&mut self) -> SurfaceEvent;
}
