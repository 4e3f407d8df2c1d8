// Command line / environment configuration

use clap::Parser;
use std::path::PathBuf;

use crate::playlist::source::{PlaylistSource, DEFAULT_PLAYLIST};
use crate::session::Credentials;

#[derive(Parser, Debug, Clone)]
#[command(name = "video-playlist-player", version, about)]
pub struct Config {
    /// playlist.json location (http(s) URL or local path)
    #[arg(long, env = "VPP_PLAYLIST", default_value = DEFAULT_PLAYLIST)]
    pub playlist: String,

    /// Media player command used for both surfaces
    #[arg(long, env = "VPP_PLAYER", default_value = "mpv")]
    pub player: String,

    /// Extra arguments passed to the media player before the URL
    #[arg(long = "player-arg", env = "VPP_PLAYER_ARGS", value_delimiter = ',')]
    pub player_args: Vec<String>,

    /// yt-dlp command used to resolve YouTube stream URLs
    #[arg(long = "yt-dlp", env = "VPP_YT_DLP", default_value = "yt-dlp")]
    pub yt_dlp: String,

    /// Where logs go (defaults to player.log in the config dir)
    #[arg(long, env = "VPP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long, env = "VPP_USERNAME", default_value = "asd")]
    pub username: String,

    #[arg(long, env = "VPP_PASSWORD", default_value = "asd", hide_env_values = true)]
    pub password: String,
}

impl Config {
    pub fn playlist_source(&self) -> PlaylistSource {
        PlaylistSource::parse(&self.playlist)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}
