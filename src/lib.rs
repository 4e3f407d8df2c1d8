//! Terminal video player: a login gate, a tabbed playlist of file/HLS and
//! YouTube videos, and repeat / auto-next handling driven by playlist.json.

pub mod config;
pub mod error;
pub mod player;
pub mod playlist;
pub mod session;
pub mod settings;
pub mod ui;

pub use error::{Error, Result};
pub use playlist::resolver::{compute_next_id, compute_next_id_json};
