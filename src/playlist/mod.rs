pub mod item;
pub mod library;
pub mod resolver;
pub mod source;

pub use item::{MediaKind, PlaylistItem};
pub use library::{Library, Tab};
pub use resolver::{compute_next_id, Continuation, ContinuationMode, PlaybackMode};
pub use source::PlaylistSource;
