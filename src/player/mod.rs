pub mod controller;
pub mod native;
pub mod process;
pub mod surface;
pub mod youtube;

pub use controller::{ControllerEvent, EndOutcome, PlaybackController, SurfaceFactory};
pub use surface::{PlayerSurface, SurfaceEvent, SurfaceKind};
