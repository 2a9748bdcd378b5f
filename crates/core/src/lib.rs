pub mod buffer;
pub mod error;
pub mod state;
pub mod surface;

pub use buffer::BoundedBuffer;
pub use error::{Result, WatchError};
pub use state::{GraphScale, GraphState, OverlayState, Readings, Series, Spike};
pub use surface::DisplaySurface;
