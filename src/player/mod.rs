pub mod controller;
pub mod state;
pub mod ticker;

pub use controller::{PlaybackController, PlaybackEvent, PlaybackSnapshot};
pub use state::{EngineSnapshot, PlaybackEngine, PlaybackStatus, Transition};
pub use ticker::{IntervalTickSource, TickSource, TickerHandle};
