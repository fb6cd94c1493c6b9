// src/detection/mod.rs

mod state_machine;
mod stop_line;
mod visibility;

// Re-export public APIs
pub use state_machine::{DebounceEngine, STABLE_COUNT_THRESHOLD};
pub use stop_line::nearest_stop_line;
pub use visibility::{select_upcoming_light, LookAheadWindow};
