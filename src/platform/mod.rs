//! Platform abstraction layer
//!
//! Browser-independent pieces of the host loop:
//! - Key to input event mapping
//! - Fixed-step frame pacing and FPS tracking

pub mod frame_clock;
pub mod input;

pub use frame_clock::{FpsCounter, FrameClock};
pub use input::InputEvent;
