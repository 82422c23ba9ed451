//! Time subsystem.
//!
//! Frame timing utilities without coupling to the runtime:
//! - one [`FrameClock`] per window; call `tick()` once per presented frame
//! - a [`FpsCounter`] fed from the clock's delta times, reporting a smoothed
//!   frames-per-second value once per second for the window title

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
