//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer
//! and the component list.

mod runtime;

pub use runtime::{GameConfig, Runtime};
