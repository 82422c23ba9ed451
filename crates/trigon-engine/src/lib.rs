//! Trigon engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the demo binary:
//! window loop, device/surface management, the drawable-component contract,
//! and the triangle renderer.

pub mod component;
pub mod device;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;

pub mod logging;
