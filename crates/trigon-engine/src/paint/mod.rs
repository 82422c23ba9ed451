//! Color model shared between the runtime and renderers.
//!
//! Scope is intentionally small: straight-alpha RGBA, used for the clear
//! color and vertex colors. Premultiplication and gradients are out of scope
//! for this demo.

mod color;

pub use color::Color;
