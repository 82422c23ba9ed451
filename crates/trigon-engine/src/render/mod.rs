//! GPU rendering subsystem.
//!
//! Components issue GPU commands via wgpu through the small seam defined
//! here. Each component is responsible for its own GPU resources (pipeline,
//! buffers).
//!
//! Convention:
//! - geometry lives directly in normalized device coordinates
//! - the runtime records the clear pass; component passes load the existing
//!   contents (`LoadOp::Load`)

mod ctx;
pub mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
pub use triangle::TrianglePair;
