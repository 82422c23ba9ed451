//! Drawable-component contract.
//!
//! The runtime owns a flat list of components and drives them in lockstep:
//! `initialize` once after the device and surface exist, then `update` and
//! `draw` every frame, `reload` after the surface is rebuilt, and
//! `destroy_resources` on shutdown.

use anyhow::Result;

use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

/// Contract implemented by everything the runtime can draw.
///
/// Invariant: the runtime never calls `initialize` or `draw` before the GPU
/// device and surface are valid.
pub trait Component {
    /// Compiles shaders and builds GPU resources (pipelines, buffers).
    fn initialize(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Per-frame logic, before any drawing.
    fn update(&mut self, time: FrameTime) {
        let _ = time;
    }

    /// Records this component's GPU commands for one frame.
    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>);

    /// Rebuilds GPU resources after the surface was reconfigured.
    fn reload(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.destroy_resources();
        self.initialize(ctx)
    }

    /// Releases GPU resources. Drawing after this is a no-op until the next
    /// `initialize`/`reload`.
    fn destroy_resources(&mut self);
}
