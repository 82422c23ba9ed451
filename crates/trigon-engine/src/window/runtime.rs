use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::component::Component;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::{FpsCounter, FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub clear_color: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            initial_size: LogicalSize::new(800.0, 800.0),
            // Red channel deliberately exceeds 1.0; the GPU clamps on clear.
            clear_color: Color::new(3.0, 0.1, 0.1, 1.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Drives a single window through the fixed per-frame sequence:
/// clear pass, component updates, component draws, present, and a
/// once-per-second FPS report in the window title.
pub struct Runtime;

impl Runtime {
    pub fn run(
        config: GameConfig,
        gpu_init: GpuInit,
        components: Vec<Box<dyn Component>>,
    ) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, components);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.failure.take() {
            return Err(err);
        }

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    fps: FpsCounter,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState {
    config: GameConfig,
    gpu_init: GpuInit,
    components: Vec<Box<dyn Component>>,

    entry: Option<WindowEntry>,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: GameConfig, gpu_init: GpuInit, components: Vec<Box<dyn Component>>) -> Self {
        Self {
            config,
            gpu_init,
            components,
            entry: None,
            exit_requested: false,
            failure: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn fail(&mut self, err: anyhow::Error) {
        log::error!("runtime failure: {err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        self.request_exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            fps: FpsCounter::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()?;

        self.entry = Some(entry);
        Ok(())
    }

    /// Initializes every component in list order.
    ///
    /// Runs once the device and surface exist; any failure aborts the run.
    fn initialize_components(&mut self) -> Result<()> {
        let (components, entry) = (&mut self.components, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            anyhow::bail!("component initialization before window creation");
        };

        entry.with_gpu(|gpu| {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            for component in components.iter_mut() {
                component
                    .initialize(&ctx)
                    .context("component initialization failed")?;
            }
            Ok(())
        })
    }

    /// Rebuilds component resources after the surface was reconfigured.
    fn reload_components(&mut self) {
        let (components, entry) = (&mut self.components, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return };

        let result = entry.with_mut(|fields| {
            fields.clock.reset();
            let ctx = RenderCtx::new(
                fields.gpu.device(),
                fields.gpu.queue(),
                fields.gpu.surface_format(),
            );
            for component in components.iter_mut() {
                component.reload(&ctx).context("component reload failed")?;
            }
            Ok(())
        });

        if let Err(err) = result {
            self.fail(err);
        }
    }

    fn destroy_components(&mut self) {
        for component in self.components.iter_mut() {
            component.destroy_resources();
        }
    }

    /// The per-frame sequence: tick the clock, refresh the FPS title, clear,
    /// update and draw every component, present.
    fn render_frame(&mut self) {
        let (components, config, entry) = (&mut self.components, &self.config, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return };

        let mut surface_action = None;

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            if let Some(rate) = fields.fps.tick(ft.dt) {
                fields.window.set_title(&fps_title(&config.title, rate));
            }

            let mut frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    surface_action = Some(fields.gpu.handle_surface_error(err));
                    return;
                }
            };

            // Clear pass; dropped before the encoder is handed to components.
            {
                let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("trigon clear"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(config.clear_color.to_wgpu()),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });
            }

            for component in components.iter_mut() {
                component.update(ft);
            }

            let ctx = RenderCtx::new(
                fields.gpu.device(),
                fields.gpu.queue(),
                fields.gpu.surface_format(),
            );

            // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
            {
                let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
                for component in components.iter_mut() {
                    component.draw(&ctx, &mut target);
                }
            }

            fields.window.pre_present_notify();
            fields.gpu.submit(frame);
        });

        match surface_action {
            Some(SurfaceErrorAction::Reconfigured) => self.reload_components(),
            Some(SurfaceErrorAction::Fatal) => {
                log::error!("fatal surface error; exiting");
                self.request_exit();
            }
            Some(SurfaceErrorAction::SkipFrame) | None => {}
        }
    }

    fn handle_key_down(&mut self, key: PhysicalKey) {
        // Raw key echo; no input abstraction beyond the physical key code.
        match key {
            PhysicalKey::Code(code) => log::debug!("key down: {code:?} ({})", code as u32),
            PhysicalKey::Unidentified(_) => log::debug!("key down: unidentified"),
        }

        if key == PhysicalKey::Code(KeyCode::Escape) {
            log::info!("escape pressed; exiting");
            self.request_exit();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(e);
            event_loop.exit();
            return;
        }

        if let Err(e) = self.initialize_components() {
            self.fail(e);
            event_loop.exit();
            return;
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);

        // Continuous redraw: the demo renders every frame unconditionally.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    self.handle_key_down(event.physical_key);
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                self.render_frame();
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.destroy_components();
        self.entry = None;
        log::info!("runtime shut down");
    }
}

/// Window title carrying the once-per-second FPS report.
fn fps_title(title: &str, rate: f32) -> String {
    format!("{title} - FPS: {rate:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(GameConfig::default(), GpuInit::default(), Vec::new())
    }

    // ── title ─────────────────────────────────────────────────────────────

    #[test]
    fn fps_title_keeps_one_decimal() {
        assert_eq!(fps_title("My Game", 59.94), "My Game - FPS: 59.9");
        assert_eq!(fps_title("trigon", 240.0), "trigon - FPS: 240.0");
    }

    // ── failure routing ───────────────────────────────────────────────────

    #[test]
    fn failure_is_stored_and_requests_exit() {
        let mut state = state();
        state.fail(anyhow::anyhow!("GPU initialization failed for window"));

        assert!(state.exit_requested);
        let stored = state.failure.take().expect("failure must be stored");
        assert!(stored.to_string().contains("GPU initialization failed"));
    }

    #[test]
    fn first_failure_is_preserved() {
        let mut state = state();
        state.fail(anyhow::anyhow!("first"));
        state.fail(anyhow::anyhow!("second"));

        let stored = state.failure.take().expect("failure must be stored");
        assert_eq!(stored.to_string(), "first");
    }
}
