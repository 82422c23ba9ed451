use anyhow::Result;
use winit::dpi::LogicalSize;

use trigon_engine::component::Component;
use trigon_engine::device::GpuInit;
use trigon_engine::logging::{LoggingConfig, init_logging};
use trigon_engine::paint::Color;
use trigon_engine::render::TrianglePair;
use trigon_engine::window::{GameConfig, Runtime};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = GameConfig {
        title: "My Game".to_string(),
        initial_size: LogicalSize::new(800.0, 800.0),
        clear_color: Color::new(3.0, 0.1, 0.1, 1.0),
    };

    // Two overlapping triangle pairs, mirrored around the window center.
    let components: Vec<Box<dyn Component>> = vec![
        Box::new(TrianglePair::new(-0.5)),
        Box::new(TrianglePair::new(0.5)),
    ];

    log::info!("starting {} ({} components)", config.title, components.len());

    Runtime::run(config, GpuInit::default(), components)
}
