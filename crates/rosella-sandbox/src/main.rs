use anyhow::{Context, Result};
use rosella_engine::curve::interpolate3;
use rosella_engine::graphics::{ContextConfig, GraphicsContext, WgpuDriver};
use rosella_engine::logging::{init_logging, LoggingConfig};
use rosella_engine::window::DisplaySurface;

/// Frames per pulse of the demo brightness curve.
const PULSE_PERIOD: u32 = 60;

/// Log every this many frames.
const LOG_EVERY: u32 = 15;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut surface = DisplaySurface::new("Rosella Sandbox", 800, 600, false)
        .context("failed to open display surface")?;

    let config = ContextConfig {
        required_extensions: surface
            .required_extensions()
            .context("failed to query surface extensions")?,
        ..ContextConfig::new("Rosella Sandbox", cfg!(debug_assertions))
    };
    let context = GraphicsContext::with_driver(WgpuDriver::new(), config)
        .context("failed to create graphics context")?;

    // Rises from 0 to 1 at mid-period and back down.
    let half = PULSE_PERIOD as f32 / 2.0;
    let pulse = interpolate3((0.0, 0.0), (half, 1.0), (PULSE_PERIOD as f32, 0.0))?;

    let mut frame: u32 = 0;
    surface.on_frame(move || {
        if frame % LOG_EVERY == 0 {
            let brightness = pulse((frame % PULSE_PERIOD) as f32);
            log::info!("main loop: frame {frame}, brightness {brightness:.2}");
        }
        frame = frame.wrapping_add(1);
        Ok(())
    });

    let stats = surface.run(&context)?;
    log::info!("exited after {} frame(s)", stats.frames);

    Ok(())
}
