//! Display surface + frame loop.
//!
//! Owns the native window and drives registered frame callbacks until the
//! window is asked to close. The windowing system sits behind [`Platform`];
//! [`WinitPlatform`] is the production backend.

mod error;
mod platform;
mod surface;
mod winit_platform;

pub use error::SurfaceError;
pub use platform::{Platform, WindowConfig};
pub use surface::{DisplaySurface, FrameCallback, RunStats};
pub use winit_platform::{surface_extensions, WinitPlatform};
