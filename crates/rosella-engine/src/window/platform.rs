use super::SurfaceError;

/// Window creation parameters.
///
/// Every hint is applied as part of window creation; there is no separate
/// hint step whose ordering could be gotten wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "rosella".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// Boundary between a display surface and the native windowing system.
pub trait Platform {
    type Window;

    /// Initializes the windowing subsystem. Calling it again is a no-op.
    fn init(&mut self) -> Result<(), SurfaceError>;

    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window, SurfaceError>;

    /// Instance extensions a graphics driver must enable to present to
    /// `window`.
    fn required_extensions(&self, window: &Self::Window) -> Result<Vec<String>, SurfaceError>;

    /// Processes pending events without blocking.
    fn poll_events(&mut self, window: &Self::Window) -> Result<(), SurfaceError>;

    fn close_requested(&self, window: &Self::Window) -> bool;

    fn destroy_window(&mut self, window: Self::Window);

    /// Shuts the subsystem down. Windows must already be destroyed.
    fn terminate(&mut self);
}
