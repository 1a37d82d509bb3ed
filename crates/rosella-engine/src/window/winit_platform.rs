use std::time::Duration;

use raw_window_handle::{HasDisplayHandle, RawDisplayHandle};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use super::{Platform, SurfaceError, WindowConfig};

/// Pumps allowed for the platform to resume the loop and hand out a window.
const CREATE_ATTEMPTS: usize = 16;

/// `winit` windowing backend.
///
/// The event loop is pumped without blocking instead of handing control to
/// `run_app`, so the caller keeps ownership of the loop.
///
/// winit allows one event loop per process: after [`terminate`](Platform::terminate)
/// a new `WinitPlatform` cannot be initialized again.
#[derive(Default)]
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    handler: PumpHandler,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_initialized() -> SurfaceError {
    SurfaceError::Platform("windowing subsystem is not initialized".into())
}

#[derive(Default)]
struct PumpHandler {
    active: bool,
    pending: Option<WindowAttributes>,
    created: Option<Result<Window, OsError>>,
    window: Option<WindowId>,
    close_requested: bool,
}

impl PumpHandler {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attrs) = self.pending.take() {
            self.created = Some(event_loop.create_window(attrs));
        }
    }
}

impl ApplicationHandler for PumpHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.active = true;
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.active {
            self.create_pending(event_loop);
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        // Resize and input events are drained but not acted on here.
        if let WindowEvent::CloseRequested = event {
            if self.window == Some(window_id) {
                self.close_requested = true;
            }
        }
    }
}

impl Platform for WinitPlatform {
    type Window = Window;

    fn init(&mut self) -> Result<(), SurfaceError> {
        if self.event_loop.is_none() {
            let event_loop = EventLoop::new().map_err(|e| {
                SurfaceError::Platform(format!("failed to create winit event loop: {e}"))
            })?;
            self.event_loop = Some(event_loop);
            log::debug!("winit event loop created");
        }
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<Window, SurfaceError> {
        let attrs = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);
        self.handler.pending = Some(attrs);

        for _ in 0..CREATE_ATTEMPTS {
            let event_loop = self.event_loop.as_mut().ok_or_else(not_initialized)?;
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler)
            {
                self.handler.pending = None;
                return Err(SurfaceError::WindowCreation(format!(
                    "event loop exited with code {code}"
                )));
            }

            if let Some(created) = self.handler.created.take() {
                let window = created.map_err(|e| SurfaceError::WindowCreation(e.to_string()))?;
                self.handler.window = Some(window.id());
                self.handler.close_requested = false;
                return Ok(window);
            }
        }

        self.handler.pending = None;
        Err(SurfaceError::WindowCreation(
            "platform never resumed the event loop".into(),
        ))
    }

    fn required_extensions(&self, window: &Window) -> Result<Vec<String>, SurfaceError> {
        let handle = window
            .display_handle()
            .map_err(|e| SurfaceError::Platform(format!("display handle unavailable: {e}")))?;
        let raw = handle.as_raw();

        surface_extensions(raw)
            .map(|names| names.iter().map(|name| name.to_string()).collect())
            .ok_or_else(|| SurfaceError::Platform(format!("no surface extension for {raw:?}")))
    }

    fn poll_events(&mut self, _window: &Window) -> Result<(), SurfaceError> {
        let event_loop = self.event_loop.as_mut().ok_or_else(not_initialized)?;
        if let PumpStatus::Exit(_) =
            event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler)
        {
            self.handler.close_requested = true;
        }
        Ok(())
    }

    fn close_requested(&self, window: &Window) -> bool {
        self.handler.close_requested && self.handler.window == Some(window.id())
    }

    fn destroy_window(&mut self, window: Window) {
        self.handler.window = None;
        drop(window);
    }

    fn terminate(&mut self) {
        self.handler = PumpHandler::default();
        if self.event_loop.take().is_some() {
            log::debug!("winit event loop dropped");
        }
    }
}

/// Instance extensions needed to create a presentable surface on `display`.
pub fn surface_extensions(display: RawDisplayHandle) -> Option<&'static [&'static str]> {
    let names: &'static [&'static str] = match display {
        RawDisplayHandle::Windows(_) => &["VK_KHR_surface", "VK_KHR_win32_surface"],
        RawDisplayHandle::Wayland(_) => &["VK_KHR_surface", "VK_KHR_wayland_surface"],
        RawDisplayHandle::Xlib(_) => &["VK_KHR_surface", "VK_KHR_xlib_surface"],
        RawDisplayHandle::Xcb(_) => &["VK_KHR_surface", "VK_KHR_xcb_surface"],
        RawDisplayHandle::Android(_) => &["VK_KHR_surface", "VK_KHR_android_surface"],
        RawDisplayHandle::AppKit(_) | RawDisplayHandle::UiKit(_) => {
            &["VK_KHR_surface", "VK_EXT_metal_surface"]
        }
        _ => return None,
    };
    Some(names)
}

#[cfg(test)]
mod tests {
    use raw_window_handle::{
        AppKitDisplayHandle, WebDisplayHandle, WindowsDisplayHandle, XlibDisplayHandle,
    };

    use super::*;

    #[test]
    fn windows_needs_win32_surface() {
        let names = surface_extensions(RawDisplayHandle::Windows(WindowsDisplayHandle::new()));
        assert_eq!(names, Some(&["VK_KHR_surface", "VK_KHR_win32_surface"][..]));
    }

    #[test]
    fn xlib_needs_xlib_surface() {
        let names = surface_extensions(RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0)));
        assert_eq!(names, Some(&["VK_KHR_surface", "VK_KHR_xlib_surface"][..]));
    }

    #[test]
    fn apple_platforms_go_through_metal() {
        let names = surface_extensions(RawDisplayHandle::AppKit(AppKitDisplayHandle::new()));
        assert!(names.is_some_and(|n| n.contains(&"VK_EXT_metal_surface")));
    }

    #[test]
    fn web_has_no_surface_extension() {
        assert_eq!(
            surface_extensions(RawDisplayHandle::Web(WebDisplayHandle::new())),
            None
        );
    }
}
