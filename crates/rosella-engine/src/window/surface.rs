use std::time::{Duration, Instant};

use crate::graphics::{ContextState, GraphicsContext, GraphicsDriver};

use super::{Platform, SurfaceError, WindowConfig, WinitPlatform};

/// Per-frame application logic.
pub type FrameCallback = Box<dyn FnMut() -> anyhow::Result<()>>;

/// Summary of a finished frame loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Iterations that ran every callback.
    pub frames: u64,
    pub elapsed: Duration,
}

/// A native window plus the blocking frame loop that drives it.
///
/// Callbacks are invoked in registration order, once per loop iteration, on
/// the thread that called [`run`](Self::run). Registration takes `&mut self`,
/// so nothing can be registered while the loop is running.
pub struct DisplaySurface<P: Platform = WinitPlatform> {
    config: WindowConfig,
    platform: P,
    window: Option<P::Window>,
    callbacks: Vec<FrameCallback>,
    ran: bool,
}

impl DisplaySurface<WinitPlatform> {
    /// Opens a winit window.
    pub fn new(
        title: impl Into<String>,
        width: u32,
        height: u32,
        resizable: bool,
    ) -> Result<Self, SurfaceError> {
        Self::with_platform(
            WinitPlatform::new(),
            WindowConfig {
                title: title.into(),
                width,
                height,
                resizable,
            },
        )
    }
}

impl<P: Platform> DisplaySurface<P> {
    pub fn with_platform(mut platform: P, config: WindowConfig) -> Result<Self, SurfaceError> {
        platform.init()?;

        let window = match platform.create_window(&config) {
            Ok(window) => window,
            Err(err) => {
                platform.terminate();
                return Err(err);
            }
        };
        log::info!(
            "opened window '{}' ({}x{}, resizable: {})",
            config.title,
            config.width,
            config.height,
            config.resizable
        );

        Ok(Self {
            config,
            platform,
            window: Some(window),
            callbacks: Vec::new(),
            ran: false,
        })
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Instance extensions the graphics context must enable for this window.
    pub fn required_extensions(&self) -> Result<Vec<String>, SurfaceError> {
        let window = self.window.as_ref().ok_or(SurfaceError::Closed)?;
        self.platform.required_extensions(window)
    }

    /// Appends a frame callback. Callbacks run in registration order.
    pub fn on_frame<F>(&mut self, callback: F)
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Runs the frame loop until the window reports a close request.
    ///
    /// Each iteration polls platform events, then invokes every callback in
    /// order. A failing callback stops the loop at once and its error is
    /// returned; later callbacks do not run for that frame.
    ///
    /// The loop runs at most once per surface.
    pub fn run<D: GraphicsDriver>(
        &mut self,
        context: &GraphicsContext<D>,
    ) -> Result<RunStats, SurfaceError> {
        if self.ran {
            return Err(SurfaceError::AlreadyRan);
        }
        if context.state() != ContextState::Ready {
            return Err(SurfaceError::ContextNotReady(context.state()));
        }
        let window = self.window.as_ref().ok_or(SurfaceError::Closed)?;
        self.ran = true;

        log::info!(
            "entering frame loop for '{}' ({} callback(s), context '{}')",
            self.config.title,
            self.callback_count(),
            context.application_info().application_name
        );

        let started = Instant::now();
        let mut frames: u64 = 0;

        loop {
            self.platform.poll_events(window)?;
            if self.platform.close_requested(window) {
                break;
            }

            for (index, callback) in self.callbacks.iter_mut().enumerate() {
                callback().map_err(|err| SurfaceError::Callback {
                    index,
                    frame: frames,
                    source: err.into(),
                })?;
            }

            frames += 1;
            log::trace!("frame {frames} done");
        }

        let stats = RunStats {
            frames,
            elapsed: started.elapsed(),
        };
        log::info!(
            "frame loop for '{}' finished after {} frame(s) in {:.2?}",
            self.config.title,
            stats.frames,
            stats.elapsed
        );
        Ok(stats)
    }

    /// Destroys the window and shuts the windowing subsystem down.
    ///
    /// Idempotent.
    pub fn close(&mut self) {
        if let Some(window) = self.window.take() {
            self.platform.destroy_window(window);
            self.platform.terminate();
            log::debug!("closed window '{}'", self.config.title);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.window.is_none()
    }
}

impl<P: Platform> Drop for DisplaySurface<P> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::graphics::ContextConfig;
    use crate::testing::{MockDriver, MockPlatform, PlatformCall};

    fn context() -> GraphicsContext<MockDriver> {
        GraphicsContext::with_driver(MockDriver::new(), ContextConfig::new("test app", false))
            .unwrap()
    }

    fn surface(platform: MockPlatform) -> DisplaySurface<MockPlatform> {
        DisplaySurface::with_platform(
            platform,
            WindowConfig {
                title: "test window".to_string(),
                width: 320,
                height: 240,
                resizable: true,
            },
        )
        .unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn construction_inits_then_creates_window() {
        let platform = MockPlatform::closing_after(1);
        let journal = platform.journal();
        let surface = surface(platform);

        assert_eq!(surface.title(), "test window");
        assert_eq!((surface.width(), surface.height()), (320, 240));
        assert_eq!(surface.callback_count(), 0);
        assert_eq!(
            journal.calls(),
            vec![
                PlatformCall::Init,
                PlatformCall::CreateWindow(surface.config().clone())
            ]
        );
    }

    #[test]
    fn failed_window_creation_terminates_platform() {
        let platform = MockPlatform::closing_after(1).failing_window();
        let journal = platform.journal();

        let result = DisplaySurface::with_platform(platform, WindowConfig::default());

        assert!(matches!(result, Err(SurfaceError::WindowCreation(_))));
        assert_eq!(journal.calls().last(), Some(&PlatformCall::Terminate));
    }

    #[test]
    fn required_extensions_come_from_platform() {
        let surface = surface(MockPlatform::closing_after(1));
        assert_eq!(
            surface.required_extensions().unwrap(),
            vec!["VK_KHR_surface", "VK_KHR_mock_surface"]
        );
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[test]
    fn callbacks_run_in_registration_order_every_frame() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut surface = surface(MockPlatform::closing_after(6));

        let a = Rc::clone(&order);
        surface.on_frame(move || {
            a.borrow_mut().push('A');
            Ok(())
        });
        let b = Rc::clone(&order);
        surface.on_frame(move || {
            b.borrow_mut().push('B');
            Ok(())
        });

        let stats = surface.run(&context()).unwrap();

        assert_eq!(stats.frames, 5);
        let order = order.borrow();
        assert_eq!(order.len(), 10);
        for pair in order.chunks(2) {
            assert_eq!(pair, ['A', 'B']);
        }
    }

    #[test]
    fn loop_exits_exactly_when_close_is_requested() {
        let platform = MockPlatform::closing_after(4);
        let polls = platform.polls();
        let mut surface = surface(platform);

        let frames_seen = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&frames_seen);
        let counter = Rc::clone(&polls);
        surface.on_frame(move || {
            seen.borrow_mut().push(counter.get());
            Ok(())
        });

        let stats = surface.run(&context()).unwrap();

        assert_eq!(polls.get(), 4);
        assert_eq!(stats.frames, 3);
        assert_eq!(*frames_seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn failing_callback_stops_loop() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut surface = surface(MockPlatform::closing_after(100));

        let first = Rc::clone(&calls);
        let mut frame = 0;
        surface.on_frame(move || {
            frame += 1;
            first.borrow_mut().push("first");
            anyhow::ensure!(frame < 3, "simulated failure");
            Ok(())
        });
        let second = Rc::clone(&calls);
        surface.on_frame(move || {
            second.borrow_mut().push("second");
            Ok(())
        });

        let err = surface.run(&context()).unwrap_err();

        assert!(matches!(err, SurfaceError::Callback { index: 0, frame: 2, .. }));
        assert_eq!(
            *calls.borrow(),
            vec!["first", "second", "first", "second", "first"]
        );
    }

    #[test]
    fn run_happens_once() {
        let mut surface = surface(MockPlatform::closing_after(1));
        let ctx = context();

        assert_eq!(surface.run(&ctx).unwrap().frames, 0);
        assert!(matches!(surface.run(&ctx), Err(SurfaceError::AlreadyRan)));
    }

    #[test]
    fn run_requires_ready_context() {
        let mut surface = surface(MockPlatform::closing_after(1));
        let mut ctx = context();
        ctx.shutdown();

        assert!(matches!(
            surface.run(&ctx),
            Err(SurfaceError::ContextNotReady(ContextState::Stopping))
        ));
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn close_destroys_window_then_terminates_once() {
        let platform = MockPlatform::closing_after(1);
        let journal = platform.journal();
        let mut surface = surface(platform);

        surface.close();
        surface.close();
        assert!(surface.is_closed());
        drop(surface);

        let calls = journal.calls();
        assert_eq!(
            &calls[2..],
            &[PlatformCall::DestroyWindow, PlatformCall::Terminate]
        );
    }

    #[test]
    fn closed_surface_cannot_run() {
        let mut surface = surface(MockPlatform::closing_after(1));
        surface.close();

        assert!(matches!(surface.run(&context()), Err(SurfaceError::Closed)));
        assert!(matches!(surface.required_extensions(), Err(SurfaceError::Closed)));
    }
}
