//! Recording test doubles for the driver and windowing boundaries.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::graphics::{
    DebugMessage, DiagnosticsCreateInfo, DiagnosticsExtension, DriverError, GraphicsDriver,
    InstanceCreateInfo, LayerProperties, MessageSeverity, MessageType, KHRONOS_VALIDATION_LAYER,
};
use crate::window::{Platform, SurfaceError, WindowConfig};

// ── driver ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    EnumerateLayers,
    CreateInstance {
        layers: Vec<String>,
        extensions: Vec<String>,
        diagnostics: bool,
    },
    LoadDiagnostics,
    CreateMessenger(u32),
    DestroyMessenger(u32),
    DestroyInstance(u32),
}

#[derive(Clone, Default)]
pub struct DriverJournal {
    calls: Rc<RefCell<Vec<DriverCall>>>,
    live: Rc<Cell<usize>>,
}

impl DriverJournal {
    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.borrow().clone()
    }

    /// Instances created and not yet destroyed.
    pub fn live_instances(&self) -> usize {
        self.live.get()
    }

    fn record(&self, call: DriverCall) {
        self.calls.borrow_mut().push(call);
    }
}

pub struct MockDriver {
    journal: DriverJournal,
    layers: Vec<String>,
    fail_instance: bool,
    has_diagnostics: bool,
    fail_messenger: bool,
    next_instance: u32,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            journal: DriverJournal::default(),
            layers: vec![KHRONOS_VALIDATION_LAYER.to_string()],
            fail_instance: false,
            has_diagnostics: true,
            fail_messenger: false,
            next_instance: 0,
        }
    }

    pub fn with_layers(mut self, layers: &[&str]) -> Self {
        self.layers = layers.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn failing_instance(mut self) -> Self {
        self.fail_instance = true;
        self
    }

    pub fn without_diagnostics_extension(mut self) -> Self {
        self.has_diagnostics = false;
        self
    }

    pub fn failing_messenger(mut self) -> Self {
        self.fail_messenger = true;
        self
    }

    pub fn journal(&self) -> DriverJournal {
        self.journal.clone()
    }
}

pub struct MockDiagnostics {
    journal: DriverJournal,
    fail: bool,
    next_messenger: Cell<u32>,
}

impl GraphicsDriver for MockDriver {
    type Instance = u32;
    type Messenger = u32;
    type Diagnostics = MockDiagnostics;

    fn enumerate_layers(&mut self) -> Result<Vec<LayerProperties>, DriverError> {
        self.journal.record(DriverCall::EnumerateLayers);
        Ok(self
            .layers
            .iter()
            .map(|name| LayerProperties {
                name: name.clone(),
                description: "mock layer".to_string(),
            })
            .collect())
    }

    fn create_instance(&mut self, info: &InstanceCreateInfo<'_>) -> Result<u32, DriverError> {
        self.journal.record(DriverCall::CreateInstance {
            layers: info.layers.to_vec(),
            extensions: info.extensions.to_vec(),
            diagnostics: info.diagnostics.is_some(),
        });
        if let Some(diagnostics) = info.diagnostics {
            diagnostics.dispatch(&DebugMessage::new(
                MessageSeverity::VERBOSE,
                MessageType::GENERAL,
                format!("creating instance for {}", info.application.application_name),
            ));
        }
        if self.fail_instance {
            return Err(DriverError::new("mock instance failure"));
        }

        self.next_instance += 1;
        self.journal.live.set(self.journal.live.get() + 1);
        Ok(self.next_instance)
    }

    fn load_diagnostics(&mut self, _instance: &u32) -> Option<MockDiagnostics> {
        self.journal.record(DriverCall::LoadDiagnostics);
        self.has_diagnostics.then(|| MockDiagnostics {
            journal: self.journal.clone(),
            fail: self.fail_messenger,
            next_messenger: Cell::new(0),
        })
    }

    fn destroy_instance(&mut self, instance: u32) {
        self.journal.record(DriverCall::DestroyInstance(instance));
        self.journal.live.set(self.journal.live.get() - 1);
    }
}

impl DiagnosticsExtension for MockDiagnostics {
    type Instance = u32;
    type Messenger = u32;

    fn create_messenger(
        &self,
        _instance: &u32,
        info: &DiagnosticsCreateInfo,
    ) -> Result<u32, DriverError> {
        if self.fail {
            return Err(DriverError::new("mock messenger failure"));
        }
        let id = self.next_messenger.get() + 1;
        self.next_messenger.set(id);
        self.journal.record(DriverCall::CreateMessenger(id));
        info.dispatch(&DebugMessage::new(
            MessageSeverity::VERBOSE,
            MessageType::GENERAL,
            format!("messenger installed (#{id})"),
        ));
        Ok(id)
    }

    fn destroy_messenger(&self, _instance: &u32, messenger: u32) {
        self.journal.record(DriverCall::DestroyMessenger(messenger));
    }
}

// ── windowing ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Init,
    CreateWindow(WindowConfig),
    DestroyWindow,
    Terminate,
}

#[derive(Clone, Default)]
pub struct PlatformJournal {
    calls: Rc<RefCell<Vec<PlatformCall>>>,
}

impl PlatformJournal {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.borrow_mut().push(call);
    }
}

/// Platform whose window asks to close once `close_after` polls happened.
pub struct MockPlatform {
    journal: PlatformJournal,
    polls: Rc<Cell<u32>>,
    close_after: u32,
    fail_window: bool,
}

impl MockPlatform {
    pub fn closing_after(close_after: u32) -> Self {
        Self {
            journal: PlatformJournal::default(),
            polls: Rc::new(Cell::new(0)),
            close_after,
            fail_window: false,
        }
    }

    pub fn failing_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    pub fn journal(&self) -> PlatformJournal {
        self.journal.clone()
    }

    pub fn polls(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.polls)
    }
}

impl Platform for MockPlatform {
    type Window = u32;

    fn init(&mut self) -> Result<(), SurfaceError> {
        self.journal.record(PlatformCall::Init);
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<u32, SurfaceError> {
        self.journal.record(PlatformCall::CreateWindow(config.clone()));
        if self.fail_window {
            return Err(SurfaceError::WindowCreation("mock window failure".into()));
        }
        Ok(7)
    }

    fn required_extensions(&self, _window: &u32) -> Result<Vec<String>, SurfaceError> {
        Ok(vec![
            "VK_KHR_surface".to_string(),
            "VK_KHR_mock_surface".to_string(),
        ])
    }

    fn poll_events(&mut self, _window: &u32) -> Result<(), SurfaceError> {
        self.polls.set(self.polls.get() + 1);
        Ok(())
    }

    fn close_requested(&self, _window: &u32) -> bool {
        self.polls.get() >= self.close_after
    }

    fn destroy_window(&mut self, _window: u32) {
        self.journal.record(PlatformCall::DestroyWindow);
    }

    fn terminate(&mut self) {
        self.journal.record(PlatformCall::Terminate);
    }
}
