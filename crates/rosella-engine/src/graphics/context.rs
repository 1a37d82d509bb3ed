use std::fmt;

use super::diagnostics::default_callback;
use super::driver::{DEBUG_UTILS_EXTENSION, KHRONOS_VALIDATION_LAYER};
use super::{
    ApplicationInfo, DebugCallback, DiagnosticsCreateInfo, DiagnosticsExtension, GraphicsDriver,
    GraphicsError, InstanceCreateInfo, LayerProperties, MessageSeverity, MessageType, Version,
    WgpuDriver,
};

/// Lifecycle state of a [`GraphicsContext`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ContextState {
    /// Construction in progress.
    Starting,
    /// Instance created and, when requested, the messenger installed.
    Ready,
    /// Teardown started or finished; owned handles are being released.
    Stopping,
    /// Construction failed. Terminal.
    Errored,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextState::Starting => "starting",
            ContextState::Ready => "ready",
            ContextState::Stopping => "stopping",
            ContextState::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// Construction parameters for a [`GraphicsContext`].
#[derive(Clone)]
pub struct ContextConfig {
    pub application_name: String,
    pub application_version: Version,

    /// Enable validation layers and the diagnostics messenger.
    pub enable_diagnostics: bool,

    /// Layers that must be present when diagnostics are enabled.
    pub validation_layers: Vec<String>,

    /// Instance extensions required by the windowing system.
    ///
    /// Usually taken from `DisplaySurface::required_extensions`.
    pub required_extensions: Vec<String>,

    /// Severities delivered to the diagnostics callback.
    pub severities: MessageSeverity,

    /// Message categories delivered to the diagnostics callback.
    pub message_types: MessageType,

    /// Replaces the default log-routing callback.
    pub callback: Option<DebugCallback>,
}

impl ContextConfig {
    pub fn new(application_name: impl Into<String>, enable_diagnostics: bool) -> Self {
        Self {
            application_name: application_name.into(),
            enable_diagnostics,
            ..Self::default()
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            application_name: "rosella".to_string(),
            application_version: Version::new(1, 0, 0),
            enable_diagnostics: false,
            validation_layers: vec![KHRONOS_VALIDATION_LAYER.to_string()],
            required_extensions: Vec::new(),
            severities: MessageSeverity::VERBOSE
                | MessageSeverity::WARNING
                | MessageSeverity::ERROR,
            message_types: MessageType::all(),
            callback: None,
        }
    }
}

impl fmt::Debug for ContextConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextConfig")
            .field("application_name", &self.application_name)
            .field("application_version", &self.application_version)
            .field("enable_diagnostics", &self.enable_diagnostics)
            .field("validation_layers", &self.validation_layers)
            .field("required_extensions", &self.required_extensions)
            .field("severities", &self.severities)
            .field("message_types", &self.message_types)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Owns the graphics API instance and its diagnostics messenger.
///
/// Construction either returns a `Ready` context or fails; on failure every
/// handle created during the attempt has already been released.
///
/// Teardown happens in [`shutdown`](Self::shutdown) or on drop: the messenger
/// is uninstalled first (it is only valid while the instance lives), then the
/// instance is destroyed.
pub struct GraphicsContext<D: GraphicsDriver = WgpuDriver> {
    driver: D,
    state: ContextState,
    application: ApplicationInfo,
    layers: Vec<String>,
    extensions: Vec<String>,

    instance: Option<D::Instance>,

    /// Extension entry points resolved once after instance creation and
    /// reused for teardown.
    diagnostics: Option<D::Diagnostics>,

    messenger: Option<D::Messenger>,
}

impl GraphicsContext<WgpuDriver> {
    /// Creates a context on the wgpu driver.
    pub fn new(
        application_name: impl Into<String>,
        enable_diagnostics: bool,
    ) -> Result<Self, GraphicsError> {
        Self::with_driver(
            WgpuDriver::new(),
            ContextConfig::new(application_name, enable_diagnostics),
        )
    }
}

impl<D: GraphicsDriver> GraphicsContext<D> {
    /// Creates a context on `driver`.
    pub fn with_driver(driver: D, config: ContextConfig) -> Result<Self, GraphicsError> {
        let mut ctx = Self {
            driver,
            state: ContextState::Starting,
            application: ApplicationInfo::new(
                config.application_name.clone(),
                config.application_version,
            ),
            layers: Vec::new(),
            extensions: Vec::new(),
            instance: None,
            diagnostics: None,
            messenger: None,
        };
        log::debug!(
            "graphics context '{}' starting (diagnostics: {})",
            ctx.application.application_name,
            config.enable_diagnostics
        );

        match ctx.bring_up(config) {
            Ok(()) => {
                ctx.transition(ContextState::Ready);
                log::info!(
                    "graphics context '{}' ready ({} layer(s), {} extension(s))",
                    ctx.application.application_name,
                    ctx.layers.len(),
                    ctx.extensions.len()
                );
                Ok(ctx)
            }
            Err(err) => {
                log::error!(
                    "graphics context '{}' failed: {err}",
                    ctx.application.application_name
                );
                ctx.release();
                ctx.transition(ContextState::Errored);
                Err(err)
            }
        }
    }

    fn bring_up(&mut self, config: ContextConfig) -> Result<(), GraphicsError> {
        let ContextConfig {
            enable_diagnostics,
            validation_layers,
            required_extensions,
            severities,
            message_types,
            callback,
            ..
        } = config;

        if enable_diagnostics {
            let available = self
                .driver
                .enumerate_layers()
                .map_err(GraphicsError::LayerEnumeration)?;
            let missing = missing_layers(&validation_layers, &available);
            if !missing.is_empty() {
                return Err(GraphicsError::LayersUnavailable { missing });
            }
            self.layers = validation_layers;
        }

        self.extensions = instance_extensions(required_extensions, enable_diagnostics);

        let diagnostics_info = enable_diagnostics.then(|| DiagnosticsCreateInfo {
            severities,
            message_types,
            callback: callback.unwrap_or_else(default_callback),
        });

        let instance = self
            .driver
            .create_instance(&InstanceCreateInfo {
                application: &self.application,
                extensions: &self.extensions,
                layers: &self.layers,
                diagnostics: diagnostics_info.as_ref(),
            })
            .map_err(GraphicsError::InstanceCreation)?;
        let instance = self.instance.insert(instance);

        if let Some(info) = diagnostics_info {
            let diagnostics = self
                .driver
                .load_diagnostics(instance)
                .ok_or(GraphicsError::DiagnosticsUnavailable)?;
            let diagnostics = self.diagnostics.insert(diagnostics);
            let messenger = diagnostics
                .create_messenger(instance, &info)
                .map_err(GraphicsError::MessengerInstall)?;
            self.messenger = Some(messenger);
        }

        Ok(())
    }

    /// Releases the messenger and the instance.
    ///
    /// Idempotent; a context that never reached `Ready` has nothing left to
    /// release.
    pub fn shutdown(&mut self) {
        if self.state != ContextState::Ready {
            return;
        }

        self.transition(ContextState::Stopping);
        self.release();
        log::info!(
            "graphics context '{}' shut down",
            self.application.application_name
        );
    }

    fn release(&mut self) {
        if let Some(messenger) = self.messenger.take() {
            if let (Some(diagnostics), Some(instance)) = (&self.diagnostics, &self.instance) {
                diagnostics.destroy_messenger(instance, messenger);
            }
        }
        self.diagnostics = None;

        if let Some(instance) = self.instance.take() {
            self.driver.destroy_instance(instance);
        }
    }

    fn transition(&mut self, next: ContextState) {
        log::debug!("graphics context: {} -> {}", self.state, next);
        self.state = next;
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Returns the driver instance while the context is `Ready`.
    pub fn instance(&self) -> Option<&D::Instance> {
        self.instance.as_ref()
    }

    pub fn has_messenger(&self) -> bool {
        self.messenger.is_some()
    }

    pub fn application_info(&self) -> &ApplicationInfo {
        &self.application
    }

    pub fn enabled_layers(&self) -> &[String] {
        &self.layers
    }

    pub fn enabled_extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl<D: GraphicsDriver> Drop for GraphicsContext<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Requested layers absent from the driver inventory (exact name match).
fn missing_layers(requested: &[String], available: &[LayerProperties]) -> Vec<String> {
    requested
        .iter()
        .filter(|name| !available.iter().any(|layer| &layer.name == *name))
        .cloned()
        .collect()
}

/// Window-system extensions plus debug-utils when diagnostics are on.
/// Order-preserving, duplicates dropped.
fn instance_extensions(required: Vec<String>, diagnostics: bool) -> Vec<String> {
    let debug_utils = diagnostics.then(|| DEBUG_UTILS_EXTENSION.to_string());

    let mut out: Vec<String> = Vec::with_capacity(required.len() + 1);
    for name in required.into_iter().chain(debug_utils) {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
