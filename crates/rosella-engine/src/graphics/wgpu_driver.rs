use std::sync::Arc;

use super::messengers::{broadcast, lock, MessengerRegistry, SharedRegistry};
use super::{
    DebugMessage, DiagnosticsCreateInfo, DiagnosticsExtension, DriverError, GraphicsDriver,
    InstanceCreateInfo, LayerProperties, MessageSeverity, MessageType,
    KHRONOS_VALIDATION_LAYER,
};

/// wgpu-level layer that turns on debug labels and extra backend logging.
pub const DEBUG_LABELS_LAYER: &str = "ROSELLA_debug_labels";

/// wgpu-level layer for GPU-assisted validation. Needs the Khronos layer.
pub const GPU_VALIDATION_LAYER: &str = "ROSELLA_gpu_based_validation";

/// Layers the wgpu driver can enable, with the instance flags behind them.
const LAYERS: &[(&str, wgpu::InstanceFlags, &str)] = &[
    (
        KHRONOS_VALIDATION_LAYER,
        wgpu::InstanceFlags::VALIDATION,
        "backend API validation",
    ),
    (
        DEBUG_LABELS_LAYER,
        wgpu::InstanceFlags::DEBUG,
        "debug labels and extra backend logging",
    ),
    (
        GPU_VALIDATION_LAYER,
        wgpu::InstanceFlags::GPU_BASED_VALIDATION,
        "GPU-assisted validation (slow)",
    ),
];

/// Instance flags that make the diagnostics extension available.
const DIAGNOSTIC_FLAGS: wgpu::InstanceFlags = wgpu::InstanceFlags::VALIDATION
    .union(wgpu::InstanceFlags::DEBUG)
    .union(wgpu::InstanceFlags::GPU_BASED_VALIDATION);

/// Graphics driver backed by `wgpu`.
///
/// The layer inventory comes from the Vulkan loader, plus the wgpu-level
/// layers the enabled backends can honour. Requested layers map onto
/// `wgpu::InstanceFlags`. Platform surface extensions are enabled by the wgpu
/// backends themselves, so the requested extension list is only reported
/// through diagnostics.
///
/// Backend validation output reaches installed messengers once the logger
/// from [`init_logging`](crate::logging::init_logging) is in place.
pub struct WgpuDriver {
    backends: wgpu::Backends,
    messengers: SharedRegistry,
}

impl WgpuDriver {
    pub fn new() -> Self {
        Self::with_backends(wgpu::Backends::all())
    }

    pub fn with_backends(backends: wgpu::Backends) -> Self {
        Self {
            backends,
            messengers: MessengerRegistry::routed(),
        }
    }
}

impl Default for WgpuDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// A wgpu instance and the flags it was created with.
pub struct WgpuInstance {
    raw: wgpu::Instance,
    flags: wgpu::InstanceFlags,
}

impl WgpuInstance {
    pub fn raw(&self) -> &wgpu::Instance {
        &self.raw
    }

    pub fn flags(&self) -> wgpu::InstanceFlags {
        self.flags
    }
}

/// Handle to an installed messenger.
#[derive(Debug, PartialEq, Eq)]
pub struct WgpuMessenger(u64);

impl WgpuMessenger {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Diagnostics entry points of the wgpu driver.
pub struct WgpuDiagnostics {
    messengers: SharedRegistry,
}

impl GraphicsDriver for WgpuDriver {
    type Instance = WgpuInstance;
    type Messenger = WgpuMessenger;
    type Diagnostics = WgpuDiagnostics;

    fn enumerate_layers(&mut self) -> Result<Vec<LayerProperties>, DriverError> {
        let loader_layers = if self.backends.contains(wgpu::Backends::VULKAN) {
            vulkan_layers()?
        } else {
            Vec::new()
        };
        Ok(inventory(self.backends, loader_layers))
    }

    fn create_instance(
        &mut self,
        info: &InstanceCreateInfo<'_>,
    ) -> Result<Self::Instance, DriverError> {
        let flags = instance_flags(info.layers)?;
        let app = info.application;

        if let Some(diagnostics) = info.diagnostics {
            diagnostics.dispatch(&DebugMessage::new(
                MessageSeverity::INFO,
                MessageType::GENERAL,
                format!(
                    "creating instance for {} {} ({} {}, api {}) with {flags:?}",
                    app.application_name,
                    app.application_version,
                    app.engine_name,
                    app.engine_version,
                    app.api_version,
                ),
            ));
            for extension in info.extensions {
                diagnostics.dispatch(&DebugMessage::new(
                    MessageSeverity::VERBOSE,
                    MessageType::GENERAL,
                    format!("extension {extension} is enabled by the backend on demand"),
                ));
            }
        }

        // Backend output during creation goes to the chained messenger only.
        let creation = info
            .diagnostics
            .map(|diagnostics| lock(&self.messengers).register(diagnostics.clone()));

        let raw = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: self.backends,
            flags,
            ..Default::default()
        });

        if let Some(id) = creation {
            lock(&self.messengers).unregister(id);
        }
        log::debug!("wgpu instance created (backends: {:?}, flags: {flags:?})", self.backends);

        Ok(WgpuInstance { raw, flags })
    }

    fn load_diagnostics(&mut self, instance: &Self::Instance) -> Option<Self::Diagnostics> {
        instance
            .flags
            .intersects(DIAGNOSTIC_FLAGS)
            .then(|| WgpuDiagnostics {
                messengers: Arc::clone(&self.messengers),
            })
    }

    fn destroy_instance(&mut self, instance: Self::Instance) {
        let live = lock(&self.messengers).len();
        if live > 0 {
            broadcast(
                &self.messengers,
                &DebugMessage::new(
                    MessageSeverity::WARNING,
                    MessageType::VALIDATION,
                    format!("instance destroyed while {live} messenger(s) are still installed"),
                ),
            );
        }

        drop(instance.raw);
        log::debug!("wgpu instance destroyed");
    }
}

impl DiagnosticsExtension for WgpuDiagnostics {
    type Instance = WgpuInstance;
    type Messenger = WgpuMessenger;

    fn create_messenger(
        &self,
        instance: &Self::Instance,
        info: &DiagnosticsCreateInfo,
    ) -> Result<Self::Messenger, DriverError> {
        let id = lock(&self.messengers).register(info.clone());
        info.dispatch(&DebugMessage::new(
            MessageSeverity::VERBOSE,
            MessageType::GENERAL,
            format!("diagnostics messenger #{id} installed ({:?})", instance.flags),
        ));
        Ok(WgpuMessenger(id))
    }

    fn destroy_messenger(&self, _instance: &Self::Instance, messenger: Self::Messenger) {
        if !lock(&self.messengers).unregister(messenger.0) {
            log::warn!("diagnostics messenger #{} was not installed", messenger.0);
        }
    }
}

/// Layers reported by the system Vulkan loader.
///
/// A missing loader is not an error: it just provides no layers.
fn vulkan_layers() -> Result<Vec<LayerProperties>, DriverError> {
    // SAFETY: loading the loader library has no preconditions beyond it being
    // a genuine Vulkan loader, and the entry outlives the query below.
    let entry = match unsafe { ash::Entry::load() } {
        Ok(entry) => entry,
        Err(e) => {
            log::debug!("vulkan loader unavailable, no loader layers: {e}");
            return Ok(Vec::new());
        }
    };

    // SAFETY: global-level command, valid without an instance.
    let raw = unsafe { entry.enumerate_instance_layer_properties() }.map_err(|e| {
        DriverError::new(format!("vkEnumerateInstanceLayerProperties failed: {e}"))
    })?;

    Ok(raw
        .iter()
        .filter_map(|props| {
            let name = props.layer_name_as_c_str().ok()?;
            let description = props
                .description_as_c_str()
                .map(|d| d.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(LayerProperties {
                name: name.to_string_lossy().into_owned(),
                description,
            })
        })
        .collect())
}

/// Loader layers plus the wgpu-level layers `backends` can honour.
fn inventory(backends: wgpu::Backends, mut layers: Vec<LayerProperties>) -> Vec<LayerProperties> {
    let has_validation = layers.iter().any(|l| l.name == KHRONOS_VALIDATION_LAYER);
    let provided = [
        (DEBUG_LABELS_LAYER, !backends.is_empty()),
        (GPU_VALIDATION_LAYER, has_validation),
    ];

    for (name, available) in provided {
        if !available || layers.iter().any(|l| l.name == name) {
            continue;
        }
        let description = LAYERS
            .iter()
            .find(|(known, _, _)| *known == name)
            .map(|(_, _, description)| description.to_string())
            .unwrap_or_default();
        layers.push(LayerProperties {
            name: name.to_string(),
            description,
        });
    }
    layers
}

fn instance_flags(layers: &[String]) -> Result<wgpu::InstanceFlags, DriverError> {
    layers.iter().try_fold(wgpu::InstanceFlags::empty(), |flags, name| {
        LAYERS
            .iter()
            .find(|(known, _, _)| known == name)
            .map(|(_, flag, _)| flags | *flag)
            .ok_or_else(|| DriverError::new(format!("layer {name} is not provided by wgpu")))
    })
}
