use std::fmt;

use super::{DiagnosticsCreateInfo, DriverError};

/// Name of the instance extension that carries diagnostics messengers.
pub const DEBUG_UTILS_EXTENSION: &str = "VK_EXT_debug_utils";

/// Validation layer requested when diagnostics are enabled.
pub const KHRONOS_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

pub const ENGINE_NAME: &str = "Rosella";
pub const ENGINE_VERSION: Version = Version::new(0, 1, 0);
pub const API_VERSION: Version = Version::new(1, 0, 0);

/// `major.minor.patch` triple.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Application and engine metadata passed to instance creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    pub application_name: String,
    pub application_version: Version,
    pub engine_name: String,
    pub engine_version: Version,
    pub api_version: Version,
}

impl ApplicationInfo {
    pub fn new(application_name: impl Into<String>, application_version: Version) -> Self {
        Self {
            application_name: application_name.into(),
            application_version,
            engine_name: ENGINE_NAME.to_string(),
            engine_version: ENGINE_VERSION,
            api_version: API_VERSION,
        }
    }
}

/// One entry of the driver's layer inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerProperties {
    pub name: String,
    pub description: String,
}

/// Everything the driver needs to create an instance.
#[derive(Debug, Clone, Copy)]
pub struct InstanceCreateInfo<'a> {
    pub application: &'a ApplicationInfo,
    pub extensions: &'a [String],
    pub layers: &'a [String],

    /// Messenger chained into creation; messages emitted while the instance
    /// is being created are delivered here.
    pub diagnostics: Option<&'a DiagnosticsCreateInfo>,
}

/// Boundary between the graphics context and a graphics driver.
pub trait GraphicsDriver {
    /// Top-level driver handle.
    type Instance;

    /// Installed diagnostics messenger.
    type Messenger;

    /// Resolved diagnostics extension entry points.
    type Diagnostics: DiagnosticsExtension<Instance = Self::Instance, Messenger = Self::Messenger>;

    /// Lists the layers the driver can enable.
    fn enumerate_layers(&mut self) -> Result<Vec<LayerProperties>, DriverError>;

    fn create_instance(
        &mut self,
        info: &InstanceCreateInfo<'_>,
    ) -> Result<Self::Instance, DriverError>;

    /// Looks up the diagnostics extension for `instance`.
    ///
    /// Returns `None` when the entry points are not exposed.
    fn load_diagnostics(&mut self, instance: &Self::Instance) -> Option<Self::Diagnostics>;

    fn destroy_instance(&mut self, instance: Self::Instance);
}

/// Install/uninstall entry points of the diagnostics extension.
pub trait DiagnosticsExtension {
    type Instance;
    type Messenger;

    fn create_messenger(
        &self,
        instance: &Self::Instance,
        info: &DiagnosticsCreateInfo,
    ) -> Result<Self::Messenger, DriverError>;

    fn destroy_messenger(&self, instance: &Self::Instance, messenger: Self::Messenger);
}
