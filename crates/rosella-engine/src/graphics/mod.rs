//! Graphics API bootstrap.
//!
//! This module is responsible for:
//! - creating the graphics API instance, optionally with validation layers
//! - installing the diagnostics messenger and routing its messages to `log`
//! - feeding wgpu's own backend log output to installed messengers
//! - releasing both in a fixed order when the context goes away
//!
//! The driver itself sits behind [`GraphicsDriver`]; [`WgpuDriver`] is the
//! production implementation.

mod context;
mod diagnostics;
mod driver;
mod error;
mod messengers;
mod wgpu_driver;

pub use context::{ContextConfig, ContextState, GraphicsContext};
pub use diagnostics::{
    log_debug_message, CallbackVerdict, DebugCallback, DebugMessage, DiagnosticsCreateInfo,
    MessageSeverity, MessageType,
};
pub use driver::{
    ApplicationInfo, DiagnosticsExtension, GraphicsDriver, InstanceCreateInfo, LayerProperties,
    Version, API_VERSION, DEBUG_UTILS_EXTENSION, ENGINE_NAME, ENGINE_VERSION,
    KHRONOS_VALIDATION_LAYER,
};
pub use error::{DriverError, GraphicsError};
pub use messengers::{forward_backend_record, is_backend_target};
pub use wgpu_driver::{
    WgpuDiagnostics, WgpuDriver, WgpuInstance, WgpuMessenger, DEBUG_LABELS_LAYER,
    GPU_VALIDATION_LAYER,
};
