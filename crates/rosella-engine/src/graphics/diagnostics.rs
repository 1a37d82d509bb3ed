use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

bitflags! {
    /// Severity of a diagnostics message.
    ///
    /// Bit values follow the debug-utils severity bits so driver backends can
    /// pass them through unchanged.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct MessageSeverity: u32 {
        const VERBOSE = 0x0001;
        const INFO    = 0x0010;
        const WARNING = 0x0100;
        const ERROR   = 0x1000;
    }
}

bitflags! {
    /// Category of a diagnostics message.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct MessageType: u32 {
        const GENERAL     = 0x1;
        const VALIDATION  = 0x2;
        const PERFORMANCE = 0x4;
    }
}

/// A single message reported by the driver's diagnostics layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMessage {
    pub severity: MessageSeverity,
    pub kind: MessageType,
    pub text: String,
}

impl DebugMessage {
    pub fn new(severity: MessageSeverity, kind: MessageType, text: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for DebugMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.text)
    }
}

/// Answer returned by a diagnostics callback to the driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CallbackVerdict {
    /// Let the call that triggered the message proceed.
    Continue,
    /// Ask the driver to fail the triggering call. Backends that cannot abort
    /// treat this as `Continue`.
    Abort,
}

/// Callback receiving diagnostics messages.
pub type DebugCallback = Arc<dyn Fn(&DebugMessage) -> CallbackVerdict + Send + Sync>;

/// Messenger description handed to the driver.
///
/// The same description is used twice: chained into instance creation (so
/// messages emitted while the instance is being created are delivered) and
/// for the persistent messenger installed afterwards.
#[derive(Clone)]
pub struct DiagnosticsCreateInfo {
    pub severities: MessageSeverity,
    pub message_types: MessageType,
    pub callback: DebugCallback,
}

impl DiagnosticsCreateInfo {
    /// Delivers `message` if it passes the severity and type filters.
    pub fn dispatch(&self, message: &DebugMessage) -> CallbackVerdict {
        if !self.severities.intersects(message.severity)
            || !self.message_types.intersects(message.kind)
        {
            return CallbackVerdict::Continue;
        }
        (self.callback)(message)
    }
}

impl fmt::Debug for DiagnosticsCreateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsCreateInfo")
            .field("severities", &self.severities)
            .field("message_types", &self.message_types)
            .finish_non_exhaustive()
    }
}

const TARGET: &str = "rosella::diagnostics";

/// Default diagnostics callback.
///
/// Errors go to the error log channel; every other severity is logged at a
/// non-error level. Never aborts the triggering call.
pub fn log_debug_message(message: &DebugMessage) -> CallbackVerdict {
    let severity = message.severity;
    if severity.contains(MessageSeverity::ERROR) {
        log::error!(target: TARGET, "{message}");
    } else if severity.contains(MessageSeverity::WARNING) {
        log::warn!(target: TARGET, "{message}");
    } else if severity.contains(MessageSeverity::INFO) {
        log::info!(target: TARGET, "{message}");
    } else {
        log::debug!(target: TARGET, "{message}");
    }

    CallbackVerdict::Continue
}

pub(crate) fn default_callback() -> DebugCallback {
    Arc::new(log_debug_message)
}
