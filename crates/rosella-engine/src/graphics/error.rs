/// Failure reported by a driver call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that abort graphics context construction.
///
/// Variants fall in two classes:
/// - **configuration** (`LayersUnavailable`): detected before any driver
///   resource exists
/// - **driver** (everything else): a driver call failed; resources created by
///   the same attempt were released before the error was returned
#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("requested diagnostics layers are not available: {}", .missing.join(", "))]
    LayersUnavailable { missing: Vec<String> },

    // ── Driver ───────────────────────────────────────────────────────

    #[error("failed to enumerate instance layers")]
    LayerEnumeration(#[source] DriverError),

    #[error("failed to create graphics instance")]
    InstanceCreation(#[source] DriverError),

    #[error("diagnostics extension entry points are not present on this driver")]
    DiagnosticsUnavailable,

    #[error("failed to install diagnostics messenger")]
    MessengerInstall(#[source] DriverError),
}

impl GraphicsError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GraphicsError::LayersUnavailable { .. })
    }

    pub fn is_driver(&self) -> bool {
        !self.is_configuration()
    }
}
