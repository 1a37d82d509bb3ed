//! Messenger bookkeeping for the wgpu driver.
//!
//! wgpu reports backend and validation output through the `log` facade rather
//! than through a callback. Records under the wgpu targets are turned into
//! [`DebugMessage`]s here and delivered to every installed messenger.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::{DebugMessage, DiagnosticsCreateInfo, MessageSeverity, MessageType};

/// Log targets wgpu reports backend and validation output under.
const BACKEND_TARGETS: &[&str] = &["wgpu_hal", "wgpu_core"];

pub(super) type SharedRegistry = Arc<Mutex<MessengerRegistry>>;

/// Registries that receive forwarded backend records.
static ROUTES: Mutex<Vec<Weak<Mutex<MessengerRegistry>>>> = Mutex::new(Vec::new());

#[derive(Default)]
pub(super) struct MessengerRegistry {
    next_id: u64,
    entries: Vec<(u64, DiagnosticsCreateInfo)>,
}

impl MessengerRegistry {
    /// Creates a shared registry wired to [`forward_backend_record`].
    pub(super) fn routed() -> SharedRegistry {
        let registry = SharedRegistry::default();

        let mut routes = lock(&ROUTES);
        routes.retain(|route| route.strong_count() > 0);
        routes.push(Arc::downgrade(&registry));

        registry
    }

    pub(super) fn register(&mut self, info: DiagnosticsCreateInfo) -> u64 {
        self.next_id += 1;
        self.entries.push((self.next_id, info));
        self.next_id
    }

    pub(super) fn unregister(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn snapshot(&self) -> Vec<DiagnosticsCreateInfo> {
        self.entries.iter().map(|(_, info)| info.clone()).collect()
    }
}

/// Delivers `message` to every messenger in `registry`.
///
/// Callbacks run without the registry lock held, so they may log freely.
pub(super) fn broadcast(registry: &Mutex<MessengerRegistry>, message: &DebugMessage) {
    let targets = lock(registry).snapshot();
    for info in &targets {
        info.dispatch(message);
    }
}

pub(super) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether `target` is a log target wgpu emits backend output under.
pub fn is_backend_target(target: &str) -> bool {
    BACKEND_TARGETS.iter().any(|root| {
        target
            .strip_prefix(root)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Hands a wgpu log record to every installed diagnostics messenger.
///
/// Returns `false` without doing anything when the record does not come from
/// wgpu. Called by the logger installed through
/// [`init_logging`](crate::logging::init_logging).
pub fn forward_backend_record(record: &log::Record<'_>) -> bool {
    if !is_backend_target(record.target()) {
        return false;
    }

    let message = message_from_record(record);
    let registries: Vec<SharedRegistry> =
        lock(&ROUTES).iter().filter_map(Weak::upgrade).collect();
    for registry in &registries {
        broadcast(registry, &message);
    }
    true
}

fn message_from_record(record: &log::Record<'_>) -> DebugMessage {
    let severity = match record.level() {
        log::Level::Error => MessageSeverity::ERROR,
        log::Level::Warn => MessageSeverity::WARNING,
        log::Level::Info => MessageSeverity::INFO,
        log::Level::Debug | log::Level::Trace => MessageSeverity::VERBOSE,
    };

    // wgpu-hal prefixes debug-utils output with the message type flags.
    let text = record.args().to_string();
    let kind = if text.contains("VALIDATION") {
        MessageType::VALIDATION
    } else if text.contains("PERFORMANCE") {
        MessageType::PERFORMANCE
    } else {
        MessageType::GENERAL
    };

    DebugMessage::new(severity, kind, text)
}
