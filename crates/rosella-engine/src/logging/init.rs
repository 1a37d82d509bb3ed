use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};

use crate::graphics;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "rosella_engine=debug,rosella::diagnostics=warn,wgpu_hal=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,

    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: LevelFilter,

    /// Most verbose wgpu backend record handed to diagnostics messengers,
    /// whatever the printing filter says.
    pub backend_level: LevelFilter,

    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            backend_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then
/// `config.default_level`. Subsequent calls are ignored.
///
/// wgpu backend records up to `config.backend_level` are also delivered to
/// installed graphics diagnostics messengers.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
            }
        }

        builder.write_style(config.write_style);

        let logger = DiagnosticsLogger {
            inner: builder.build(),
            backend_level: config.backend_level,
        };
        let max_level = logger.max_level();

        // Another logger may already be installed (tests, embedding hosts).
        if log::set_boxed_logger(Box::new(logger)).is_err() {
            return;
        }
        log::set_max_level(max_level);

        log::debug!("logging initialized");
    });
}

/// `env_logger` front that also feeds wgpu backend records to the graphics
/// diagnostics messengers.
struct DiagnosticsLogger {
    inner: env_logger::Logger,
    backend_level: LevelFilter,
}

impl DiagnosticsLogger {
    fn max_level(&self) -> LevelFilter {
        self.inner.filter().max(self.backend_level)
    }

    fn forwards(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.backend_level && graphics::is_backend_target(metadata.target())
    }
}

impl Log for DiagnosticsLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.forwards(metadata) || self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.forwards(record.metadata()) {
            graphics::forward_backend_record(record);
        }
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}
