use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provides one.
///
/// Engine and replay messages at `info`, everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,glir_engine=info,glir_replay=info";

/// Directive that logs every executed GLIR command.
const COMMAND_TRACE: &str = "glir_engine::glir::interpreter=debug";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "glir_engine=debug,glir_replay=info").
///
/// `trace_commands` appends a directive that logs each command as it runs,
/// on top of whichever filter is in effect.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub trace_commands: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            trace_commands: false,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then [`DEFAULT_FILTER`].
fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    let mut filter = config
        .env_filter
        .clone()
        .or(rust_log)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    if config.trace_commands {
        filter.push(',');
        filter.push_str(COMMAND_TRACE);
    }
    filter
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // A host (tests, embedding apps) may have installed a logger already.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with '{filter}'");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_precedence() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(&config, Some("debug".into())), "debug");

        let config = LoggingConfig {
            env_filter: Some("error".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_filter(&config, Some("debug".into())), "error");
    }

    #[test]
    fn command_trace_is_appended() {
        let config = LoggingConfig {
            env_filter: Some("warn".into()),
            trace_commands: true,
            ..LoggingConfig::default()
        };
        assert_eq!(
            resolve_filter(&config, None),
            "warn,glir_engine::glir::interpreter=debug"
        );
    }
}
