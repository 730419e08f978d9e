use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format with timestamp, level, target, and message
    Text,
    /// JSON format with structured fields: timestamp, level, target, fields
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }

    /// Reads `LOG_FORMAT` from the environment or returns the default Text format
    pub fn from_env_or_default() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or(LogFormat::Text)
    }
}

/// Initializes the tracing subscriber with console output and env filter.
///
/// Sets up the tracing infrastructure with:
/// - `fmt::layer()` in text or JSON form, depending on `LOG_FORMAT`
/// - Environment filter for log level control (`RUST_LOG`, default `info`)
/// - Log-to-tracing bridge so the `log` macros used by the data-access code are captured
///
/// This function is safe to call multiple times. If a global subscriber is already
/// set, it returns `Ok(())` without error.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_log::LogTracer;
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Initialize LogTracer bridge first (idempotent - errors are ignored)
    let _ = LogTracer::init();

    let result = match LogFormat::from_env_or_default() {
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!(
                "Tracing subscriber already initialized or failed to initialize: {:?}",
                e
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" TEXT "), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("yaml"), None);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        assert!(init_logging().is_ok());
        assert!(init_logging().is_ok());
    }
}
