//! Tracing subscriber setup
//!
//! `RUST_LOG` overrides the level flag when set. JSON output emits one
//! object per event, including the fields of the enclosing request span.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Default filter: the gateway at `level`, dependencies at info
pub fn default_directive(level: &str) -> String {
    format!("jaat_gateway={},info", level)
}

/// Install the global subscriber
pub fn init(level: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        let directive = default_directive("debug");
        assert_eq!(directive, "jaat_gateway=debug,info");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
