use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_DIRECTIVE: &str = "warn";

/// `--log-level` wins over `RUST_LOG`; a malformed `RUST_LOG` falls back
/// to the default rather than failing the run.
fn resolve_filter(directives: Option<&str>) -> Result<EnvFilter> {
    match directives {
        Some(d) => EnvFilter::try_new(d).with_context(|| format!("Invalid log level: {d}")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
    }
}

/// Install the global subscriber, writing to stderr.
pub fn init(directives: Option<&str>) -> Result<()> {
    let filter = resolve_filter(directives)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directive_is_used() {
        let filter = resolve_filter(Some("kmcgen_compiler=debug")).unwrap();
        assert_eq!(filter.to_string(), "kmcgen_compiler=debug");
    }

    #[test]
    fn malformed_directive_is_an_error() {
        assert!(resolve_filter(Some("kmcgen=loud")).is_err());
    }
}
