use anyhow::{Context, Result};

use fastinvest_core::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. `FASTINVEST_LOG` overrides the configured
/// level; events go to stderr so stdout stays machine-readable.
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = std::env::var("FASTINVEST_LOG").unwrap_or_else(|_| logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid log filter '{filter}'"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}
