use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;
use crate::error::{ContractError, ContractResult};

/// Installs the global subscriber. `RUST_LOG` wins over `level`. Logs go to
/// stderr so the summary on stdout stays clean.
pub fn init_tracing(level: &str, format: LogFormat) -> ContractResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| ContractError::InvalidArgument(format!("invalid log level '{level}': {e}")))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    result.map_err(|e| {
        ContractError::InvalidArgument(format!("failed to initialize tracing subscriber: {e}"))
    })
}
