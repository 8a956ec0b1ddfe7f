use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::CliError;

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Logs go to stderr so stdout stays machine-readable.
pub fn setup_tracing(level: &str, json: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter);

    let result = if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|error| CliError::Logging(error.to_string()))
}
