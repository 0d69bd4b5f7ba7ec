use thiserror::Error;
use tracing::{subscriber::DefaultGuard, warn};
use tracing_subscriber::{EnvFilter, filter::ParseError, fmt, layer::SubscriberExt};

use crate::options::Verbosity;

const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),
}

/// Installs the console subscriber for the current thread.
///
/// Logging stays active until the returned guard is dropped. `RUST_LOG` takes precedence
/// over `verbosity` when it is set; an unparsable `RUST_LOG` is reported as a warning and
/// `verbosity` is used instead.
pub fn setup_logging(verbosity: Verbosity) -> Result<DefaultGuard, LoggingError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, rejected) = build_filter(directives.as_deref(), verbosity)?;

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .compact()
            .with_target(false)
            .with_timer(fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_writer(std::io::stderr),
    );

    let guard = tracing::subscriber::set_default(subscriber);
    if let Some(error) = rejected {
        warn!(
            error = %error,
            "Ignoring invalid {}, using verbosity {}",
            EnvFilter::DEFAULT_ENV,
            verbosity.directive()
        );
    }
    Ok(guard)
}

/// Filter from the `RUST_LOG` directives when present and valid, else from `verbosity`.
/// The parse error of rejected directives is handed back so it can be logged.
fn build_filter(
    directives: Option<&str>,
    verbosity: Verbosity,
) -> Result<(EnvFilter, Option<ParseError>), LoggingError> {
    match directives.map(EnvFilter::try_new) {
        Some(Ok(filter)) => Ok((filter, None)),
        Some(Err(error)) => Ok((EnvFilter::try_new(verbosity.directive())?, Some(error))),
        None => Ok((EnvFilter::try_new(verbosity.directive())?, None)),
    }
}
