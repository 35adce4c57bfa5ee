use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "STOCK_FILTER_LOG";

/// Initialize structured logging based on CLI arguments
///
/// Logs go to stderr so command output on stdout stays parseable.
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Filter directive for the given flags. An explicit level wins over `verbose`;
/// a level naming its own targets (`a=debug,b=info`) is used as-is.
pub fn filter_directive(verbose: bool, log_level: Option<&str>) -> String {
    match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => level.to_string(),
        (_, Some(level)) => format!("stock_filter={}", level),
        (true, None) => "stock_filter=debug".to_string(),
        (false, None) => "stock_filter=warn".to_string(),
    }
}
