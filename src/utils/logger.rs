use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    let directive = match (verbose, level) {
        (true, _) => "swapi_etl=debug,info".to_string(),
        (false, Some(level)) => format!("swapi_etl={}", level),
        (false, None) => "swapi_etl=info".to_string(),
    };

    // RUST_LOG 優先於命令列設定
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// `json` switches to one JSON object per line, for log shippers.
pub fn init_logger(verbose: bool, level: Option<&str>, json: bool) {
    let filter = default_filter(verbose, level);
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
