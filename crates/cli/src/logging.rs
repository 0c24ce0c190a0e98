use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Maps the `-v` count to a tracing level name.
const fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Builds the filter used by the CLI: only the Edutask crates log, at the
/// level selected by `verbose`.
fn filter_for(verbose: u8) -> EnvFilter {
    let level = level_for(verbose);
    EnvFilter::new(format!("edutask_dao={},edutask_cli={}", level, level))
}

/// Initialize tracing with the given verbosity and output format.
///
/// # Arguments
/// * `json` - Emit one JSON object per event instead of human-readable lines.
/// * `verbose` - 0 for INFO, 1 for DEBUG, 2+ for TRACE.
pub fn init_tracing(json: bool, verbose: u8) {
    let registry = tracing_subscriber::registry().with(filter_for(verbose));

    if json {
        registry
            .with(fmt::layer().json().flatten_event(true))
            .init();
    }
    else {
        registry.with(fmt::layer()).init();
    }
}
