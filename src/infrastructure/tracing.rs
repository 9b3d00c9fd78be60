use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize tracing to stdout.
/// Priority: DNSCHECK_LOG env > verbose flag > default (info)
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DNSCHECK_LOG").unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("dnscheck={}", level))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
