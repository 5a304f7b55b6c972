use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise debug mode shows this crate's
/// routing and cache events, and normal mode shows warnings only. Returns
/// `false` if a subscriber was already installed.
pub fn init_tracing(debug: bool) -> bool {
    let default_filter = if debug {
        "warn,hansard_context=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
