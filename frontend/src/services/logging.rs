use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber with the given filter directives.
///
/// Falls back to `info` when the directives do not parse. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
