//! Installing a log subscriber.
//!
//! The crate reports events through `tracing`. Applications and tests that
//! don’t bring their own subscriber can use [`init_logging`].

use tracing_subscriber::EnvFilter;

/// Setup logging of events reported by the zone loader and resolver.
///
/// Use the RUST_LOG environment variable to override the defaults.
///
/// E.g. To see every record as it is scanned:
///   RUST_LOG=dynzone::zonefile=TRACE
///
/// Or to only see failing plugins and reloads:
///   RUST_LOG=WARN
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}
