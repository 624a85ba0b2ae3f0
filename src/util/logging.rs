//! Logging setup for hosts embedding the adapter.

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber that writes to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks between debug and
/// info for this crate. Returns `false` if a global subscriber was already
/// installed, which leaves that subscriber in place.
pub fn init_logging(verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("quay=debug")
        } else {
            EnvFilter::new("quay=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
