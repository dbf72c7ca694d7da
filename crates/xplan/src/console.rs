//! Console logging for planner runs.
//!
//! Installs a `tracing` formatter filtered by `RUST_LOG`, defaulting to
//! INFO for the xplan crates.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVES: &str = "xplan=info,xplan_explicit=info,xplan_solver=info";

/// Initializes console output.
///
/// Only the first call has effect. A subscriber installed elsewhere is
/// left in place.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    });
}
