#![forbid(unsafe_code)]

//! Global tracing subscriber for native hosts.
//!
//! Library code only emits events; installing a subscriber is the host's
//! choice. `RUST_LOG` overrides the default filter.
//!
//! # Targets
//!
//! - `offergrid.pack`: packing results
//! - `offergrid.assignment`: load and recovery decisions
//! - `offergrid.storage`: backend reads and writes
//! - `offergrid.drag`: drag-swap transitions
//! - `offergrid.pointer`: pointer adapter dispatch

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "warn,offergrid=info";

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber.
///
/// Returns an error if a global subscriber is already set.
pub fn init_subscriber(format: LogFormat) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_env_filter();
    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
    }
}
