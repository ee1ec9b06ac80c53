#![forbid(unsafe_code)]

//! Test tooling for card stacks.
//!
//! - [`RecordingHost`] - an in-memory host that records every call
//! - [`StackSimulator`] - frame-stepped driver collecting events
//! - [`init_test_logging`] - `tracing` subscriber for tests
//!
//! # Logging
//!
//! `RUST_LOG` selects what is printed (default `warn`). Set
//! `CARDS_LOG_JSON=1` for one JSON object per line.

pub mod recording_host;
pub mod simulator;

pub use recording_host::{HOST_VIEW_BASE, HostCall, RecordingHost};
pub use simulator::{DEFAULT_FRAME, MAX_SETTLE_FRAMES, StackSimulator};

use tracing_subscriber::EnvFilter;

/// Whether test logs should be emitted as JSON lines.
#[must_use]
pub fn json_logging() -> bool {
    std::env::var("CARDS_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Install a test-friendly `tracing` subscriber. Safe to call from every
/// test; only the first call installs anything.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer();
    if json_logging() {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
