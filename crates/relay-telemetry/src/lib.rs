//! # Relay Telemetry
//!
//! Structured logging for the signing relay.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RELAY_SERVICE_NAME` | `signing-relay` | Service name in logs |
//! | `RELAY_LOG_LEVEL` | `info` | Log level filter |
//! | `RELAY_JSON_LOGS` | `false` (`true` in containers) | JSON output |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log level directive did not parse.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber was already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Initialize logging for the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)
}

/// Log an event tagged with the emitting subsystem.
///
/// # Example
///
/// ```rust,ignore
/// use relay_telemetry::log_event;
///
/// log_event!(info, "runtime", batch_size = 3, "Relay run complete");
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:ident, $subsystem:expr, $($arg:tt)+) => {
        tracing::$level!(subsystem = $subsystem, $($arg)+)
    };
}
