//! # Relay Runtime Library
//!
//! Composition root for the signing relay.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: subsystems expose ports, the runtime supplies
//!   the adapters and wires them together
//! - **Explicit initialisation**: the payload registry and the credential slot
//!   are built here once and passed down
//!
//! ## Startup
//!
//! ```rust,ignore
//! let config = RelayConfig::from_env();
//! relay_telemetry::init_telemetry(&TelemetryConfig::from_env())?;
//! let runtime = RelayRuntime::new(config, client, keyring)?;
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! runtime.run(shutdown_rx).await;
//! ```

#![warn(missing_docs)]

pub mod container;
pub mod runtime;
pub mod wiring;

pub use container::{ConfigError, RelayConfig};
pub use relay_telemetry::{init_telemetry, TelemetryConfig};
pub use runtime::RelayRuntime;
