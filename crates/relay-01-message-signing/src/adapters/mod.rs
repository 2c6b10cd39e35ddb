//! # Adapters
//!
//! In-process implementations of the outbound ports.

mod chain_client;
mod keyring;

pub use chain_client::InMemoryChainClient;
pub use keyring::LocalKeyring;
