//! # Domain Module
//!
//! Core domain types for Message Signing.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
