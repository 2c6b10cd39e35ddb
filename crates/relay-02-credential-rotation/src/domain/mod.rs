//! # Domain Module
//!
//! Rotation errors.

pub mod errors;

pub use errors::*;
