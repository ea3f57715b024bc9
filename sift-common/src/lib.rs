//! Sift IR Toolkit - Common Types and Utilities
//!
//! This crate contains shared types and error definitions used across
//! all components of the Sift IR toolkit.

pub mod error;
pub mod types;

pub use error::SiftError;
pub use types::*;
