//! Storage Layer
//!
//! Settings file loading.

pub mod config;

pub use config::*;
