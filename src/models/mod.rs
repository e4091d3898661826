//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod batch;
pub mod outcome;
pub mod run;
pub mod settings;

pub use batch::*;
pub use outcome::*;
pub use run::*;
pub use settings::*;
