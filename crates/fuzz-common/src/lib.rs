#![doc = "Common types shared across the aether-fuzz workspace."]

pub mod config;
pub mod error;
pub mod outcome;
pub mod state;
pub mod stats;

pub use config::*;
pub use error::*;
pub use outcome::*;
pub use state::*;
pub use stats::*;
