#![doc = "Execution harness and campaign controller for aether-fuzz."]

pub mod campaign;
pub mod classifier;
pub mod crash_recorder;
pub mod runner;

pub use campaign::*;
pub use classifier::*;
pub use crash_recorder::*;
pub use runner::*;
