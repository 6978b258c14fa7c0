#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless driver for the Quiver gameplay core.

pub mod config;
pub mod script;
pub mod simulation;

pub use config::{ConfigError, EnhancementAssets, GameConfig};
pub use script::RandomInput;
pub use simulation::{Simulation, Stats};
