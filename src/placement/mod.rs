pub mod config;
pub mod engine;

pub use config::PlacementConfig;
pub use engine::{Edge, PlacementEngine};
