pub mod config;
pub mod sim_params;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{GameConfig, GridConfig, TimingConfig, EventConfig, InitialConditions, OutputConfig, SessionMode};
pub use sim_params::GameParams;
pub use vecmath::{Vec2i, clamp};
