pub mod agent;
pub mod config;
pub mod env;
pub mod state;
pub mod types;
pub mod worldgen;

pub use agent::{ProbeAgent, TickSnapshot};
pub use config::{MissionConfig, PlannerConfig};
pub use env::SpaceEnv;
pub use state::{Grid, ProbeState};
pub use types::*;
