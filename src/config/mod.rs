//! Configuration loading for the Leave Analytics Engine.
//!
//! This module loads a team's leave policy and the engine-wide analytics
//! settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/sample_team").unwrap();
//! println!("Loaded policy for team: {}", config.policy().team_id);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::EngineSettings;
