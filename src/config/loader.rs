//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a team's leave
//! policy and the engine settings from YAML files.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::TeamPolicy;

use super::types::EngineSettings;

/// Loads and provides access to a team's configuration.
///
/// # Directory Structure
///
/// ```text
/// config/sample_team/
/// ├── policy.yaml   # Team leave policy
/// └── engine.yaml   # Engine-wide analytics settings
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sample_team").unwrap();
/// println!("Team {} allows {} days", loader.policy().team_id, loader.policy().max_leave_per_year);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: TeamPolicy,
    settings: EngineSettings,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/sample_team")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any value is outside its allowed range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<TeamPolicy>(&path.join("policy.yaml"))?;
        if let Err(e) = policy.validate() {
            warn!(team_id = %policy.team_id, error = %e, "Rejected team policy");
            return Err(e);
        }

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        if let Err(e) = settings.validate() {
            warn!(error = %e, "Rejected engine settings");
            return Err(e);
        }

        Ok(Self { policy, settings })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the team policy.
    pub fn policy(&self) -> &TeamPolicy {
        &self.policy
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}
