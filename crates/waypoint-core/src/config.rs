//! Orchestrator configuration.
//!
//! Loaded from TOML. Every key is optional; omitted keys take the defaults
//! shown below.
//!
//! ```toml
//! # Cap on replanning insertions per plan. Omit for no cap.
//! max_replans = 3
//! # How many candidate products a selection prompt lists.
//! candidate_limit = 5
//!
//! [replan]
//! alternative_qualifier = "alternative"
//! budget_qualifier = "cheaper"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use waypoint_contracts::error::{WaypointError, WaypointResult};

/// Qualifiers appended to the query of an inserted corrective search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplanConfig {
    /// Appended when the failed item was out of stock.
    pub alternative_qualifier: String,
    /// Appended when the failed item was over budget.
    pub budget_qualifier: String,
}

impl Default for ReplanConfig {
    fn default() -> Self {
        Self {
            alternative_qualifier: "alternative".to_string(),
            budget_qualifier: "cheaper".to_string(),
        }
    }
}

/// Top-level orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum replanning insertions per plan; `None` means unbounded.
    pub max_replans: Option<u32>,
    /// Maximum candidates enumerated in a product selection prompt.
    pub candidate_limit: usize,
    pub replan: ReplanConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_replans: None,
            candidate_limit: 5,
            replan: ReplanConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `WaypointError::ConfigError` if the TOML is malformed, has
    /// wrongly typed values, or sets `candidate_limit = 0`.
    pub fn from_toml_str(s: &str) -> WaypointResult<Self> {
        let config: OrchestratorConfig = toml::from_str(s).map_err(|e| WaypointError::ConfigError {
            reason: format!("failed to parse orchestrator TOML: {}", e),
        })?;
        if config.candidate_limit == 0 {
            return Err(WaypointError::ConfigError {
                reason: "candidate_limit must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Read the file at `path` and parse it as orchestrator configuration.
    pub fn from_file(path: &Path) -> WaypointResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WaypointError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
