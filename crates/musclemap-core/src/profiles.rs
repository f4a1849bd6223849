//! Pre-configured analysis profiles
//!
//! - Default: every link role, no result limits
//! - Strict: primary-role links only, weak couplings filtered out
//! - Exploratory: every link role, verbose logging, long partner lists

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::LinkRole;
use std::str::FromStr;

/// Profile selector for pre-configured analysis runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigProfile {
    #[default]
    Default,
    /// Only primary movers count; edges need two shared exercises
    Strict,
    /// Everything counts, debug logging
    Exploratory,
}

impl ConfigProfile {
    /// Create an AnalysisConfig from this profile
    pub fn create_config(self) -> AnalysisConfig {
        let mut config = AnalysisConfig::new();

        match self {
            Self::Default => {}

            Self::Strict => {
                config.included_roles = Some([LinkRole::Primary].into_iter().collect());
                config.min_edge_weight = 2;
                config.max_bridge_results = Some(25);
                config.log_level = "WARN".to_string();
            }

            Self::Exploratory => {
                config.included_roles = None;
                config.max_partners = 50;
                config.log_level = "DEBUG".to_string();
            }
        }

        config
    }

    /// Get profile name
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Exploratory => "exploratory",
        }
    }

    /// Get profile description
    pub fn description(self) -> &'static str {
        match self {
            Self::Default => "All link roles, no result limits",
            Self::Strict => "Primary movers only, weak couplings dropped",
            Self::Exploratory => "All link roles, verbose logging, long partner lists",
        }
    }
}

impl std::fmt::Display for ConfigProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ConfigProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "strict" => Ok(Self::Strict),
            "exploratory" => Ok(Self::Exploratory),
            other => Err(Error::config_error(format!("Unknown profile '{}'", other))),
        }
    }
}
