//! Configuration types for analysis runs.
//!
//! Follows a builder pattern for complex configuration with validation.

use crate::error::{Error, Result};
use crate::models::LinkRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Settings shared by every analysis component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Link roles that count toward co-activation; `None` means all roles
    pub included_roles: Option<BTreeSet<LinkRole>>,
    /// Edges lighter than this are not materialized
    pub min_edge_weight: u32,
    /// Truncate ranked bridge lists after this many entries
    pub max_bridge_results: Option<usize>,
    /// Default length of "trained together" partner lists
    pub max_partners: usize,
    /// Exercise shards for parallel pair counting; 1 counts sequentially
    pub shards: usize,
    pub log_level: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            included_roles: None,
            min_edge_weight: 1,
            max_bridge_results: None,
            max_partners: 10,
            shards: 1,
            log_level: "INFO".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Whether a link with this role contributes to the graph
    pub fn includes_role(&self, role: LinkRole) -> bool {
        self.included_roles
            .as_ref()
            .is_none_or(|roles| roles.contains(&role))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_edge_weight == 0 {
            return Err(Error::config_error("min_edge_weight must be at least 1"));
        }

        if let Some(roles) = &self.included_roles
            && roles.is_empty()
        {
            return Err(Error::config_error(
                "included_roles must name at least one role (omit it to include all)",
            ));
        }

        if self.shards == 0 {
            return Err(Error::config_error("shards must be at least 1"));
        }

        if self.max_bridge_results == Some(0) {
            return Err(Error::config_error("max_bridge_results must be positive"));
        }

        Ok(())
    }
}

/// Builder for AnalysisConfig
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Restrict co-activation to the given roles
    pub fn roles(mut self, roles: impl IntoIterator<Item = LinkRole>) -> Self {
        self.config.included_roles = Some(roles.into_iter().collect());
        self
    }

    /// Set min_edge_weight
    pub fn min_edge_weight(mut self, weight: u32) -> Self {
        self.config.min_edge_weight = weight;
        self
    }

    /// Set max_bridge_results
    pub fn max_bridge_results(mut self, limit: usize) -> Self {
        self.config.max_bridge_results = Some(limit);
        self
    }

    /// Set max_partners
    pub fn max_partners(mut self, limit: usize) -> Self {
        self.config.max_partners = limit;
        self
    }

    /// Set shards
    pub fn shards(mut self, shards: usize) -> Self {
        self.config.shards = shards;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for AnalysisConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
