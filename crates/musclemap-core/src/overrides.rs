//! Per-region tab overrides and their editor.
//!
//! The override value is threaded explicitly into tab assembly; nothing reads
//! it from a global location. [`OverrideEditor`] is the read/update surface
//! over the same value and is the only place region ids are validated.

use crate::error::{Error, Result};
use crate::models::NodeId;
use crate::snapshot::AnatomySnapshot;
use crate::utils::{Format, read_file, to_json_string, write_file};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Manual adjustments for one region page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionOverride {
    /// Shown as cross-reference tabs regardless of hierarchy
    pub cross_references: Vec<NodeId>,
    /// Removed from the hierarchical child set before resolution
    pub exclude_children: Vec<NodeId>,
}

impl RegionOverride {
    pub fn is_empty(&self) -> bool {
        self.cross_references.is_empty() && self.exclude_children.is_empty()
    }

    pub fn excludes(&self, child_id: &str) -> bool {
        self.exclude_children.iter().any(|c| c == child_id)
    }
}

/// `{regionId -> RegionOverride}`, read and written wholesale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideConfig {
    regions: BTreeMap<NodeId, RegionOverride>,
}

impl OverrideConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override for a region, if any
    pub fn get(&self, region_id: &str) -> Option<&RegionOverride> {
        self.regions.get(region_id)
    }

    /// Insert or replace a region's override
    pub fn insert(&mut self, region_id: impl Into<String>, value: RegionOverride) {
        self.regions.insert(region_id.into(), value);
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Parse from a string in the given format
    pub fn from_str_with_format(content: &str, format: Format) -> Result<Self> {
        match format {
            Format::Json => serde_json::from_str(content)
                .map_err(|e| Error::config_error(format!("Invalid override JSON: {}", e))),
            Format::Yaml => serde_yaml::from_str(content)
                .map_err(|e| Error::config_error(format!("Invalid override YAML: {}", e))),
        }
    }

    /// Load override configuration; a missing file is an empty configuration
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let format = Format::from_path(path)?;
        let content = read_file(path)?;
        Self::from_str_with_format(&content, format)
    }

    /// Save override configuration (format by extension)
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match Format::from_path(path)? {
            Format::Json => to_json_string(self, "override config")?,
            Format::Yaml => serde_yaml::to_string(self).map_err(|e| {
                Error::config_error(format!("Failed to serialize overrides: {}", e))
            })?,
        };
        write_file(path, &content)
    }
}

/// Read/update interface over an [`OverrideConfig`]
#[derive(Debug, Clone)]
pub struct OverrideEditor {
    config: OverrideConfig,
    known_regions: HashSet<NodeId>,
}

impl OverrideEditor {
    pub fn new(config: OverrideConfig, known_regions: HashSet<NodeId>) -> Self {
        Self {
            config,
            known_regions,
        }
    }

    /// Editor whose known regions are the snapshot's roots
    pub fn for_snapshot(config: OverrideConfig, snapshot: &AnatomySnapshot) -> Self {
        Self::new(config, snapshot.region_ids())
    }

    pub fn config(&self) -> &OverrideConfig {
        &self.config
    }

    pub fn into_config(self) -> OverrideConfig {
        self.config
    }

    fn check_region(&self, region_id: &str) -> Result<()> {
        if self.known_regions.contains(region_id) {
            Ok(())
        } else {
            Err(Error::invalid_override(region_id, "unknown region"))
        }
    }

    /// Current override for a region
    pub fn region(&self, region_id: &str) -> Result<Option<&RegionOverride>> {
        self.check_region(region_id)?;
        Ok(self.config.get(region_id))
    }

    /// Replace a region's manual cross-references
    pub fn set_cross_references(&mut self, region_id: &str, ids: Vec<NodeId>) -> Result<()> {
        self.check_region(region_id)?;
        let entry = self.config.regions.entry(region_id.to_string()).or_default();
        entry.cross_references = dedupe(ids);
        self.prune(region_id);
        Ok(())
    }

    /// Add a manual cross-reference; `false` if it was already present
    pub fn add_cross_reference(&mut self, region_id: &str, node_id: &str) -> Result<bool> {
        self.check_region(region_id)?;
        let entry = self.config.regions.entry(region_id.to_string()).or_default();
        Ok(push_unique(&mut entry.cross_references, node_id))
    }

    /// Remove a manual cross-reference; `false` if it was absent
    pub fn remove_cross_reference(&mut self, region_id: &str, node_id: &str) -> Result<bool> {
        self.check_region(region_id)?;
        let removed = self
            .config
            .regions
            .get_mut(region_id)
            .is_some_and(|entry| remove_value(&mut entry.cross_references, node_id));
        self.prune(region_id);
        Ok(removed)
    }

    /// Exclude a child from the region's hierarchical set
    pub fn exclude_child(&mut self, region_id: &str, child_id: &str) -> Result<bool> {
        self.check_region(region_id)?;
        let entry = self.config.regions.entry(region_id.to_string()).or_default();
        Ok(push_unique(&mut entry.exclude_children, child_id))
    }

    /// Undo an exclusion
    pub fn include_child(&mut self, region_id: &str, child_id: &str) -> Result<bool> {
        self.check_region(region_id)?;
        let removed = self
            .config
            .regions
            .get_mut(region_id)
            .is_some_and(|entry| remove_value(&mut entry.exclude_children, child_id));
        self.prune(region_id);
        Ok(removed)
    }

    /// Drop a region's override entirely. Unknown ids are accepted so stale
    /// entries can be cleaned up.
    pub fn clear_region(&mut self, region_id: &str) -> Option<RegionOverride> {
        self.config.regions.remove(region_id)
    }

    /// Every region in the value that the snapshot doesn't know
    pub fn validate(&self) -> Vec<Error> {
        self.config
            .region_ids()
            .filter(|id| !self.known_regions.contains(*id))
            .map(|id| Error::invalid_override(id, "unknown region"))
            .collect()
    }

    fn prune(&mut self, region_id: &str) {
        if self
            .config
            .regions
            .get(region_id)
            .is_some_and(RegionOverride::is_empty)
        {
            self.config.regions.remove(region_id);
        }
    }
}

fn dedupe(ids: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

fn push_unique(list: &mut Vec<NodeId>, id: &str) -> bool {
    if list.iter().any(|x| x == id) {
        false
    } else {
        list.push(id.to_string());
        true
    }
}

fn remove_value(list: &mut Vec<NodeId>, id: &str) -> bool {
    let before = list.len();
    list.retain(|x| x != id);
    list.len() != before
}
