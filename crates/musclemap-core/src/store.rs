//! Node store adapter.
//!
//! The persistent store is an external collaborator; analysis only sees it
//! through [`NodeStore`]. [`InMemoryStore`] backs the CLI and tests and can be
//! loaded from a JSON or YAML snapshot file.

use crate::error::{Error, Result};
use crate::models::{AnatomyNode, Exercise, ExerciseAnatomyLink, GuideSection};
use crate::utils::{Format, read_file};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only projection of the knowledge base
pub trait NodeStore {
    /// All anatomy nodes
    fn list_anatomy_nodes(&self) -> Result<Vec<AnatomyNode>>;

    /// All exercise ↔ anatomy links
    fn list_exercise_anatomy_links(&self) -> Result<Vec<ExerciseAnatomyLink>>;

    /// Known exercises, if the store tracks them
    fn list_exercises(&self) -> Result<Option<Vec<Exercise>>> {
        Ok(None)
    }

    /// Guide sections with their focus links
    fn list_guide_sections(&self) -> Result<Vec<GuideSection>> {
        Ok(Vec::new())
    }
}

/// Serialized snapshot file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    #[serde(default)]
    pub nodes: Vec<AnatomyNode>,
    #[serde(default)]
    pub links: Vec<ExerciseAnatomyLink>,
    #[serde(default)]
    pub exercises: Option<Vec<Exercise>>,
    #[serde(default)]
    pub guide_sections: Vec<GuideSection>,
}

/// Store backed by plain vectors
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: SnapshotFile,
}

impl InMemoryStore {
    pub fn new(nodes: Vec<AnatomyNode>, links: Vec<ExerciseAnatomyLink>) -> Self {
        Self {
            data: SnapshotFile {
                nodes,
                links,
                ..SnapshotFile::default()
            },
        }
    }

    pub fn with_exercises(mut self, exercises: Vec<Exercise>) -> Self {
        self.data.exercises = Some(exercises);
        self
    }

    pub fn with_guide_sections(mut self, sections: Vec<GuideSection>) -> Self {
        self.data.guide_sections = sections;
        self
    }

    /// Parse a snapshot from a string in the given format
    pub fn from_str_with_format(content: &str, format: Format) -> Result<Self> {
        let data: SnapshotFile = match format {
            Format::Json => serde_json::from_str(content)
                .map_err(|e| Error::parse_error(format!("Invalid snapshot JSON: {}", e)))?,
            Format::Yaml => serde_yaml::from_str(content)
                .map_err(|e| Error::parse_error(format!("Invalid snapshot YAML: {}", e)))?,
        };
        Ok(Self { data })
    }

    /// Load a snapshot file; format is chosen by extension
    pub fn load(path: &Path) -> Result<Self> {
        let format = Format::from_path(path)?;
        let content = read_file(path)?;
        let store = Self::from_str_with_format(&content, format)?;
        log::info!(
            "Loaded snapshot {}: {} nodes, {} links",
            path.display(),
            store.data.nodes.len(),
            store.data.links.len()
        );
        Ok(store)
    }
}

impl NodeStore for InMemoryStore {
    fn list_anatomy_nodes(&self) -> Result<Vec<AnatomyNode>> {
        Ok(self.data.nodes.clone())
    }

    fn list_exercise_anatomy_links(&self) -> Result<Vec<ExerciseAnatomyLink>> {
        Ok(self.data.links.clone())
    }

    fn list_exercises(&self) -> Result<Option<Vec<Exercise>>> {
        Ok(self.data.exercises.clone())
    }

    fn list_guide_sections(&self) -> Result<Vec<GuideSection>> {
        Ok(self.data.guide_sections.clone())
    }
}
