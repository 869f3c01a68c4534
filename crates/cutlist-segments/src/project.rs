//! Native `.llc` project files with versioning and migration.
//!
//! The file stores the media file name and the cut segments as JSON:
//! `{ "version": 1, "mediaFileName": "...", "cutSegments": [...] }`.
//! Segment IDs and colors are not persisted; they are assigned again when
//! the project is loaded.

use cutlist_core::{CutError, Message, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::segment::{deserialize_tags, Segment, Tags};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Extension used for project files.
pub const PROJECT_EXTENSION: &str = "llc";

/// A segment as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_tags"
    )]
    pub tags: Option<Tags>,
}

impl From<&Segment> for ProjectSegment {
    fn from(segment: &Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            name: segment.name.clone(),
            tags: segment.tags.clone(),
        }
    }
}

impl From<ProjectSegment> for Segment {
    fn from(stored: ProjectSegment) -> Self {
        Segment {
            name: stored.name,
            tags: stored.tags,
            ..Segment::new(stored.start, stored.end)
        }
    }
}

/// Versioned project file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    /// Schema version of the stored data.
    pub version: u32,
    /// File name of the media this project cuts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_file_name: Option<String>,
    #[serde(default)]
    pub cut_segments: Vec<ProjectSegment>,
}

impl ProjectFile {
    /// Create a project file from segments.
    pub fn new(media_file_name: Option<String>, segments: &[Segment]) -> Self {
        Self {
            version: CURRENT_VERSION,
            media_file_name,
            cut_segments: segments.iter().map(ProjectSegment::from).collect(),
        }
    }

    /// Segments with fresh IDs.
    pub fn to_segments(&self) -> Vec<Segment> {
        self.cut_segments.iter().cloned().map(Segment::from).collect()
    }

    /// Pretty-printed JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| CutError::Serialization(format!("Failed to serialize project: {}", e)))
    }

    /// Parse JSON bytes, upgrading older schema versions.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        // version decides which migrations run
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| CutError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = match raw.get("version").and_then(|v| v.as_u64()) {
            None => 0,
            Some(v) => u32::try_from(v)
                .ok()
                .filter(|v| *v <= CURRENT_VERSION)
                .ok_or(CutError::Format(Message::ProjectVersionTooNew {
                    found: v,
                    supported: CURRENT_VERSION,
                }))?,
        };

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| CutError::Serialization(format!("Failed to parse project: {}", e)))
    }

    /// Write the project as pretty JSON.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        info!(path = %path.display(), segments = self.cut_segments.len(), "saved project");
        Ok(())
    }

    /// Read and migrate a project file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let project = Self::from_json(&data)?;
        info!(path = %path.display(), segments = project.cut_segments.len(), "loaded project");
        Ok(project)
    }
}

/// Upgrade raw project JSON one version at a time.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare segment arrays and unversioned objects
                data = match data {
                    serde_json::Value::Array(segments) => serde_json::json!({
                        "version": 1,
                        "cutSegments": segments,
                    }),
                    serde_json::Value::Object(mut map) => {
                        map.insert("version".into(), 1.into());
                        serde_json::Value::Object(map)
                    }
                    _ => {
                        return Err(CutError::Serialization(
                            "Project file is neither an object nor an array".into(),
                        ))
                    }
                };
                debug!("migrated project file from v0");
                version = 1;
            }
            _ => {
                return Err(CutError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
