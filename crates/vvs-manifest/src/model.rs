//! Manifest document types, shaped after the viewer's state-file schema.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use vvs_core::AppError;

use crate::ids::DataSourceId;

/// Must be a version the viewer can migrate to its current schema.
pub const MANIFEST_VERSION: &str = "6.1.1";

/// Dataset id used when callers do not name one.
pub const DEFAULT_DATASET_ID: &str = "volume";

pub type Point3 = [f64; 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub data_sources: Vec<DataSource>,
    pub datasets: Vec<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_selection: Option<String>,
    #[serde(default)]
    pub tools: BTreeMap<String, ToolGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segment_groups: Vec<SegmentGroupEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataSource {
    Uri {
        id: DataSourceId,
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Several raw sources feeding one logical dataset.
    Collection {
        id: DataSourceId,
        sources: Vec<DataSourceId>,
    },
}

impl DataSource {
    pub fn id(&self) -> DataSourceId {
        match self {
            Self::Uri { id, .. } | Self::Collection { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub data_source_id: DataSourceId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolGroup {
    #[serde(default)]
    pub tools: Vec<ToolEntry>,
    #[serde(default)]
    pub labels: BTreeMap<String, Label>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEntry {
    #[serde(rename = "imageID")]
    pub image_id: String,
    pub frame_of_reference: FrameOfReference,
    pub slice: i64,
    pub label: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOfReference {
    pub plane_origin: Point3,
    pub plane_normal: Point3,
}

impl Default for FrameOfReference {
    fn default() -> Self {
        Self {
            plane_origin: [0.0, 0.0, 0.0],
            plane_normal: [0.0, 0.0, 1.0],
        }
    }
}

/// Tool geometry: two points for rectangles and rulers, a point list for
/// polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Span {
        #[serde(rename = "firstPoint")]
        first_point: Point3,
        #[serde(rename = "secondPoint")]
        second_point: Point3,
    },
    Polyline {
        points: Vec<Point3>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub label_name: String,
    pub color: String,
    pub stroke_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentGroupEntry {
    pub id: String,
    /// Set for groups whose mask is fetched by URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<DataSourceId>,
    /// Archive-relative path of an embedded mask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub metadata: SegmentGroupMetadata,
    /// Embedded mask bytes; never part of the JSON encoding.
    #[serde(skip)]
    pub payload: Option<EmbeddedPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPayload {
    pub bytes: Vec<u8>,
    /// File extension without the leading dot, e.g. `seg.nii.gz`.
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentGroupMetadata {
    pub name: String,
    pub parent_image: String,
    pub segments: Segments,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segments {
    pub order: Vec<u32>,
    pub by_value: BTreeMap<u32, SegmentMask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMask {
    pub value: u32,
    pub name: String,
    pub color: [u8; 4],
    pub visible: bool,
}

impl Manifest {
    pub fn data_source(&self, id: DataSourceId) -> Option<&DataSource> {
        self.data_sources.get(id as usize).filter(|ds| ds.id() == id)
    }

    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn tool_group(&self, group_name: &str) -> Option<&ToolGroup> {
        self.tools.get(group_name)
    }

    /// Number of segment groups carrying an embedded payload.
    pub fn embedded_payload_count(&self) -> usize {
        self.segment_groups
            .iter()
            .filter(|entry| entry.payload.is_some())
            .count()
    }

    /// Check the referential invariants of the document.
    ///
    /// Data source ids must equal their position; every id referenced by a
    /// collection, dataset, or segment group must exist; dataset ids must be
    /// unique; tool entries must name a label of their group.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (position, source) in self.data_sources.iter().enumerate() {
            if source.id() as usize != position {
                return Err(invalid(format!(
                    "data source at position {position} has id {}",
                    source.id()
                )));
            }
            if let DataSource::Collection { id, sources } = source {
                if sources.is_empty() {
                    return Err(invalid(format!("collection {id} has no members")));
                }
                for member in sources {
                    if *member >= *id {
                        return Err(invalid(format!(
                            "collection {id} references data source {member} not added before it"
                        )));
                    }
                }
            }
        }

        let mut dataset_ids = HashSet::new();
        for dataset in &self.datasets {
            if !dataset_ids.insert(dataset.id.as_str()) {
                return Err(invalid(format!("duplicate dataset id '{}'", dataset.id)));
            }
            if self.data_source(dataset.data_source_id).is_none() {
                return Err(invalid(format!(
                    "dataset '{}' references data source {}",
                    dataset.id, dataset.data_source_id
                )));
            }
        }

        if let Some(primary) = &self.primary_selection {
            if !dataset_ids.contains(primary.as_str()) {
                return Err(invalid(format!(
                    "primary selection '{primary}' is not a dataset"
                )));
            }
        }

        for (group_name, group) in &self.tools {
            for entry in &group.tools {
                if !group.labels.contains_key(&entry.label) {
                    return Err(invalid(format!(
                        "{group_name} entry uses unknown label '{}'",
                        entry.label
                    )));
                }
            }
        }

        for entry in &self.segment_groups {
            match (entry.data_source_id, &entry.path, &entry.payload) {
                (Some(id), _, _) => {
                    if self.data_source(id).is_none() {
                        return Err(invalid(format!(
                            "segment group '{}' references data source {id}",
                            entry.id
                        )));
                    }
                }
                (None, None, None) => {
                    return Err(invalid(format!(
                        "segment group '{}' has neither a data source nor a payload",
                        entry.id
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> anyhow::Error {
    AppError::InvalidManifest(message).into()
}
