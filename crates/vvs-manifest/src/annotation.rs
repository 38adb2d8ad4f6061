//! Annotation input and its translation into tool entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vvs_core::AppError;

use crate::model::{
    DEFAULT_DATASET_ID, FrameOfReference, Geometry, Label, Manifest, Point3, ToolEntry, ToolGroup,
};

const DEFAULT_LABEL_COLOR: &str = "#ff0000";
const DEFAULT_STROKE_WIDTH: u32 = 2;

/// Caller-supplied annotation, in the JSON shape the session tooling accepts.
///
/// ```json
/// {"type": "rectangle", "firstPoint": [0, 0, 0], "secondPoint": [5, 5, 0],
///  "slice": 12, "label": "tumor", "color": "#00ff00"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "imageID", skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_point: Option<Point3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_point: Option<Point3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point3>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plane_normal: Option<Point3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plane_origin: Option<Point3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Annotation kinds the viewer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Rectangle,
    Ruler,
    Polygon,
}

impl ToolKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "rectangle" => Some(Self::Rectangle),
            "ruler" => Some(Self::Ruler),
            "polygon" => Some(Self::Polygon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ruler => "ruler",
            Self::Polygon => "polygon",
        }
    }

    /// Key of this kind's group under `tools`.
    pub fn group_name(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangles",
            Self::Ruler => "rulers",
            Self::Polygon => "polygons",
        }
    }

    fn geometry(&self, annotation: &Annotation) -> anyhow::Result<Geometry> {
        match self {
            Self::Polygon => {
                let points = annotation
                    .points
                    .clone()
                    .ok_or_else(|| self.missing("points"))?;
                Ok(Geometry::Polyline { points })
            }
            Self::Rectangle | Self::Ruler => {
                let first_point = annotation
                    .first_point
                    .ok_or_else(|| self.missing("firstPoint"))?;
                let second_point = annotation
                    .second_point
                    .ok_or_else(|| self.missing("secondPoint"))?;
                Ok(Geometry::Span {
                    first_point,
                    second_point,
                })
            }
        }
    }

    fn missing(&self, field: &str) -> anyhow::Error {
        AppError::MissingGeometry {
            kind: self.as_str().to_string(),
            field: field.to_string(),
        }
        .into()
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Add one annotation as a tool entry.
///
/// Unknown kinds are skipped so that newer inputs still build. The target
/// dataset is `dataset_id`, else the annotation's `imageID`, else
/// `"volume"`. A label name seen before keeps its first styling; the entry
/// is appended either way.
pub fn add_annotation(
    manifest: &Manifest,
    annotation: &Annotation,
    dataset_id: Option<&str>,
) -> anyhow::Result<Manifest> {
    let Some(kind) = ToolKind::parse(&annotation.kind) else {
        debug!(kind = %annotation.kind, "Skipping annotation of unknown type");
        return Ok(manifest.clone());
    };
    let geometry = kind.geometry(annotation)?;

    let image_id = dataset_id
        .or(annotation.image_id.as_deref())
        .unwrap_or(DEFAULT_DATASET_ID);

    let mut next = manifest.clone();
    let group = next.tools.entry(kind.group_name().to_string()).or_default();
    let label = ensure_label(group, annotation);

    let defaults = FrameOfReference::default();
    group.tools.push(ToolEntry {
        image_id: image_id.to_string(),
        frame_of_reference: FrameOfReference {
            plane_origin: annotation.plane_origin.unwrap_or(defaults.plane_origin),
            plane_normal: annotation.plane_normal.unwrap_or(defaults.plane_normal),
        },
        slice: annotation.slice.unwrap_or(0),
        label,
        geometry,
        metadata: annotation.metadata.clone().filter(|m| !m.is_empty()),
    });

    debug!(
        kind = %kind,
        image_id,
        entries = group.tools.len(),
        "Added annotation"
    );
    Ok(next)
}

/// Make sure the annotation's label exists in `group`; returns its name.
fn ensure_label(group: &mut ToolGroup, annotation: &Annotation) -> String {
    let name = annotation
        .label
        .clone()
        .unwrap_or_else(|| format!("Label {}", group.labels.len() + 1));

    if group.labels.contains_key(&name) {
        debug!(label = %name, "Label exists; keeping its styling");
        return name;
    }

    group.labels.insert(
        name.clone(),
        Label {
            label_name: name.clone(),
            color: annotation
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_LABEL_COLOR.to_string()),
            stroke_width: annotation.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
            fill_color: annotation.fill_color.clone(),
        },
    );
    name
}
