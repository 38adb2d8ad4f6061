//! One-call session generation from resolved inputs.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::annotation::{Annotation, add_annotation};
use crate::builder::{DataSourceInput, add_dataset, add_segment_group, create_manifest};
use crate::model::{DEFAULT_DATASET_ID, Manifest};
use crate::serialize::{SessionPackage, package_session};

/// A segmentation mask to layer on the generated volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapInput {
    /// Download URL of the mask file.
    pub url: String,
    /// Display name of the segment group.
    pub name: String,
    /// Segment value to segment name, e.g. `{1: "liver", 2: "spleen"}`.
    pub label_names: BTreeMap<u32, String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedSession {
    pub manifest: Manifest,
    pub package: SessionPackage,
}

/// Build and encode a session for one volume.
///
/// Label map URLs are removed from the image sources so masks are not loaded
/// twice. Annotations without an `imageID` target the `"volume"` dataset.
pub fn generate_session(
    sources: &[DataSourceInput],
    annotations: &[Annotation],
    labelmaps: &[LabelMapInput],
) -> Result<GeneratedSession> {
    let mask_urls: HashSet<&str> = labelmaps.iter().map(|lm| lm.url.as_str()).collect();
    let image_sources: Vec<DataSourceInput> = sources
        .iter()
        .filter(|source| !mask_urls.contains(source.url.as_str()))
        .cloned()
        .collect();

    let mut manifest = add_dataset(&create_manifest(), &image_sources, DEFAULT_DATASET_ID)?;

    for annotation in annotations {
        let target = annotation.image_id.as_deref().unwrap_or(DEFAULT_DATASET_ID);
        manifest = add_annotation(&manifest, annotation, Some(target))?;
    }

    for labelmap in labelmaps {
        let label_names: Vec<(u32, String)> = labelmap
            .label_names
            .iter()
            .map(|(value, name)| (*value, name.clone()))
            .collect();
        manifest = add_segment_group(
            &manifest,
            &labelmap.url,
            DEFAULT_DATASET_ID,
            &label_names,
            &labelmap.name,
        );
    }

    let package = package_session(&manifest)?;
    info!(
        data_sources = manifest.data_sources.len(),
        annotations = annotations.len(),
        segment_groups = manifest.segment_groups.len(),
        "Generated session"
    );
    Ok(GeneratedSession { manifest, package })
}
