//! Copy-on-write manifest builder.
//!
//! Every operation takes the current manifest by reference and returns a new
//! one; the input is never modified.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vvs_core::AppError;

use crate::ids::{self, DataSourceId};
use crate::model::{
    Dataset, EmbeddedPayload, MANIFEST_VERSION, Manifest, SegmentGroupEntry, SegmentGroupMetadata,
};
use crate::segments::{build_segments, new_segment_group_id};

/// One fetchable input for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceInput {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Storage id of the backing file, when the source came from a resource
    /// tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl DataSourceInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            file_id: None,
        }
    }

    pub fn named(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: Some(name.into()),
            file_id: None,
        }
    }
}

/// Empty manifest at the current schema version.
pub fn create_manifest() -> Manifest {
    Manifest {
        version: MANIFEST_VERSION.to_string(),
        data_sources: Vec::new(),
        datasets: Vec::new(),
        primary_selection: None,
        tools: Default::default(),
        segment_groups: Vec::new(),
    }
}

/// Add a dataset backed by `sources`.
///
/// One `uri` source per input; more than one input also gets a `collection`
/// wrapping exactly those ids, and the dataset points at it. A single input
/// is referenced directly. `primarySelection` is set only if still unset.
pub fn add_dataset(
    manifest: &Manifest,
    sources: &[DataSourceInput],
    dataset_id: &str,
) -> anyhow::Result<Manifest> {
    if sources.is_empty() {
        if manifest.datasets.is_empty() {
            return Err(AppError::Validation(format!(
                "dataset '{dataset_id}' needs at least one data source"
            ))
            .into());
        }
        debug!(dataset_id, "No sources for dataset; manifest unchanged");
        return Ok(manifest.clone());
    }
    if manifest.dataset(dataset_id).is_some() {
        return Err(AppError::Validation(format!("dataset '{dataset_id}' already exists")).into());
    }

    let mut next = manifest.clone();
    let members: Vec<DataSourceId> = sources
        .iter()
        .map(|source| ids::push_uri(&mut next.data_sources, &source.url, source.name.clone()))
        .collect();

    let data_source_id = match members.as_slice() {
        [single] => *single,
        _ => ids::push_collection(&mut next.data_sources, members.clone()),
    };

    next.datasets.push(Dataset {
        id: dataset_id.to_string(),
        data_source_id,
    });
    if next.primary_selection.is_none() {
        next.primary_selection = Some(dataset_id.to_string());
    }

    debug!(
        dataset_id,
        sources = members.len(),
        data_source_id,
        "Added dataset"
    );
    Ok(next)
}

/// Add a segment group whose mask is fetched from `url`.
///
/// Appends one `uri` source, a dataset named after that source's id, and the
/// segment group entry layered on `dataset_id`.
pub fn add_segment_group(
    manifest: &Manifest,
    url: &str,
    dataset_id: &str,
    label_names: &[(u32, String)],
    name: &str,
) -> Manifest {
    let mut next = manifest.clone();
    let data_source_id = ids::push_uri(&mut next.data_sources, url, None);
    next.datasets.push(Dataset {
        id: data_source_id.to_string(),
        data_source_id,
    });
    let entry = SegmentGroupEntry {
        id: new_segment_group_id(),
        data_source_id: Some(data_source_id),
        path: None,
        metadata: SegmentGroupMetadata {
            name: name.to_string(),
            parent_image: dataset_id.to_string(),
            segments: build_segments(label_names),
        },
        payload: None,
    };
    debug!(
        segment_group = %entry.id,
        data_source_id,
        segments = entry.metadata.segments.order.len(),
        "Added segment group"
    );
    next.segment_groups.push(entry);
    next
}

/// Add a segment group whose mask bytes travel inside the session archive.
///
/// No data source is allocated; the serializer writes the payload to a
/// side-car path derived from the entry id.
pub fn add_embedded_segment_group(
    manifest: &Manifest,
    payload: Vec<u8>,
    extension: &str,
    dataset_id: &str,
    label_names: &[(u32, String)],
    name: &str,
) -> Manifest {
    let mut next = manifest.clone();
    let entry = SegmentGroupEntry {
        id: new_segment_group_id(),
        data_source_id: None,
        path: None,
        metadata: SegmentGroupMetadata {
            name: name.to_string(),
            parent_image: dataset_id.to_string(),
            segments: build_segments(label_names),
        },
        payload: Some(EmbeddedPayload {
            bytes: payload,
            extension: extension.trim_start_matches('.').to_string(),
        }),
    };
    debug!(
        segment_group = %entry.id,
        bytes = entry.payload.as_ref().map(|p| p.bytes.len()).unwrap_or(0),
        "Added embedded segment group"
    );
    next.segment_groups.push(entry);
    next
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
