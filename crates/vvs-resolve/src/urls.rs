//! Download URLs and the resource list handed to the viewer.

use serde::{Deserialize, Serialize};

use crate::listing::FileRef;

/// Name under which the folder config is offered to the viewer.
pub const CONFIG_RESOURCE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub resources: Vec<ResourceLink>,
}

/// `api_root` may be a bare path (`api/v1`) or an absolute base URL
/// (`https://host/api/v1`); bare paths are rooted at `/`.
fn api_base(api_root: &str) -> String {
    if api_root.contains("://") {
        api_root.trim_end_matches('/').to_string()
    } else {
        format!("/{}", api_root.trim_matches('/'))
    }
}

pub fn file_download_url(api_root: &str, file_id: &str, file_name: &str) -> String {
    format!("{}/file/{file_id}/proxiable/{file_name}", api_base(api_root))
}

pub fn config_url(api_root: &str, folder_id: &str, file_name: &str) -> String {
    format!(
        "{}/folder/{folder_id}/volview_config/{file_name}",
        api_base(api_root)
    )
}

/// One entry per file, then the folder config entry.
pub fn files_to_manifest(
    files: &[FileRef],
    folder_id: &str,
    api_root: &str,
    config_file_name: &str,
) -> ResourceManifest {
    let mut resources: Vec<ResourceLink> = files
        .iter()
        .map(|file| ResourceLink {
            url: file_download_url(api_root, &file.file.id, &file.file.name),
            name: file.file.name.clone(),
        })
        .collect();
    resources.push(ResourceLink {
        url: config_url(api_root, folder_id, config_file_name),
        name: CONFIG_RESOURCE_NAME.to_string(),
    });
    ResourceManifest { resources }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vvs_core::{FileEntry, Item};

    #[test]
    fn test_download_url_shapes() {
        assert_eq!(
            file_download_url("api/v1", "abc", "ct.nrrd"),
            "/api/v1/file/abc/proxiable/ct.nrrd"
        );
        assert_eq!(
            file_download_url("/api/v1/", "abc", "ct.nrrd"),
            "/api/v1/file/abc/proxiable/ct.nrrd"
        );
        assert_eq!(
            file_download_url("https://data.example.org/api/v1/", "abc", "ct.nrrd"),
            "https://data.example.org/api/v1/file/abc/proxiable/ct.nrrd"
        );
    }

    #[test]
    fn test_config_url() {
        assert_eq!(
            config_url("api/v1", "f1", ".volview_config.yaml"),
            "/api/v1/folder/f1/volview_config/.volview_config.yaml"
        );
    }

    #[test]
    fn test_manifest_ends_with_config_entry() {
        let item = Item::new("i1", "ct.nrrd", "f1", Utc::now());
        let files = vec![FileRef {
            item,
            file: FileEntry::new("file1", "ct.nrrd", "i1", 10),
            path: "ct.nrrd".into(),
        }];
        let manifest = files_to_manifest(&files, "f1", "api/v1", ".volview_config.yaml");

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"resources": [
                {"url": "/api/v1/file/file1/proxiable/ct.nrrd", "name": "ct.nrrd"},
                {"url": "/api/v1/folder/f1/volview_config/.volview_config.yaml", "name": "config.json"},
            ]})
        );
    }

    #[test]
    fn test_empty_listing_still_offers_config() {
        let manifest = files_to_manifest(&[], "f1", "api/v1", ".volview_config.yaml");
        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.resources[0].name, CONFIG_RESOURCE_NAME);
    }
}
