//! Manifest encoding and session packaging.
//!
//! A manifest without embedded payloads is stored as plain JSON
//! (`session.volview.json`). Embedded segment-group masks are written as
//! side-car files next to `manifest.json` inside a zip archive
//! (`session.volview.zip`), and the JSON only carries their paths.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use anyhow::{Context, Result, bail};
use tracing::debug;
use vvs_core::AppError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::model::{EmbeddedPayload, Manifest};

pub const SESSION_JSON_FILE_NAME: &str = "session.volview.json";
pub const SESSION_ARCHIVE_FILE_NAME: &str = "session.volview.zip";
/// Manifest entry name inside a session archive.
pub const MANIFEST_ENTRY_NAME: &str = "manifest.json";
const PAYLOAD_DIR: &str = "segmentations";

/// Encoded session, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPackage {
    Json(Vec<u8>),
    Archive(Vec<u8>),
}

impl SessionPackage {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json(_) => SESSION_JSON_FILE_NAME,
            Self::Archive(_) => SESSION_ARCHIVE_FILE_NAME,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Archive(_) => "application/zip",
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Json(bytes) | Self::Archive(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Json(bytes) | Self::Archive(bytes) => bytes,
        }
    }
}

/// Archive path of an embedded payload for segment group `entry_id`.
pub fn payload_path(entry_id: &str, extension: &str) -> String {
    format!("{PAYLOAD_DIR}/{entry_id}.{}", extension.trim_start_matches('.'))
}

/// Pretty-printed JSON for a manifest with no embedded payloads.
pub fn serialize_manifest(manifest: &Manifest) -> Result<Vec<u8>> {
    manifest.validate()?;
    let count = manifest.embedded_payload_count();
    if count > 0 {
        return Err(AppError::EmbeddedPayload { count }.into());
    }
    encode_json(manifest)
}

/// Encode a manifest together with any embedded payloads.
pub fn package_session(manifest: &Manifest) -> Result<SessionPackage> {
    manifest.validate()?;
    if manifest.embedded_payload_count() == 0 {
        return Ok(SessionPackage::Json(encode_json(manifest)?));
    }

    let mut stripped = manifest.clone();
    let mut attachments = Vec::new();
    for entry in &mut stripped.segment_groups {
        if let Some(payload) = entry.payload.take() {
            let path = payload_path(&entry.id, &payload.extension);
            entry.path = Some(path.clone());
            attachments.push((path, payload.bytes));
        }
    }
    let json = encode_json(&stripped)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(MANIFEST_ENTRY_NAME, options)
        .context("Failed to start manifest entry")?;
    writer
        .write_all(&json)
        .context("Failed to write manifest entry")?;
    for (path, bytes) in &attachments {
        writer
            .start_file(path.as_str(), options)
            .with_context(|| format!("Failed to start archive entry: {path}"))?;
        writer
            .write_all(bytes)
            .with_context(|| format!("Failed to write archive entry: {path}"))?;
    }
    let cursor = writer.finish().context("Failed to finish session archive")?;

    debug!(
        attachments = attachments.len(),
        "Packaged session archive"
    );
    Ok(SessionPackage::Archive(cursor.into_inner()))
}

pub fn parse_manifest(bytes: &[u8]) -> Result<Manifest> {
    serde_json::from_slice(bytes).context("Failed to parse session manifest")
}

/// Decode a session package; archive attachments are re-attached to their
/// segment groups as embedded payloads.
pub fn unpack_session(package: &SessionPackage) -> Result<Manifest> {
    let bytes = match package {
        SessionPackage::Json(bytes) => return parse_manifest(bytes),
        SessionPackage::Archive(bytes) => bytes,
    };

    let mut archive =
        ZipArchive::new(Cursor::new(bytes.as_slice())).context("Failed to open session archive")?;
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .with_context(|| format!("Failed to read archive entry {index}"))?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .with_context(|| format!("Failed to read archive entry: {}", file.name()))?;
        entries.insert(file.name().to_string(), content);
    }

    let Some(json) = entries.remove(MANIFEST_ENTRY_NAME) else {
        bail!("Session archive has no {MANIFEST_ENTRY_NAME}");
    };
    let mut manifest = parse_manifest(&json)?;

    for entry in &mut manifest.segment_groups {
        let Some(path) = entry.path.take() else {
            continue;
        };
        let bytes = entries
            .remove(&path)
            .with_context(|| format!("Session archive is missing {path}"))?;
        let extension = path
            .rsplit('/')
            .next()
            .and_then(|file_name| file_name.split_once('.'))
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();
        entry.payload = Some(EmbeddedPayload { bytes, extension });
    }
    Ok(manifest)
}

fn encode_json(manifest: &Manifest) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(manifest).context("Failed to serialize session manifest")
}
