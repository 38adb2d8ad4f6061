use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;
use vvs_config::Settings;
use vvs_core::OutputFormat;
use vvs_manifest::{Annotation, LabelMapInput, generate_session};
use vvs_resolve::{folder_sources, item_sources, parse_id_list};

use crate::cli::TreeArgs;
use crate::store::{load_json_list, load_tree, loadable_rules};

pub(crate) struct GenerateArgs {
    pub tree: TreeArgs,
    pub item: Option<String>,
    pub folder: Option<String>,
    pub items: String,
    pub folders: String,
    pub annotations: Option<PathBuf>,
    pub labelmaps: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

pub(crate) fn handle_generate(
    args: GenerateArgs,
    settings: &Settings,
    format: OutputFormat,
) -> Result<()> {
    let store = load_tree(&args.tree.tree)?;
    let rules = loadable_rules(settings);
    let api_root = &settings.server.api_root;

    let sources = match (&args.item, &args.folder) {
        (Some(item), _) => item_sources(&store, item, api_root, &rules)?,
        (None, Some(folder)) => folder_sources(
            &store,
            folder,
            &parse_id_list(&args.items),
            &parse_id_list(&args.folders),
            api_root,
            &rules,
        )?,
        (None, None) => anyhow::bail!("Either --item or --folder is required"),
    };
    let annotations: Vec<Annotation> = load_json_list(args.annotations.as_deref())?;
    let labelmaps: Vec<LabelMapInput> = load_json_list(args.labelmaps.as_deref())?;

    let session = generate_session(&sources, &annotations, &labelmaps)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(session.package.file_name()));
    std::fs::write(&output, session.package.bytes())
        .with_context(|| format!("Failed to write session: {}", output.display()))?;
    info!(path = %output.display(), "Wrote session");

    let manifest = &session.manifest;
    match format {
        OutputFormat::Json => {
            let summary = json!({
                "path": output.display().to_string(),
                "fileName": session.package.file_name(),
                "dataSources": manifest.data_sources.len(),
                "datasets": manifest.datasets.len(),
                "annotations": annotations.len(),
                "segmentGroups": manifest.segment_groups.len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!(
                "Wrote {} ({} data sources, {} datasets, {} annotations, {} segment groups)",
                output.display(),
                manifest.data_sources.len(),
                manifest.datasets.len(),
                annotations.len(),
                manifest.segment_groups.len(),
            );
        }
    }
    Ok(())
}
