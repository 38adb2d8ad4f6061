use anyhow::Result;
use vvs_config::Settings;
use vvs_core::OutputFormat;
use vvs_resolve::{
    Resolution, ResourceManifest, file_download_url, files_to_manifest, resolve_files,
    resolve_session_download,
};

use crate::cli::TreeArgs;
use crate::store::{load_tree, loadable_rules, selection};

pub(crate) fn handle_resolve(
    tree: TreeArgs,
    folder: &str,
    folders: &str,
    items: &str,
    session_only: bool,
    settings: &Settings,
    format: OutputFormat,
) -> Result<()> {
    let store = load_tree(&tree.tree)?;
    let rules = loadable_rules(settings);
    let selection = selection(folders, items);
    let api_root = &settings.server.api_root;

    if session_only {
        let session = resolve_session_download(&store, folder, selection.as_ref(), &rules)?;
        let file = &session.files[0].file;
        let url = file_download_url(api_root, &file.id, &file.name);
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "item": session.item.id,
                    "name": file.name,
                    "url": url,
                }))?
            ),
            OutputFormat::Text => println!("{}\t{url}", file.name),
        }
        return Ok(());
    }

    let resolution = resolve_files(&store, folder, selection.as_ref(), &rules)?;
    if let Resolution::Session(session) = &resolution {
        eprintln!("Using saved session '{}'", session.item.name);
    }
    let manifest = files_to_manifest(
        resolution.files(),
        folder,
        api_root,
        &settings.config.file_name,
    );
    print_manifest(&manifest, format)
}

fn print_manifest(manifest: &ResourceManifest, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(manifest)?),
        OutputFormat::Text => {
            for resource in &manifest.resources {
                println!("{}\t{}", resource.name, resource.url);
            }
        }
    }
    Ok(())
}
