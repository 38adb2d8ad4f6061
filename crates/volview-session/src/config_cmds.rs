use anyhow::Result;
use vvs_config::{Settings, resolve_config};
use vvs_core::{AppError, OutputFormat, ResourceStore};

use crate::cli::TreeArgs;
use crate::store::load_tree;

pub(crate) fn handle_config_resolve(
    tree: TreeArgs,
    folder: &str,
    user: Option<&str>,
    file_name: Option<&str>,
    settings: &Settings,
    format: OutputFormat,
) -> Result<()> {
    let store = load_tree(&tree.tree)?;
    let user = match user {
        Some(login) => Some(
            store
                .user(login)?
                .ok_or_else(|| AppError::UnknownUser(login.to_string()))?,
        ),
        None => None,
    };
    if store.folder(folder)?.is_none() {
        return Err(AppError::not_found("Folder", folder).into());
    }

    let file_name = file_name.unwrap_or(&settings.config.file_name);
    let resolved = resolve_config(&store, folder, file_name, user.as_ref(), &settings.config)?;

    match (resolved, format) {
        (None, OutputFormat::Json) => println!("null"),
        (None, OutputFormat::Text) => eprintln!("No configuration found for folder '{folder}'"),
        (Some(doc), OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(&doc)?),
        (Some(doc), OutputFormat::Text) => print!("{}", serde_yaml::to_string(&doc)?),
    }
    Ok(())
}

pub(crate) fn handle_config_show(settings: &Settings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json_str = serde_json::to_string_pretty(settings)?;
            println!("{}", json_str);
        }
        OutputFormat::Text => {
            let toml_str = toml::to_string_pretty(settings)?;
            print!("{}", toml_str);
        }
    }
    Ok(())
}

pub(crate) fn handle_config_template() {
    print!("{}", Settings::default_template());
}
