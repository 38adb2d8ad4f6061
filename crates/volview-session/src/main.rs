use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use vvs_config::Settings;

mod cli;
mod config_cmds;
mod error_hints;
mod generate_cmd;
mod resolve_cmd;
mod store;

use cli::{Cli, Commands, ConfigCommands};
use generate_cmd::GenerateArgs;

fn main() -> ExitCode {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if let Some(hint) = error_hints::suggest_fix(&e) {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let output_format = cli.format;
    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    tracing::debug!(api_root = %settings.server.api_root, "Loaded settings");

    match cli.command {
        Commands::Generate {
            tree,
            item,
            folder,
            items,
            folders,
            annotations,
            labelmaps,
            output,
        } => {
            let args = GenerateArgs {
                tree,
                item,
                folder,
                items,
                folders,
                annotations,
                labelmaps,
                output,
            };
            generate_cmd::handle_generate(args, &settings, output_format)?;
        }
        Commands::Resolve {
            tree,
            folder,
            folders,
            items,
            session,
        } => {
            resolve_cmd::handle_resolve(
                tree,
                &folder,
                &folders,
                &items,
                session,
                &settings,
                output_format,
            )?;
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Resolve {
                tree,
                folder,
                user,
                file_name,
            } => {
                config_cmds::handle_config_resolve(
                    tree,
                    &folder,
                    user.as_deref(),
                    file_name.as_deref(),
                    &settings,
                    output_format,
                )?;
            }
            ConfigCommands::Show => {
                config_cmds::handle_config_show(&settings, output_format)?;
            }
            ConfigCommands::Template => config_cmds::handle_config_template(),
        },
    }

    Ok(())
}
