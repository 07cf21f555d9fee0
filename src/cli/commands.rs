//! Command handlers

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Dispatch parsed arguments.
pub fn execute(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Config { command }) => config_command(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            let src = cli
                .src_dir
                .as_deref()
                .ok_or_else(|| CliError::Usage("missing <SRC_DIR>".into()))?;
            let dest = cli
                .dest_dir
                .as_deref()
                .ok_or_else(|| CliError::Usage("missing <DEST_DIR>".into()))?;
            unbind_command(cli, src, dest)
        }
    }
}

/// Load settings and fold the command-line switches over them.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config_file.as_deref())?;
    if cli.skip_existing {
        settings.overwrite_existing = false;
    }
    if cli.keep_readonly {
        settings.make_writable = false;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(cli))]
fn unbind_command(cli: &Cli, src: &Path, dest: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let service = container.unbind_service(cli.dry_run)?;

    let summary = service.unbind(src, dest)?;
    output::summary(src, dest, &summary);
    Ok(())
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory (no home directory)".into())
            })?;
            if path.exists() && !force {
                output::warning(&format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
                return Ok(());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    InfraError::io(format!("create directory {}", parent.display()), e)
                })?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::action("Global", &format!("{}{}", path.display(), state));
                }
                None => output::action("Global", "unavailable (no home directory)"),
            }
            match &cli.config_file {
                Some(path) => output::action("Explicit", &path.display()),
                None => output::action("Explicit", "none (use --config <FILE>)"),
            }
            Ok(())
        }
    }
}
