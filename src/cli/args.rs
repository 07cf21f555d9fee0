//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Copy a Visual Studio tree while stripping Team Foundation Version Control bindings
#[derive(Parser, Debug)]
#[command(name = "tfunbind")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra config file, merged over the global config
    #[arg(short = 'c', long = "config", global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Show what would be copied, rewritten and excluded without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Leave files that already exist in the destination untouched
    #[arg(long)]
    pub skip_existing: bool,

    /// Keep the read-only flag on copied files
    #[arg(long)]
    pub keep_readonly: bool,

    /// TFVC-bound source tree (never modified)
    #[arg(required = true, value_hint = ValueHint::DirPath)]
    pub src_dir: Option<PathBuf>,

    /// Destination tree (created if missing)
    #[arg(required = true, value_hint = ValueHint::DirPath)]
    pub dest_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Write config template to the global config path
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
