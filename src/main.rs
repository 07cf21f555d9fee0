use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use tfunbind::cli::{execute, output, Cli};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = execute(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -v
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match level {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn given_two_paths_when_parsing_then_unbind_invocation() {
        let cli = Cli::try_parse_from(["tfunbind", "-vv", "in", "out"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.command.is_none());
        assert_eq!(cli.src_dir.as_deref(), Some(std::path::Path::new("in")));
        assert_eq!(cli.dest_dir.as_deref(), Some(std::path::Path::new("out")));
    }

    #[test]
    fn given_config_subcommand_when_parsing_then_paths_not_required() {
        let cli = Cli::try_parse_from(["tfunbind", "config", "show"]).unwrap();
        assert!(cli.src_dir.is_none());
        assert!(cli.command.is_some());
    }

    #[test]
    fn given_single_path_when_parsing_then_error() {
        assert!(Cli::try_parse_from(["tfunbind", "in"]).is_err());
    }
}
