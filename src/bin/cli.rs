//! endpoint-finder CLI.
//!
//! Usage:
//!   endpoint-finder scan ./service-a ./service-b        # Text report to stdout
//!   endpoint-finder scan . -o csv -f endpoints.csv       # CSV report to a file
//!   endpoint-finder scan . --openapi-format yaml         # YAML API documents
//!   endpoint-finder parse src/routes/users.js            # One file, as JSON

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use endpoint_finder::cli::{Cli, Commands, ScanArgs};
use endpoint_finder::config::FinderConfig;
use endpoint_finder::parser::ParserRegistry;
use endpoint_finder::{report, scanner};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay clean.
    let default_level = if cli.command.verbose() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = ParserRegistry::with_defaults();

    match cli.command {
        Commands::Scan(args) => scan(&args, &registry),
        Commands::Parse { file, .. } => {
            let endpoints = scanner::parse_file(&file, &registry)
                .with_context(|| format!("failed to parse {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&endpoints)?);
            Ok(())
        }
    }
}

fn scan(args: &ScanArgs, registry: &ParserRegistry) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => FinderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FinderConfig::default(),
    };
    config.apply_overrides(args.overrides());
    config.validate()?;
    debug!(?config, "effective configuration");

    let results = scanner::scan_repositories(&args.paths, &config, registry);
    let rendered = report::render(&results, config.output.format)?;
    report::write(&rendered, config.output.file.as_deref())?;
    Ok(())
}
