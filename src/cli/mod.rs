//! Command-line interface for endpoint-finder.
//!
//! Commands:
//! - scan: find endpoints in local repositories, report them, and write
//!   API documents
//! - parse: print one file's endpoint records as JSON

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::openapi::DocumentFormat;
use crate::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "endpoint-finder")]
#[command(about = "Find HTTP API endpoints in source code")]
#[command(version)]
#[command(override_help = HELP_TEXT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

const HELP_TEXT: &str = "
endpoint-finder - find HTTP API endpoints in source code

Frameworks:
  Python                Flask, FastAPI, Django
  JavaScript/TypeScript Express.js
  Java                  Spring MVC / Spring Boot

Commands:
  scan <PATH>...        Scan local repositories and report endpoints
  parse <FILE>          Print one file's endpoints as JSON

Scan options:
  -c, --config <FILE>           TOML config file
  -o, --output <FORMAT>         Report format: text, csv, json
  -f, --output-file <FILE>      Write the report to a file
  -l, --languages <LANG>...     Languages: python, javascript, java
      --no-find-openapi         Do not look for existing API documents
      --no-generate-openapi     Do not write generated API documents
      --openapi-dir <DIR>       Where API documents are written
      --openapi-format <FMT>    Generated document format: json, yaml
  -v, --verbose                 Debug logging

Logging honours RUST_LOG.
";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan local repositories for API endpoints
    Scan(ScanArgs),

    /// Print the endpoints found in a single file as JSON
    Parse {
        /// Source file to parse
        file: PathBuf,

        /// Debug logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Repository directories to scan
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report format (text, csv, json)
    #[arg(short, long)]
    pub output: Option<ReportFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short = 'f', long)]
    pub output_file: Option<PathBuf>,

    /// Languages to scan
    #[arg(short, long, num_args = 1..)]
    pub languages: Option<Vec<String>>,

    /// Skip looking for existing API documents
    #[arg(long)]
    pub no_find_openapi: bool,

    /// Skip writing generated API documents
    #[arg(long)]
    pub no_generate_openapi: bool,

    /// Directory for saved and generated API documents
    #[arg(long)]
    pub openapi_dir: Option<PathBuf>,

    /// Format of generated API documents (json, yaml)
    #[arg(long)]
    pub openapi_format: Option<DocumentFormat>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ScanArgs {
    /// Flags that take precedence over the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            languages: self.languages.clone(),
            output_format: self.output,
            output_file: self.output_file.clone(),
            find_existing: self.no_find_openapi.then_some(false),
            generate_if_none: self.no_generate_openapi.then_some(false),
            openapi_dir: self.openapi_dir.clone(),
            openapi_format: self.openapi_format,
        }
    }
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Scan(args) => args.verbose,
            Commands::Parse { verbose, .. } => *verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_arguments() {
        let cli = Cli::try_parse_from([
            "endpoint-finder",
            "scan",
            "repo-a",
            "repo-b",
            "--output",
            "csv",
            "--languages",
            "python",
            "java",
            "--no-generate-openapi",
            "--openapi-format",
            "yaml",
        ])
        .unwrap();

        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.paths, vec![PathBuf::from("repo-a"), PathBuf::from("repo-b")]);

        let overrides = args.overrides();
        assert_eq!(overrides.output_format, Some(ReportFormat::Csv));
        assert_eq!(
            overrides.languages,
            Some(vec!["python".to_string(), "java".to_string()])
        );
        assert_eq!(overrides.generate_if_none, Some(false));
        assert_eq!(overrides.find_existing, None);
        assert_eq!(overrides.openapi_format, Some(DocumentFormat::Yaml));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["endpoint-finder", "scan", ".", "--output", "xml"]).is_err());
        assert!(Cli::try_parse_from(["endpoint-finder", "scan"]).is_err());
    }

    #[test]
    fn test_parse_command() {
        let cli = Cli::try_parse_from(["endpoint-finder", "parse", "app.py", "-v"]).unwrap();
        assert!(cli.command.verbose());
    }
}
