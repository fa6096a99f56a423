use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use chemked::resolver::{MetadataResolver, OfflineResolver, StaticResolver};

mod config;
mod convert;
mod validate;

pub use config::Config;

/// chemked-convert - ReSpecTh XML / ChemKED YAML converter and validator
#[derive(Parser)]
#[command(name = "chemked-convert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON fixtures answering DOI and ORCID lookups (lookups are skipped
    /// with a warning when omitted)
    #[arg(long, value_name = "FILE")]
    resolver_fixtures: Option<PathBuf>,

    /// Skip semantic validation (units, quantities, references, ORCIDs)
    #[arg(long)]
    skip_validation: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a ReSpecTh XML file to ChemKED YAML
    RespecthToChemked {
        /// Input ReSpecTh XML file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Replace the file author's name
        #[arg(long, value_name = "NAME")]
        file_author: Option<String>,

        /// Set the file author's ORCID
        #[arg(long, value_name = "ID")]
        file_author_orcid: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Convert a ChemKED YAML file to ReSpecTh XML
    ChemkedToRespecth {
        /// Input ChemKED YAML file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Validate a ChemKED YAML file
    Validate {
        /// Input ChemKED YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Fixture-backed resolver when a fixture file is configured, offline otherwise
fn build_resolver(fixtures: Option<&Path>) -> Result<Box<dyn MetadataResolver>> {
    match fixtures {
        Some(path) => {
            info!("Loading resolver fixtures from {}", path.display());
            let resolver = StaticResolver::from_file(path)
                .with_context(|| format!("Failed to load resolver fixtures: {}", path.display()))?;
            Ok(Box::new(resolver))
        }
        None => Ok(Box::new(OfflineResolver)),
    }
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::RespecthToChemked {
            input,
            output_dir,
            file_author,
            file_author_orcid,
            common,
        } => convert::run_respecth_to_chemked(
            input,
            output_dir,
            file_author,
            file_author_orcid,
            common,
        ),
        Commands::ChemkedToRespecth {
            input,
            output_dir,
            common,
        } => convert::run_chemked_to_respecth(input, output_dir, common),
        Commands::Validate { file, common } => validate::run(file, common),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_command() {
        let cli = Cli::try_parse_from([
            "chemked-convert",
            "-vv",
            "respecth-to-chemked",
            "exp.xml",
            "-o",
            "out",
            "--file-author",
            "Kyle E Niemeyer",
            "--skip-validation",
        ])
        .unwrap();

        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::RespecthToChemked {
                input,
                output_dir,
                file_author,
                file_author_orcid,
                common,
            } => {
                assert_eq!(input, PathBuf::from("exp.xml"));
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert_eq!(file_author.as_deref(), Some("Kyle E Niemeyer"));
                assert_eq!(file_author_orcid, None);
                assert!(common.skip_validation);
                assert_eq!(common.config, None);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parse_validate_command() {
        let cli = Cli::try_parse_from([
            "chemked-convert",
            "validate",
            "exp.yaml",
            "--resolver-fixtures",
            "fixtures.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate { file, common } => {
                assert_eq!(file, PathBuf::from("exp.yaml"));
                assert_eq!(common.resolver_fixtures, Some(PathBuf::from("fixtures.json")));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_missing_fixtures_file() {
        assert!(build_resolver(Some(Path::new("/nonexistent/fixtures.json"))).is_err());
        assert!(build_resolver(None).is_ok());
    }
}
