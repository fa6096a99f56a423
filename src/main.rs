//! # chemked-convert
//!
//! Command-line converter between ReSpecTh XML and ChemKED YAML
//! ignition-delay records, plus a ChemKED validator.
//!
//! ## Usage
//!
//! ```bash
//! # ReSpecTh XML to ChemKED YAML (writes experiment.yaml, prints its path)
//! chemked-convert respecth-to-chemked experiment.xml -o converted/
//!
//! # ChemKED YAML back to ReSpecTh XML
//! chemked-convert chemked-to-respecth converted/experiment.yaml
//!
//! # Validate; exits with status 1 on failures
//! chemked-convert validate converted/experiment.yaml --resolver-fixtures crossref.json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
