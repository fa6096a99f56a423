use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chemked::validator::Validator;

use super::{build_resolver, CommonArgs, Config};

/// Validate a ChemKED YAML file
pub fn run(file: PathBuf, common: CommonArgs) -> Result<()> {
    info!("ChemKED Validator");
    info!("File: {}", file.display());

    let config = Config::load(common.config.as_deref())?;
    let fixtures = common
        .resolver_fixtures
        .clone()
        .or_else(|| config.resolver.fixtures.clone());
    let resolver = build_resolver(fixtures.as_deref())?;

    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document: serde_yaml::Value = match serde_yaml::from_str(&text) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    };

    let report = Validator::new(resolver.as_ref())
        .with_config(config.validation.to_config(common.skip_validation))
        .validate_named(&document, &file.display().to_string());

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
