use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chemked::convert::Converter;
use chemked::respecth::ImportOptions;

use super::{build_resolver, CommonArgs, Config};

/// Settings for one conversion after merging flags over the config file
struct Settings {
    config: Config,
    output_dir: Option<PathBuf>,
}

impl Settings {
    fn load(common: &CommonArgs, output_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(common.config.as_deref())?;
        let output_dir = output_dir.or_else(|| config.conversion.output_dir.clone());
        if let Some(dir) = &output_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }
        Ok(Self { config, output_dir })
    }

    fn fixtures(&self, common: &CommonArgs) -> Option<PathBuf> {
        common
            .resolver_fixtures
            .clone()
            .or_else(|| self.config.resolver.fixtures.clone())
    }
}

/// Convert a ReSpecTh XML file to ChemKED YAML
pub fn run_respecth_to_chemked(
    input: PathBuf,
    output_dir: Option<PathBuf>,
    file_author: Option<String>,
    file_author_orcid: Option<String>,
    common: CommonArgs,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let settings = Settings::load(&common, output_dir)?;
    let resolver = build_resolver(settings.fixtures(&common).as_deref())?;
    let options = ImportOptions {
        file_author: file_author.or_else(|| settings.config.conversion.file_author.clone()),
        file_author_orcid: file_author_orcid
            .or_else(|| settings.config.conversion.file_author_orcid.clone()),
    };

    info!("ReSpecTh to ChemKED");
    info!("Input: {}", input.display());

    let output = Converter::new(resolver.as_ref())
        .with_validation(settings.config.validation.to_config(common.skip_validation))
        .with_import_options(options)
        .respecth_file_to_chemked(&input, settings.output_dir.as_deref())
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!("Converted to {}", output.display());
    Ok(())
}

/// Convert a ChemKED YAML file to ReSpecTh XML
pub fn run_chemked_to_respecth(
    input: PathBuf,
    output_dir: Option<PathBuf>,
    common: CommonArgs,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let settings = Settings::load(&common, output_dir)?;
    let resolver = build_resolver(settings.fixtures(&common).as_deref())?;

    info!("ChemKED to ReSpecTh");
    info!("Input: {}", input.display());

    let output = Converter::new(resolver.as_ref())
        .with_validation(settings.config.validation.to_config(common.skip_validation))
        .chemked_file_to_respecth(&input, settings.output_dir.as_deref())
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!("Converted to {}", output.display());
    Ok(())
}
