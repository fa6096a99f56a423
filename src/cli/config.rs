//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in
//! a config file; command-line flags override them:
//!
//! ```toml
//! # chemked.toml
//! [conversion]
//! output_dir = "converted"
//! file_author = "Kyle E Niemeyer"
//! file_author_orcid = "0000-0003-4425-7097"
//!
//! [validation]
//! skip = false
//! references = false
//!
//! [resolver]
//! fixtures = "fixtures/crossref.json"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use chemked::validator::ValidationConfig;

/// Root configuration structure for chemked.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Conversion settings.
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Semantic rule switches.
    #[serde(default)]
    pub validation: ValidationSettings,

    /// Metadata resolver settings.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Settings for the conversion commands.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionConfig {
    /// Directory for converted files (defaults to the input's directory).
    pub output_dir: Option<PathBuf>,

    /// Replace the file author's name on import.
    pub file_author: Option<String>,

    /// Set the file author's ORCID on import.
    pub file_author_orcid: Option<String>,
}

/// Semantic rule switches; unset entries keep their default (on).
#[derive(Debug, Default, Deserialize)]
pub struct ValidationSettings {
    /// Skip all semantic rules.
    pub skip: Option<bool>,
    /// Check units of `{units, ...}` mappings.
    pub units: Option<bool>,
    /// Check quantity strings.
    pub quantities: Option<bool>,
    /// Cross-check references against their DOI record.
    pub references: Option<bool>,
    /// Check ORCIDs against author names.
    pub orcids: Option<bool>,
}

impl ValidationSettings {
    /// Resolve into a validator configuration; `skip_flag` comes from the
    /// command line and wins over the file
    pub fn to_config(&self, skip_flag: bool) -> ValidationConfig {
        let all = ValidationConfig::all();
        ValidationConfig {
            skip_semantic: skip_flag || self.skip.unwrap_or(false),
            units: self.units.unwrap_or(all.units),
            quantities: self.quantities.unwrap_or(all.quantities),
            references: self.references.unwrap_or(all.references),
            orcids: self.orcids.unwrap_or(all.orcids),
        }
    }
}

/// Settings for DOI and ORCID lookups.
#[derive(Debug, Default, Deserialize)]
pub struct ResolverConfig {
    /// JSON fixture file with canned Crossref and ORCID answers.
    pub fixtures: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Load the file if a path was given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [conversion]
            output_dir = "out"
            file_author = "Kyle E Niemeyer"
            file_author_orcid = "0000-0003-4425-7097"

            [validation]
            references = false
            orcids = false

            [resolver]
            fixtures = "fixtures.json"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.conversion.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.conversion.file_author.as_deref(), Some("Kyle E Niemeyer"));
        assert_eq!(
            config.conversion.file_author_orcid.as_deref(),
            Some("0000-0003-4425-7097")
        );
        assert_eq!(config.resolver.fixtures, Some(PathBuf::from("fixtures.json")));

        let validation = config.validation.to_config(false);
        assert_eq!(validation, ValidationConfig::offline());
    }

    #[test]
    fn test_skip_flag_wins() {
        let config = Config::from_str("[validation]\nskip = false\n").unwrap();
        assert!(config.validation.to_config(true).skip_semantic);
        assert!(!config.validation.to_config(false).skip_semantic);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.conversion.output_dir, None);
        assert_eq!(config.validation.to_config(false), ValidationConfig::all());
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(Config::from_str("[compression]\nlevel = 3\n").is_err());
    }
}
