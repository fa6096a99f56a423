//! # ChemKED Validation Module
//!
//! Structural and semantic validation of ChemKED documents.
//!
//! ## Validation Checklist
//!
//! 1. **Schema**: required fields, value types, closed vocabularies and
//!    unknown keys, driven by a declarative field table
//! 2. **Semantic rules**: attached to schema fields
//!    - *valid units*: `{units, ...}` mappings dimensionally consistent with
//!      the field (e.g. volume-history `time` in seconds)
//!    - *valid quantity*: quantity strings with compatible units and a
//!      magnitude greater than zero
//!    - *valid reference*: journal, year, volume, pages and author roster
//!      cross-checked against the DOI record
//!    - *valid ORCID*: the ORCID resolves to the stated author name
//! 3. **Record rules**: combinations of fields that exclude each other
//!
//! Semantic rules can be switched off per invocation through
//! [`ValidationConfig`], or process-wide with [`disable_validation`]. When a
//! lookup service is unreachable the affected fact is reported as a warning,
//! not a failure.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chemked::resolver::OfflineResolver;
//! use chemked::validator::Validator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = std::fs::read_to_string("experiment.yaml")?;
//! let document: serde_yaml::Value = serde_yaml::from_str(&text)?;
//! let report = Validator::new(&OfflineResolver).validate_named(&document, "experiment.yaml");
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use serde_yaml::Value;

use crate::resolver::MetadataResolver;

pub use names::compare_name;
pub use report::{CheckStatus, FieldFindings, ValidationCheck, ValidationReport};
pub use rules::{RecordRule, SemanticRule};

mod names;
mod report;
mod rules;
mod schema;


static SKIP_VALIDATION: AtomicBool = AtomicBool::new(false);

/// Turn off semantic validation for every validator created afterwards.
///
/// Meant for offline runs and tests. The flag is process-wide; callers that
/// toggle it from several threads must serialize those calls themselves.
pub fn disable_validation() {
    warn!("validation disabled.");
    SKIP_VALIDATION.store(true, Ordering::Relaxed);
}

/// Turn semantic validation back on
pub fn enable_validation() {
    warn!("validation enabled.");
    SKIP_VALIDATION.store(false, Ordering::Relaxed);
}

/// Current state of the process-wide switch
pub fn validation_disabled() -> bool {
    SKIP_VALIDATION.load(Ordering::Relaxed)
}

/// Which semantic rules run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Skip every semantic rule, leaving only schema checks
    pub skip_semantic: bool,
    /// Run the unit rule
    pub units: bool,
    /// Run the quantity rule
    pub quantities: bool,
    /// Run the reference rule
    pub references: bool,
    /// Run the ORCID rule
    pub orcids: bool,
}

impl Default for ValidationConfig {
    /// All rules on, unless [`disable_validation`] is in effect
    fn default() -> Self {
        Self {
            skip_semantic: validation_disabled(),
            ..Self::all()
        }
    }
}

impl ValidationConfig {
    /// Every rule on, regardless of the process-wide switch
    pub fn all() -> Self {
        Self {
            skip_semantic: false,
            units: true,
            quantities: true,
            references: true,
            orcids: true,
        }
    }

    /// Schema checks only
    pub fn structural_only() -> Self {
        Self {
            skip_semantic: true,
            ..Self::all()
        }
    }

    /// Rules that only need the document itself (no lookups)
    pub fn offline() -> Self {
        Self {
            references: false,
            orcids: false,
            ..Self::all()
        }
    }
}

/// Validates ChemKED documents
pub struct Validator<'a> {
    resolver: &'a dyn MetadataResolver,
    config: ValidationConfig,
}

impl<'a> Validator<'a> {
    /// Validator with the default configuration
    pub fn new(resolver: &'a dyn MetadataResolver) -> Self {
        Self {
            resolver,
            config: ValidationConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Skip semantic rules for this validator only
    pub fn disable_validation(&mut self) {
        warn!("validation disabled.");
        self.config.skip_semantic = true;
    }

    /// Re-enable semantic rules for this validator
    pub fn enable_validation(&mut self) {
        warn!("validation enabled.");
        self.config.skip_semantic = false;
    }

    /// Validate a document
    pub fn validate(&self, document: &Value) -> ValidationReport {
        self.validate_named(document, "<document>")
    }

    /// Validate a document, labelling the report with `source`
    pub fn validate_named(&self, document: &Value, source: &str) -> ValidationReport {
        let mut report = ValidationReport::new(source);
        let ctx = rules::RuleContext {
            resolver: self.resolver,
            config: self.config,
        };

        let structural = schema::SchemaWalk::new(&ctx, &mut report).run(document);
        if structural == 0 {
            report.add_check(ValidationCheck::ok("schema"));
        }

        for rule in RecordRule::ALL {
            for (field, message) in rule.check(document) {
                report.add_check(ValidationCheck::failed(field, message));
            }
        }

        debug!(
            "Validated {}: {} failure(s), {} warning(s)",
            source,
            report.failure_count(),
            report.warning_count()
        );
        report
    }

    /// `(field, message)` for every error in `document`
    pub fn errors(&self, document: &Value) -> Vec<(String, String)> {
        self.validate(document).errors()
    }
}
