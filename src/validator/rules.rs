//! Semantic rules attached to schema fields, and record-wide rules that
//! look at combinations of fields.

use std::fmt;

use log::warn;
use serde_yaml::{Mapping, Value};

use crate::model::{ApparatusKind, Property};
use crate::resolver::{strip_orcid_url, LookupError, MetadataResolver, PublicationMetadata};
use crate::units::{Quantity, Unit};

use super::{compare_name, ValidationConfig};

/// Outcome of one rule on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Finding {
    Error(String),
    Warning(String),
}

/// Collaborators and switches every rule sees
pub(crate) struct RuleContext<'a> {
    pub resolver: &'a dyn MetadataResolver,
    pub config: ValidationConfig,
}

/// Semantic checks the schema can attach to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticRule {
    /// `{units, ...}` mapping whose units must match the field's dimension
    Units,
    /// Quantity string that must be dimensionally correct and positive
    Quantity,
    /// Reference metadata cross-checked against the DOI record
    Reference,
    /// Author whose ORCID must resolve to the stated name
    Orcid,
}

impl SemanticRule {
    /// Whether the configuration lets this rule run
    pub fn enabled(self, config: &ValidationConfig) -> bool {
        if config.skip_semantic {
            return false;
        }
        match self {
            SemanticRule::Units => config.units,
            SemanticRule::Quantity => config.quantities,
            SemanticRule::Reference => config.references,
            SemanticRule::Orcid => config.orcids,
        }
    }

    /// Apply the rule to `value`, found under the schema field `field`
    pub(crate) fn check(self, field: &str, value: &Value, ctx: &RuleContext<'_>) -> Vec<Finding> {
        match self {
            SemanticRule::Units => check_units(field, value),
            SemanticRule::Quantity => check_quantity(field, value),
            SemanticRule::Reference => check_reference(value, ctx.resolver),
            SemanticRule::Orcid => check_orcid(value, ctx.resolver),
        }
    }
}

impl fmt::Display for SemanticRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticRule::Units => "valid units",
            SemanticRule::Quantity => "valid quantity",
            SemanticRule::Reference => "valid reference",
            SemanticRule::Orcid => "valid ORCID",
        };
        f.write_str(name)
    }
}

fn reference_unit(field: &str) -> Option<(&'static str, Unit)> {
    let property = Property::from_field_name(field)?;
    let text = property.reference_unit();
    Unit::parse(text).ok().map(|unit| (text, unit))
}

fn incompatible(reference: &str) -> Finding {
    Finding::Error(format!(
        "incompatible units; should be consistent with {}",
        reference
    ))
}

fn check_units(field: &str, value: &Value) -> Vec<Finding> {
    let Some((reference_text, reference)) = reference_unit(field) else {
        return Vec::new();
    };
    let Some(units) = value.get("units").and_then(Value::as_str) else {
        return Vec::new();
    };
    match Unit::parse(units) {
        Ok(unit) if unit.is_compatible_with(&reference) => Vec::new(),
        Ok(_) => vec![incompatible(reference_text)],
        Err(e) => vec![Finding::Error(e.to_string())],
    }
}

fn check_quantity(field: &str, value: &Value) -> Vec<Finding> {
    let Some((reference_text, reference)) = reference_unit(field) else {
        return Vec::new();
    };
    let Some(text) = value.as_str() else {
        return Vec::new();
    };
    let quantity = match Quantity::parse(text) {
        Ok(q) => q,
        Err(e) => return vec![Finding::Error(format!("invalid quantity '{}': {}", text, e))],
    };
    if !quantity.units.is_compatible_with(&reference) {
        return vec![incompatible(reference_text)];
    }
    if quantity.si_magnitude() <= 0.0 {
        return vec![Finding::Error(format!(
            "value must be greater than 0.0 {}",
            reference_text
        ))];
    }
    Vec::new()
}

fn author_name(author: &Value) -> &str {
    author.get("name").and_then(Value::as_str).unwrap_or_default()
}

fn check_reference(value: &Value, resolver: &dyn MetadataResolver) -> Vec<Finding> {
    let Some(doi) = value.get("doi").and_then(Value::as_str) else {
        return Vec::new();
    };
    let metadata = match resolver.resolve_reference(doi) {
        Ok(metadata) => metadata,
        Err(LookupError::NotFound(_)) => return vec![Finding::Error("DOI not found".to_string())],
        Err(LookupError::Unreachable(reason)) => {
            warn!("Network not available, DOI {} not validated ({})", doi, reason);
            return vec![Finding::Warning(
                "network not available, DOI not validated.".to_string(),
            )];
        }
    };

    let mut findings = Vec::new();
    check_bibliography(value, &metadata, &mut findings);
    check_authors(value, &metadata, &mut findings);
    findings
}

fn check_bibliography(value: &Value, metadata: &PublicationMetadata, findings: &mut Vec<Finding>) {
    if let Some(journal) = value.get("journal").and_then(Value::as_str) {
        let matches = metadata
            .container_titles
            .iter()
            .any(|title| title == journal || title.contains(journal));
        if !matches {
            findings.push(Finding::Error(format!(
                "journal does not match: {}",
                metadata.container_titles.join(", ")
            )));
        }
    }

    let year = value.get("year").and_then(Value::as_i64);
    if let (Some(year), Some(published)) = (year, metadata.year) {
        if year != i64::from(published) {
            findings.push(Finding::Error(format!("year should be {}", published)));
        }
    }

    if let (Some(volume), Some(published)) =
        (value.get("volume").and_then(Value::as_i64), metadata.volume.as_deref())
    {
        if published.trim().parse::<i64>().ok() != Some(volume) {
            findings.push(Finding::Error(format!("volume number should be {}", published)));
        }
    }

    if let (Some(pages), Some(published)) =
        (value.get("pages").and_then(Value::as_str), metadata.pages.as_deref())
    {
        if pages != published {
            findings.push(Finding::Error(format!("pages should be {}", published)));
        }
    }
}

fn check_authors(value: &Value, metadata: &PublicationMetadata, findings: &mut Vec<Finding>) {
    let given: Vec<&Value> = value
        .get("authors")
        .and_then(Value::as_sequence)
        .map(|authors| authors.iter().collect())
        .unwrap_or_default();
    let mut unmatched: Vec<bool> = vec![true; given.len()];

    for canonical in &metadata.authors {
        let matched = given.iter().enumerate().position(|(idx, author)| {
            unmatched[idx]
                && compare_name(&canonical.name.given, &canonical.name.family, author_name(author))
        });

        let Some(idx) = matched else {
            findings.push(Finding::Error(format!(
                "Missing author: {}",
                canonical.name.full_name()
            )));
            continue;
        };
        unmatched[idx] = false;

        let Some(orcid) = canonical.orcid.as_deref().map(strip_orcid_url) else {
            continue;
        };
        let name = author_name(given[idx]);
        match given[idx].get("ORCID").and_then(Value::as_str) {
            Some(stated) if stated != orcid => findings.push(Finding::Error(format!(
                "{} ORCID does not match that in reference. Reference: {}. Given: {}",
                name, orcid, stated
            ))),
            Some(_) => {}
            None => {
                warn!("ORCID {} missing for {}", orcid, name);
                findings.push(Finding::Warning(format!("ORCID {} missing for {}", orcid, name)));
            }
        }
    }

    let extra: Vec<&str> = given
        .iter()
        .zip(&unmatched)
        .filter(|(_, unmatched)| **unmatched)
        .map(|(author, _)| author_name(author))
        .collect();
    if !extra.is_empty() {
        findings.push(Finding::Error(format!(
            "Extra author(s) given: {}",
            extra.join(", ")
        )));
    }
}

fn check_orcid(value: &Value, resolver: &dyn MetadataResolver) -> Vec<Finding> {
    let Some(orcid) = value.get("ORCID").and_then(Value::as_str) else {
        return Vec::new();
    };
    let name = author_name(value);

    match resolver.resolve_identity(orcid) {
        Ok(person) if compare_name(&person.given, &person.family, name) => Vec::new(),
        Ok(person) => vec![Finding::Error(format!(
            "Name and ORCID do not match. Name supplied: {}. Name associated with ORCID: {}",
            name,
            person.full_name()
        ))],
        Err(LookupError::NotFound(_)) => vec![Finding::Error(format!(
            "ORCID incorrect or invalid for {}",
            name
        ))],
        Err(LookupError::Unreachable(reason)) => {
            warn!("Network not available, ORCID {} not validated ({})", orcid, reason);
            vec![Finding::Warning(
                "network not available, ORCID not validated.".to_string(),
            )]
        }
    }
}

/// Checks over combinations of fields; these need no external services
/// and run even when semantic validation is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRule {
    /// A reference needs a DOI or a free-text detail
    ReferenceIdentified,
    /// Compression time only for RCMs, pressure rise only for shock tubes
    ApparatusProperties,
    /// Volume history and pressure rise exclude each other
    VolumeHistoryExclusive,
    /// Ignition targets are single species or properties
    SingleIgnitionTarget,
}

impl RecordRule {
    /// Every record rule, in evaluation order
    pub const ALL: [RecordRule; 4] = [
        RecordRule::ReferenceIdentified,
        RecordRule::ApparatusProperties,
        RecordRule::VolumeHistoryExclusive,
        RecordRule::SingleIgnitionTarget,
    ];

    /// `(field, message)` for every violation in `document`
    pub(crate) fn check(self, document: &Value) -> Vec<(String, String)> {
        match self {
            RecordRule::ReferenceIdentified => check_reference_identified(document),
            RecordRule::ApparatusProperties => check_apparatus_properties(document),
            RecordRule::VolumeHistoryExclusive => check_volume_history_exclusive(document),
            RecordRule::SingleIgnitionTarget => check_single_ignition_target(document),
        }
    }
}

/// `common-properties` and each data point, with their report paths
fn property_blocks(document: &Value) -> Vec<(String, &Mapping)> {
    let mut blocks = Vec::new();
    if let Some(common) = document.get("common-properties").and_then(Value::as_mapping) {
        blocks.push(("common-properties".to_string(), common));
    }
    if let Some(points) = document.get("datapoints").and_then(Value::as_sequence) {
        for (idx, point) in points.iter().enumerate() {
            if let Some(point) = point.as_mapping() {
                blocks.push((format!("datapoints[{}]", idx), point));
            }
        }
    }
    blocks
}

fn check_reference_identified(document: &Value) -> Vec<(String, String)> {
    match document.get("reference") {
        Some(reference) if reference.get("doi").is_none() && reference.get("detail").is_none() => {
            vec![(
                "reference".to_string(),
                "either doi or detail must be given".to_string(),
            )]
        }
        _ => Vec::new(),
    }
}

fn check_apparatus_properties(document: &Value) -> Vec<(String, String)> {
    let kind = document
        .get("apparatus")
        .and_then(|a| a.get("kind"))
        .and_then(Value::as_str);
    let (forbidden, message) = match kind {
        Some(k) if k == ApparatusKind::ShockTube.as_str() => (
            "compression-time",
            "Compression time cannot be defined for shock tube.",
        ),
        Some(k) if k == ApparatusKind::RapidCompressionMachine.as_str() => {
            ("pressure-rise", "Pressure rise cannot be defined for RCM.")
        }
        _ => return Vec::new(),
    };

    property_blocks(document)
        .into_iter()
        .filter(|(_, block)| block.contains_key(forbidden))
        .map(|(path, _)| (format!("{}.{}", path, forbidden), message.to_string()))
        .collect()
}

fn check_volume_history_exclusive(document: &Value) -> Vec<(String, String)> {
    let blocks = property_blocks(document);
    let has_history = blocks.iter().any(|(_, b)| b.contains_key("volume-history"));
    let has_rise = blocks.iter().any(|(_, b)| b.contains_key("pressure-rise"));
    if has_history && has_rise {
        vec![(
            "datapoints".to_string(),
            "Both volume history and pressure rise cannot be specified.".to_string(),
        )]
    } else {
        Vec::new()
    }
}

fn check_single_ignition_target(document: &Value) -> Vec<(String, String)> {
    property_blocks(document)
        .into_iter()
        .filter_map(|(path, block)| {
            let target = block.get("ignition-type")?.get("target")?.as_str()?;
            target.contains(';').then(|| {
                (
                    format!("{}.ignition-type.target", path),
                    "Multiple ignition targets not supported.".to_string(),
                )
            })
        })
        .collect()
}
