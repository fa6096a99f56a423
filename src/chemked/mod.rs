//! # ChemKED Documents
//!
//! Loading and writing ChemKED YAML files.
//!
//! Loading always goes through the [`Validator`]: the raw YAML is checked
//! against the schema and semantic rules first, and only a document without
//! failures is mapped into an [`ExperimentRecord`]. Common properties are
//! distributed into every data point on the way in.
//!
//! Writing is a pure mapping from the record; no validation happens there.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chemked::resolver::OfflineResolver;
//! use chemked::validator::Validator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new(&OfflineResolver);
//! let record = chemked::chemked::from_yaml_file("experiment.yaml", &validator)?;
//! println!("{} data points", record.datapoints.len());
//! print!("{}", chemked::chemked::to_yaml_string(&record)?);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use log::{debug, warn};
use serde_yaml::Value;

use crate::model::ExperimentRecord;
use crate::validator::Validator;

mod document;
mod error;
mod mapping;

#[cfg(test)]
mod tests;

pub use document::{
    ApparatusDoc, AuthorDoc, AxisDoc, ChemKedDocument, CommonPropertiesDoc, CompositionDoc,
    DataPointDoc, IgnitionDoc, ReferenceDoc, SpeciesDoc, ValueList, VolumeHistoryDoc,
};
pub use error::ChemKedError;

/// Validate a parsed YAML tree and map it into a record.
///
/// `source` labels the validation report. Warnings are logged; any failure
/// returns [`ChemKedError::ValidationFailed`] carrying the full report.
pub fn from_value(
    value: Value,
    validator: &Validator<'_>,
    source: &str,
) -> Result<ExperimentRecord, ChemKedError> {
    let report = validator.validate_named(&value, source);
    for (field, message) in report.warnings() {
        warn!("{}: {}: {}", source, field, message);
    }
    if report.has_failures() {
        return Err(ChemKedError::ValidationFailed(report));
    }

    let document: ChemKedDocument = serde_yaml::from_value(value)?;
    let record = ExperimentRecord::try_from(document)?;
    debug!(
        "Loaded {} with {} data point(s)",
        source,
        record.datapoints.len()
    );
    Ok(record)
}

/// Parse, validate and map a YAML string
pub fn from_yaml_str(
    text: &str,
    validator: &Validator<'_>,
) -> Result<ExperimentRecord, ChemKedError> {
    let value: Value = serde_yaml::from_str(text)?;
    from_value(value, validator, "<string>")
}

/// Read, validate and map a YAML file
pub fn from_yaml_file<P: AsRef<Path>>(
    path: P,
    validator: &Validator<'_>,
) -> Result<ExperimentRecord, ChemKedError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&text)?;
    from_value(value, validator, &path.display().to_string())
}

/// YAML tree of a record
pub fn to_value(record: &ExperimentRecord) -> Result<Value, ChemKedError> {
    Ok(serde_yaml::to_value(ChemKedDocument::from(record))?)
}

/// YAML text of a record
pub fn to_yaml_string(record: &ExperimentRecord) -> Result<String, ChemKedError> {
    Ok(serde_yaml::to_string(&ChemKedDocument::from(record))?)
}
