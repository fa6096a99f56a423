//! # ChemKED - Chemical Kinetics Experimental Data Conversion
//!
//! `chemked` converts ignition-delay experiments between the ReSpecTh XML
//! interchange format and the YAML-based ChemKED format, and validates
//! ChemKED documents against a schema plus semantic rules.
//!
//! ## Key Features
//!
//! - **Typed Experiment Model**: one [`model::ExperimentRecord`] per dataset,
//!   with closed vocabularies for apparatus, composition kind and ignition
//!   definition, and dimensioned [`units::Quantity`] values.
//!
//! - **ReSpecTh Import/Export**: common properties, data groups, composition
//!   columns and RCM volume histories, with precise errors for missing
//!   elements and unsupported constructs.
//!
//! - **Semantic Validation**: unit dimensionality, positive quantities,
//!   bibliographic cross-checks against the DOI record and ORCID/author
//!   matching, reported per field.
//!
//! - **Pluggable Lookups**: DOI and ORCID facts come from a
//!   [`resolver::MetadataResolver`]; unreachable services downgrade the
//!   affected checks to warnings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chemked::convert::Converter;
//! use chemked::resolver::OfflineResolver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = std::fs::read_to_string("experiment.xml")?;
//! let conversion = Converter::new(&OfflineResolver)
//!     .respecth_to_chemked(&xml, Some("experiment.xml"))?;
//!
//! println!("{} data points", conversion.record.datapoints.len());
//! std::fs::write("experiment.yaml", conversion.text)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Loading and Validating ChemKED Files
//!
//! ```rust,no_run
//! use chemked::resolver::OfflineResolver;
//! use chemked::validator::{ValidationConfig, Validator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new(&OfflineResolver).with_config(ValidationConfig::offline());
//! let record = chemked::chemked::from_yaml_file("experiment.yaml", &validator)?;
//! assert!(!record.datapoints.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`units`]: unit expressions, dimensional analysis and quantities
//! - [`model`]: the experiment record and its closed vocabularies
//! - [`resolver`]: DOI/ORCID lookup interface and offline/static resolvers
//! - [`respecth`]: ReSpecTh XML tree, importer and exporter
//! - [`chemked`]: ChemKED YAML document mapping and the validating loader
//! - [`validator`]: schema table, semantic rules, name matcher and reports
//! - [`convert`]: end-to-end pipelines between the two formats

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod chemked;
pub mod convert;
pub mod model;
pub mod resolver;
pub mod respecth;
pub mod units;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::chemked::{from_yaml_file, from_yaml_str, to_yaml_string, ChemKedError};
    pub use crate::convert::{Conversion, Converter, PipelineError};
    pub use crate::model::{
        Apparatus, ApparatusKind, Author, CommonProperties, Composition, CompositionKind,
        DataPoint, ExperimentRecord, ExperimentType, IgnitionDefinition, IgnitionTarget,
        IgnitionType, Property, Reference, Species, VolumeHistory,
    };
    pub use crate::resolver::{MetadataResolver, OfflineResolver, StaticResolver};
    pub use crate::respecth::{export_respecth, ConvertError, ImportOptions, RespecthImporter};
    pub use crate::units::{Quantity, Unit};
    pub use crate::validator::{
        compare_name, ValidationConfig, ValidationReport, Validator,
    };
}
