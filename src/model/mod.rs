//! # Experiment Model
//!
//! Typed in-memory representation of one experimental dataset. Both the
//! ReSpecTh importer and the ChemKED loader produce an [`ExperimentRecord`];
//! the exporters only read it.
//!
//! ## Common Properties
//!
//! Values shared by every data point live in [`CommonProperties`]. Loading
//! distributes them into each [`DataPoint`] (a point's own value always
//! wins), and the ReSpecTh exporter factors them back out.

mod datapoint;
mod error;
mod experiment;
mod keywords;
mod property;

#[cfg(test)]
mod tests;

pub use datapoint::{
    CommonProperties, Composition, DataPoint, IgnitionDefinition, IgnitionTarget, Species,
    VolumeHistory,
};
pub use error::ModelError;
pub use experiment::{Apparatus, Author, ExperimentRecord, Reference};
pub use keywords::{ApparatusKind, CompositionKind, ExperimentType, IgnitionType};
pub use property::Property;

/// ChemKED schema version written into converted files
pub const CHEMKED_VERSION: &str = "0.4.1";
