//! Serde mirror of the ChemKED YAML layout.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// `name` plus optional `ORCID`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDoc {
    /// Full name
    pub name: String,
    /// ORCID identifier
    #[serde(rename = "ORCID", default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

/// Bibliographic reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDoc {
    /// Digital object identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Publication authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<AuthorDoc>,
    /// Journal title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// Publication year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Journal volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u32>,
    /// Page range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    /// Free-text citation or notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Experimental facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApparatusDoc {
    /// `shock tube` or `rapid compression machine`
    pub kind: String,
    /// Operating institution
    #[serde(default)]
    pub institution: String,
    /// Facility name
    #[serde(default)]
    pub facility: String,
}

/// One species of a composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDoc {
    /// Species name
    #[serde(rename = "species-name")]
    pub name: String,
    /// InChI identifier
    #[serde(rename = "InChI", default, skip_serializing_if = "Option::is_none")]
    pub inchi: Option<String>,
    /// `[amount, uncertainty?]`
    pub amount: Vec<Value>,
}

/// Mixture composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDoc {
    /// `mole fraction` or `mass fraction`
    pub kind: String,
    /// Species entries
    pub species: Vec<SpeciesDoc>,
}

/// Ignition definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnitionDoc {
    /// Monitored property or species
    pub target: String,
    /// Feature of the target profile
    #[serde(rename = "type")]
    pub kind: String,
}

/// Column of a volume history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDoc {
    /// Unit of the column
    pub units: String,
    /// Index into each row of `values`
    pub column: usize,
}

/// Tabulated volume trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeHistoryDoc {
    /// Time axis
    pub time: AxisDoc,
    /// Volume axis
    pub volume: AxisDoc,
    /// Sample rows
    pub values: Vec<Vec<f64>>,
}

/// `["1000.0 K", {uncertainty}?]`
pub type ValueList = Vec<Value>;

/// `common-properties` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommonPropertiesDoc {
    /// Shared composition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionDoc>,
    /// Shared temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<ValueList>,
    /// Shared pressure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<ValueList>,
    /// Shared pressure rise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_rise: Option<ValueList>,
    /// Shared compression time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_time: Option<ValueList>,
    /// Shared ignition definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignition_type: Option<IgnitionDoc>,
}

/// One entry of `datapoints`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DataPointDoc {
    /// Initial temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<ValueList>,
    /// Initial pressure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<ValueList>,
    /// Measured ignition delay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignition_delay: Option<ValueList>,
    /// Pressure rise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_rise: Option<ValueList>,
    /// Compression time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_time: Option<ValueList>,
    /// Initial composition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionDoc>,
    /// Ignition definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignition_type: Option<IgnitionDoc>,
    /// Volume trace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_history: Option<VolumeHistoryDoc>,
}

/// A whole ChemKED file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChemKedDocument {
    /// Who wrote the file
    pub file_author: AuthorDoc,
    /// Revision of the file
    pub file_version: u32,
    /// Schema version
    pub chemked_version: String,
    /// Bibliographic source
    pub reference: ReferenceDoc,
    /// Kind of experiment
    pub experiment_type: String,
    /// Facility
    pub apparatus: ApparatusDoc,
    /// Values shared by all data points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_properties: Option<CommonPropertiesDoc>,
    /// Measurements
    pub datapoints: Vec<DataPointDoc>,
}
