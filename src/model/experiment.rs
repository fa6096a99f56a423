use std::fmt::Write;

use super::{ApparatusKind, CommonProperties, DataPoint, ExperimentType, CHEMKED_VERSION};

/// A person, optionally identified by ORCID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Full name as written
    pub name: String,
    /// ORCID identifier (bare `0000-0000-0000-0000` form)
    pub orcid: Option<String>,
}

impl Author {
    /// Author without an ORCID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orcid: None,
        }
    }

    /// Attach an ORCID
    pub fn with_orcid(mut self, orcid: impl Into<String>) -> Self {
        self.orcid = Some(orcid.into());
        self
    }
}

/// Experimental facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apparatus {
    /// Shock tube or RCM
    pub kind: ApparatusKind,
    /// Institution operating the facility
    pub institution: String,
    /// Facility name
    pub facility: String,
}

impl Apparatus {
    /// Apparatus with empty institution and facility
    pub fn new(kind: ApparatusKind) -> Self {
        Self {
            kind,
            institution: String::new(),
            facility: String::new(),
        }
    }
}

/// Bibliographic source of the data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    /// Digital object identifier
    pub doi: Option<String>,
    /// Free-text citation
    pub detail: Option<String>,
    /// Journal title
    pub journal: Option<String>,
    /// Publication year
    pub year: Option<i32>,
    /// Journal volume
    pub volume: Option<u32>,
    /// Page range
    pub pages: Option<String>,
    /// Authors in publication order
    pub authors: Vec<Author>,
}

impl Reference {
    /// Reference identified by DOI only
    pub fn from_doi(doi: impl Into<String>) -> Self {
        Self {
            doi: Some(doi.into()),
            ..Default::default()
        }
    }

    /// Reference identified by a free-text citation only
    pub fn from_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    /// A reference needs at least a DOI or a citation
    pub fn is_identified(&self) -> bool {
        self.doi.is_some() || self.detail.is_some()
    }

    /// Human-readable citation: `A. Author, B. Author, Journal (2016) 5:1-10. detail`
    pub fn citation(&self) -> String {
        let mut citation = String::new();
        for author in &self.authors {
            citation.push_str(&author.name);
            citation.push_str(", ");
        }
        let mut bibliographic = false;
        if let Some(journal) = &self.journal {
            citation.push_str(journal);
            bibliographic = true;
        }
        if let Some(year) = self.year {
            let _ = write!(citation, " ({})", year);
            bibliographic = true;
        }
        if let Some(volume) = self.volume {
            let _ = write!(citation, " {}", volume);
            bibliographic = true;
        }
        if let Some(pages) = &self.pages {
            let _ = write!(citation, ":{}", pages);
            bibliographic = true;
        }
        if bibliographic {
            citation.push_str(". ");
        }
        if let Some(detail) = &self.detail {
            citation.push_str(detail);
        }
        citation.trim().trim_end_matches(',').to_string()
    }
}

/// One experimental dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRecord {
    /// Who wrote the file
    pub file_author: Author,
    /// Revision of this file
    pub file_version: u32,
    /// ChemKED schema version
    pub chemked_version: String,
    /// Kind of experiment
    pub experiment_type: ExperimentType,
    /// Facility
    pub apparatus: Apparatus,
    /// Bibliographic source
    pub reference: Reference,
    /// Values shared by all data points
    pub common_properties: CommonProperties,
    /// Measurements (at least one)
    pub datapoints: Vec<DataPoint>,
}

impl ExperimentRecord {
    /// Empty ignition-delay record for the given author and apparatus
    pub fn new(file_author: Author, apparatus: Apparatus, reference: Reference) -> Self {
        Self {
            file_author,
            file_version: 0,
            chemked_version: CHEMKED_VERSION.to_string(),
            experiment_type: ExperimentType::IgnitionDelay,
            apparatus,
            reference,
            common_properties: CommonProperties::default(),
            datapoints: Vec::new(),
        }
    }

    /// Distribute common properties into every data point without
    /// overwriting values the points already carry
    pub fn apply_common_properties(&mut self) {
        let common = &self.common_properties;
        for point in &mut self.datapoints {
            point.apply_common(common);
        }
    }

    /// True if the common properties or any data point define pressure rise
    pub fn has_pressure_rise(&self) -> bool {
        self.common_properties.pressure_rise.is_some()
            || self.datapoints.iter().any(|dp| dp.pressure_rise.is_some())
    }

    /// True if the common properties or any data point define compression time
    pub fn has_compression_time(&self) -> bool {
        self.common_properties.compression_time.is_some()
            || self.datapoints.iter().any(|dp| dp.compression_time.is_some())
    }

    /// True if any data point carries a volume history
    pub fn has_volume_history(&self) -> bool {
        self.datapoints.iter().any(|dp| dp.volume_history.is_some())
    }

    /// Illegal combinations of apparatus and properties, one message each
    pub fn property_conflicts(&self) -> Vec<String> {
        let mut conflicts = Vec::new();
        if self.has_compression_time() && self.apparatus.kind == ApparatusKind::ShockTube {
            conflicts.push("Compression time cannot be defined for shock tube.".to_string());
        }
        if self.has_pressure_rise() && self.apparatus.kind == ApparatusKind::RapidCompressionMachine
        {
            conflicts.push("Pressure rise cannot be defined for RCM.".to_string());
        }
        if self.has_volume_history() && self.has_pressure_rise() {
            conflicts
                .push("Both volume history and pressure rise cannot be specified.".to_string());
        }
        conflicts
    }
}
